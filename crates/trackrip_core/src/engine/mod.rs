//! Transcoding engine boundary.
//!
//! The pipeline depends only on this contract: hand an engine a request
//! and a progress channel, get back zero or more samples followed by
//! exactly one settled outcome. The real implementation wraps ffmpeg;
//! tests script their own.

use std::future::Future;
use std::path::PathBuf;

use thiserror::Error;
use tokio::sync::mpsc;

use crate::models::ProgressSample;

mod ffmpeg;

pub use ffmpeg::FfmpegEngine;

/// Errors reported by a transcoding engine invocation.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The engine binary could not be started at all.
    #[error("Failed to spawn {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// The engine ran but exited with a failure status.
    #[error("{tool} failed with exit code {exit_code}: {message}")]
    CommandFailed {
        tool: String,
        exit_code: i32,
        message: String,
    },

    /// I/O error while talking to the engine process.
    #[error("I/O error during {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// One audio-extraction request handed to an engine.
#[derive(Debug, Clone)]
pub struct EngineRequest {
    /// Path to the input video.
    pub input: PathBuf,
    /// Path the extracted audio will be written to. An existing file at
    /// this path is overwritten.
    pub output: PathBuf,
    /// Output container/format (e.g. "mp3").
    pub format: String,
    /// Audio bitrate (e.g. "128k").
    pub bitrate: String,
}

impl EngineRequest {
    /// Build a request with the default mp3/128k parameters.
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            format: "mp3".to_string(),
            bitrate: "128k".to_string(),
        }
    }
}

/// An external transcoding engine.
///
/// `invoke` drives one out-of-process extraction: progress samples are
/// sent on `progress` as they arrive (send failures are ignored - the
/// receiver side decides whether anyone is listening), and the returned
/// future settles exactly once when the process terminates. There is no
/// way to abort a started invocation.
pub trait TranscodeEngine: Send + Sync {
    /// Run one extraction to completion or failure.
    fn invoke(
        &self,
        request: EngineRequest,
        progress: mpsc::UnboundedSender<ProgressSample>,
    ) -> impl Future<Output = EngineResult<()>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_defaults_to_mp3_128k() {
        let req = EngineRequest::new("/v/a.mp4", "/v/a.mp3");
        assert_eq!(req.format, "mp3");
        assert_eq!(req.bitrate, "128k");
    }

    #[test]
    fn command_failed_displays_context() {
        let err = EngineError::CommandFailed {
            tool: "ffmpeg".to_string(),
            exit_code: 1,
            message: "Invalid data found".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("ffmpeg"));
        assert!(msg.contains("exit code 1"));
        assert!(msg.contains("Invalid data found"));
    }
}
