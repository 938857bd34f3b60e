//! The extraction job: one engine invocation, one settled outcome.

use std::path::{Path, PathBuf};

use tokio::sync::mpsc;

use super::types::{ExtractionError, ExtractionResult};
use super::derive_output_path;
use crate::engine::{EngineRequest, TranscodeEngine};
use crate::progress::normalize_percent;
use crate::status::StatusSink;

/// Status message published when a job fails. The orchestrator publishes
/// the same text again as its closing message; both are kept for
/// observability parity with the original tool.
pub(crate) const STATUS_FAILED: &str = "Error extracting audio";

/// Drives exactly one audio extraction for a given source path.
///
/// The job wires the engine's progress stream through the normalizer to
/// the status sink and settles exactly once. There is no cancellation:
/// once started, the invocation runs to completion or failure.
pub struct ExtractionJob<'a, E> {
    engine: &'a E,
    sink: StatusSink,
    format: String,
    bitrate: String,
}

impl<'a, E: TranscodeEngine> ExtractionJob<'a, E> {
    /// Create a job with the default mp3/128k audio parameters.
    pub fn new(engine: &'a E, sink: StatusSink) -> Self {
        Self {
            engine,
            sink,
            format: "mp3".to_string(),
            bitrate: "128k".to_string(),
        }
    }

    /// Override the output format and bitrate (from settings).
    pub fn with_audio_params(
        mut self,
        format: impl Into<String>,
        bitrate: impl Into<String>,
    ) -> Self {
        self.format = format.into();
        self.bitrate = bitrate.into();
        self
    }

    /// Run the extraction, suspending until the engine settles.
    ///
    /// Progress messages (`"Extracting audio... {percent}%"`) are
    /// published in engine order and never block the invocation; the
    /// returned outcome is the job's single terminal transition, and no
    /// message is published after the terminal one.
    ///
    /// The source path is handed to the engine unvalidated - ffmpeg is
    /// the authority on whether the file is readable media. An existing
    /// file at the derived output path is overwritten.
    pub async fn start(&self, source: &Path) -> ExtractionResult<PathBuf> {
        let output = derive_output_path(source, &self.format);

        tracing::info!(
            "Starting extraction: {} -> {}",
            source.display(),
            output.display()
        );

        let request = EngineRequest {
            input: source.to_path_buf(),
            output: output.clone(),
            format: self.format.clone(),
            bitrate: self.bitrate.clone(),
        };

        let (tx, mut rx) = mpsc::unbounded_channel();

        // Forward progress off the invocation's critical path. The engine
        // drops its sender when it settles, which ends this task after
        // the last queued sample - so awaiting it below guarantees every
        // progress message lands before the terminal transition.
        let progress_sink = self.sink.clone();
        let forwarder = tokio::spawn(async move {
            while let Some(sample) = rx.recv().await {
                let percent = normalize_percent(&sample);
                progress_sink.publish(format!("Extracting audio... {percent}%"));
            }
        });

        let result = self.engine.invoke(request, tx).await;
        let _ = forwarder.await;

        match result {
            Ok(()) => {
                tracing::info!("Extraction finished: {}", output.display());
                Ok(output)
            }
            Err(e) => {
                tracing::error!("Extraction failed for {}: {}", source.display(), e);
                self.sink.publish(STATUS_FAILED);
                Err(ExtractionError::Engine(e))
            }
        }
    }
}
