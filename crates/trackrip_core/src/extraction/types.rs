//! Error types for extraction operations.

use thiserror::Error;

use crate::engine::EngineError;

/// Error from one extraction job.
///
/// The underlying engine error is preserved for diagnostics: a bad input
/// file, an unsupported codec, a crashed process, and a missing binary
/// all surface here.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The engine invocation failed.
    #[error("Audio extraction failed: {0}")]
    Engine(#[from] EngineError),
}

/// Result type for extraction operations.
pub type ExtractionResult<T> = Result<T, ExtractionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_error_is_preserved_as_source() {
        let engine_err = EngineError::CommandFailed {
            tool: "ffmpeg".to_string(),
            exit_code: 187,
            message: "moov atom not found".to_string(),
        };
        let err = ExtractionError::from(engine_err);

        let msg = err.to_string();
        assert!(msg.contains("Audio extraction failed"));
        assert!(msg.contains("exit code 187"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
