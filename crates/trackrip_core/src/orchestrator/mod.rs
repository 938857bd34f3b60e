//! Job orchestrator: sequences the end-to-end extraction operation.
//!
//! "Ask the picker for a source, run exactly one job, translate the
//! outcome." The orchestrator owns the closing status messages and the
//! at-most-one-job-in-flight guard; everything else is delegated.

use std::future::Future;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;

use crate::engine::TranscodeEngine;
use crate::extraction::{ExtractionError, ExtractionJob, STATUS_FAILED};
use crate::models::ExtractionRecord;
use crate::status::StatusSink;

const STATUS_STARTING: &str = "Starting audio extraction...";
const STATUS_COMPLETE: &str = "Audio extraction complete";

/// Errors surfaced by the orchestrator.
#[derive(Error, Debug)]
pub enum OrchestratorError {
    /// A second request arrived while a job was in flight. Requests are
    /// rejected rather than queued: the status sink is shared and carries
    /// no job tags, so interleaved jobs would be unreadable.
    #[error("An extraction job is already running")]
    JobAlreadyRunning,

    /// The extraction job failed. Never swallowed - re-surfaced after the
    /// closing status message is published.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
}

/// Result type for orchestrator operations.
pub type OrchestratorResult<T> = Result<T, OrchestratorError>;

/// Source-file picker collaborator.
///
/// `None` means the user declined to pick a file; that is not an error.
/// Implementations filter to known video container extensions - the
/// orchestrator trusts the filter and does not re-validate.
pub trait SourcePicker: Send + Sync {
    /// Ask the user for a source file.
    fn pick_source(&self) -> impl Future<Output = Option<PathBuf>> + Send;
}

/// Sequences "pick file -> run job -> report result" over a shared
/// status sink.
pub struct Orchestrator<P, E> {
    picker: P,
    engine: E,
    sink: StatusSink,
    format: String,
    bitrate: String,
    in_flight: AtomicBool,
}

impl<P: SourcePicker, E: TranscodeEngine> Orchestrator<P, E> {
    /// Create an orchestrator with the default mp3/128k parameters.
    pub fn new(picker: P, engine: E, sink: StatusSink) -> Self {
        Self {
            picker,
            engine,
            sink,
            format: "mp3".to_string(),
            bitrate: "128k".to_string(),
            in_flight: AtomicBool::new(false),
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

    /// The sink this orchestrator (and its jobs) publish to.
    pub fn sink(&self) -> &StatusSink {
        &self.sink
    }

    /// Run one end-to-end extraction.
    ///
    /// Returns `Ok(None)` without publishing anything if the picker
    /// reports no selection. Otherwise publishes the starting message,
    /// runs exactly one job, publishes exactly one closing message
    /// (`"Audio extraction complete"` or `"Error extracting audio"` - the
    /// latter intentionally duplicating the job's own failure message),
    /// and returns the source/output pair or the propagated failure.
    pub async fn run_once(&self) -> OrchestratorResult<Option<ExtractionRecord>> {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            return Err(OrchestratorError::JobAlreadyRunning);
        }
        let _guard = InFlightGuard(&self.in_flight);

        let Some(source_path) = self.picker.pick_source().await else {
            tracing::debug!("No source selected");
            return Ok(None);
        };

        self.sink.publish(STATUS_STARTING);

        let job = ExtractionJob::new(&self.engine, self.sink.clone())
            .with_audio_params(self.format.as_str(), self.bitrate.as_str());

        match job.start(&source_path).await {
            Ok(output_path) => {
                self.sink.publish(STATUS_COMPLETE);
                Ok(Some(ExtractionRecord {
                    source_path,
                    output_path,
                }))
            }
            Err(e) => {
                self.sink.publish(STATUS_FAILED);
                Err(e.into())
            }
        }
    }
}

/// Clears the in-flight flag on every exit path.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}
