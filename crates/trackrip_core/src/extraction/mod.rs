//! Audio extraction: one job per source file.
//!
//! An [`ExtractionJob`] owns a single engine invocation, forwards its
//! progress stream to the status sink as human-readable text, and settles
//! exactly once with the output path or an error.

mod job;
mod types;

pub use job::ExtractionJob;
pub(crate) use job::STATUS_FAILED;
pub use types::{ExtractionError, ExtractionResult};

use std::path::{Path, PathBuf};

/// Derive the output path for an extraction: the source path with its
/// extension replaced by the audio container's extension.
///
/// `clip.mp4` becomes `clip.mp3`; only the final extension is replaced,
/// so `clip.tar.mp4` becomes `clip.tar.mp3`. A source without an
/// extension gets one appended. The derivation is idempotent.
pub fn derive_output_path(source: &Path, extension: &str) -> PathBuf {
    source.with_extension(extension)
}
