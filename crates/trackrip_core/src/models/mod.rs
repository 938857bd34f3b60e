//! Core value types shared across the extraction pipeline.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One raw progress sample emitted by the transcoding engine.
///
/// Every field is best-effort: ffmpeg's `-progress` output omits keys it
/// cannot compute (notably the completion percentage when the input
/// duration is unknown). The pipeline only interprets `percent`; the
/// encoder metrics are carried for display and logging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgressSample {
    /// Fractional completion in percent (0.0 - 100.0), if known.
    ///
    /// Engines emit noisy values near the end of a run; consumers must
    /// clamp rather than assume the range or monotonicity.
    pub percent: Option<f64>,

    /// Frames processed so far.
    pub frames: Option<u64>,

    /// Current encoder bitrate in kbit/s.
    pub bitrate_kbps: Option<f64>,

    /// Encoder speed relative to realtime (e.g. 12.4 for "12.4x").
    pub speed: Option<f64>,

    /// Elapsed output timemark (e.g. "00:01:23.456789").
    pub timemark: Option<String>,
}

/// The settled result of one successful extraction: which file was read
/// and where the audio landed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionRecord {
    /// Absolute path of the source video.
    pub source_path: PathBuf,

    /// Derived path of the extracted audio file.
    pub output_path: PathBuf,
}
