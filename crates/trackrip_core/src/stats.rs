//! File-size collaborator: best-effort stat for display.
//!
//! Used only by presentation code. A failed stat must never abort an
//! otherwise-successful extraction; callers degrade to a placeholder.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Error from a stat request.
#[derive(Error, Debug)]
pub enum StatError {
    #[error("Failed to stat {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Size information for a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStats {
    /// File size in bytes.
    pub size_bytes: u64,
}

/// Stat a file and return its size.
pub fn stat_file(path: &Path) -> Result<FileStats, StatError> {
    let metadata = std::fs::metadata(path).map_err(|source| StatError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(FileStats {
        size_bytes: metadata.len(),
    })
}

/// Format a byte count for display ("1.5 MB").
///
/// Decimal units, one fractional digit above bytes.
pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1_000.0;
    const MB: f64 = 1_000_000.0;
    const GB: f64 = 1_000_000_000.0;

    let bytes = bytes as f64;
    if bytes >= GB {
        format!("{:.1} GB", bytes / GB)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes / MB)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes / KB)
    } else {
        format!("{} B", bytes as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn stat_reports_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp4");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(&[0u8; 1234]).unwrap();

        let stats = stat_file(&path).unwrap();
        assert_eq!(stats.size_bytes, 1234);
    }

    #[test]
    fn stat_missing_file_fails_with_path_context() {
        let err = stat_file(Path::new("/no/such/file.mp4")).unwrap_err();
        assert!(err.to_string().contains("/no/such/file.mp4"));
    }

    #[test]
    fn formats_each_magnitude() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(1_500), "1.5 KB");
        assert_eq!(format_size(12_300_000), "12.3 MB");
        assert_eq!(format_size(2_000_000_000), "2.0 GB");
    }
}
