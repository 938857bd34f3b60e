//! Persisted history of processed files.
//!
//! The extraction pipeline keeps no history of its own; completed results
//! are handed here. State lives in a versioned JSON file written
//! atomically (temp file + rename). A file that fails to parse is logged
//! and treated as empty rather than blocking the application.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::ExtractionRecord;

/// Errors from history persistence.
#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("Failed to write history file: {0}")]
    Write(#[from] std::io::Error),

    #[error("Failed to serialize history: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for history operations.
pub type HistoryResult<T> = Result<T, HistoryError>;

/// One processed file, as shown in the history list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Absolute path of the source video.
    pub source_path: PathBuf,

    /// Path of the extracted audio file.
    pub output_path: PathBuf,

    /// File name shown in the list.
    pub display_name: String,

    /// Unix epoch milliseconds when the extraction completed.
    pub created_at_ms: i64,

    /// Human-readable source size ("12.3 MB"), if the stat succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatted_size: Option<String>,
}

impl HistoryRecord {
    /// Build a record from a completed extraction, stamped now.
    pub fn from_extraction(record: &ExtractionRecord, formatted_size: Option<String>) -> Self {
        let display_name = record
            .source_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| record.source_path.display().to_string());

        Self {
            source_path: record.source_path.clone(),
            output_path: record.output_path.clone(),
            display_name,
            created_at_ms: chrono::Utc::now().timestamp_millis(),
            formatted_size,
        }
    }
}

/// Persistent history state (saved to history.json).
#[derive(Debug, Clone, Serialize, Deserialize)]
struct HistoryState {
    /// History format version.
    version: u32,
    /// Records in completion order.
    records: Vec<HistoryRecord>,
}

impl Default for HistoryState {
    fn default() -> Self {
        Self {
            version: 1,
            records: Vec::new(),
        }
    }
}

/// In-memory history with persistence to a JSON file.
#[derive(Debug)]
pub struct HistoryStore {
    records: Vec<HistoryRecord>,
    history_file: PathBuf,
}

impl HistoryStore {
    /// Create a store backed by the given file, loading existing records.
    pub fn new(history_file: impl Into<PathBuf>) -> Self {
        let history_file = history_file.into();

        let records = if history_file.exists() {
            match fs::read_to_string(&history_file) {
                Ok(content) => match serde_json::from_str::<HistoryState>(&content) {
                    Ok(state) => {
                        tracing::info!("Loaded {} records from {}", state.records.len(), history_file.display());
                        state.records
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse {}: {}", history_file.display(), e);
                        Vec::new()
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read {}: {}", history_file.display(), e);
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };

        Self {
            records,
            history_file,
        }
    }

    /// Create a store without persistence (for testing).
    pub fn in_memory() -> Self {
        Self {
            records: Vec::new(),
            history_file: PathBuf::new(),
        }
    }

    /// All records, oldest first.
    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    /// Append a record and persist.
    pub fn append(&mut self, record: HistoryRecord) -> HistoryResult<()> {
        self.records.push(record);
        self.save()
    }

    /// Persist the current records to disk.
    pub fn save(&self) -> HistoryResult<()> {
        if self.history_file.as_os_str().is_empty() {
            return Ok(()); // In-memory store, nothing to save
        }

        if let Some(parent) = self.history_file.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let state = HistoryState {
            version: 1,
            records: self.records.clone(),
        };

        let json = serde_json::to_string_pretty(&state)?;

        // Write atomically via temp file
        let temp_file = self.history_file.with_extension("json.tmp");
        fs::write(&temp_file, &json)?;
        fs::rename(&temp_file, &self.history_file)?;

        tracing::debug!("Saved {} records to {}", self.records.len(), self.history_file.display());
        Ok(())
    }

    /// Path of the backing file (empty for in-memory stores).
    pub fn path(&self) -> &Path {
        &self.history_file
    }
}
