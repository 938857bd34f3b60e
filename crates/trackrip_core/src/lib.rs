//! TrackRip Core - Backend logic for the TrackRip audio extractor
//!
//! This crate contains all business logic with zero UI dependencies:
//! the ffmpeg engine wrapper, the extraction job, the orchestrator that
//! sequences "pick file -> extract -> record result", and the persisted
//! history of processed files. It can be used by the GUI shell or a CLI.

pub mod config;
pub mod engine;
pub mod extraction;
pub mod history;
pub mod logging;
pub mod models;
pub mod orchestrator;
pub mod progress;
pub mod stats;
pub mod status;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
