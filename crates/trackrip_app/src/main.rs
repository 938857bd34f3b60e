//! TrackRip - extract the audio track from a video file.
//!
//! Picks a source video (native file dialog, or a path given on the
//! command line), runs the extraction pipeline, prints status messages
//! as they are published, and records the result in the persisted
//! history of processed files.

mod picker;

use std::path::PathBuf;

use anyhow::{Context, Result};

use trackrip_core::config::{default_config_path, ConfigManager};
use trackrip_core::engine::FfmpegEngine;
use trackrip_core::history::{HistoryRecord, HistoryStore};
use trackrip_core::orchestrator::Orchestrator;
use trackrip_core::stats::{format_size, stat_file};
use trackrip_core::status::StatusSink;

use picker::AppPicker;

#[tokio::main]
async fn main() -> Result<()> {
    trackrip_core::logging::init_tracing("trackrip=debug,info");

    let config_path = default_config_path().context("resolving config path")?;
    let mut config = ConfigManager::new(&config_path);
    config
        .load_or_create()
        .with_context(|| format!("loading config from {}", config_path.display()))?;
    let settings = config.settings().clone();

    tracing::info!("TrackRip v{} starting", trackrip_core::version());

    let picker = match std::env::args_os().nth(1) {
        Some(path) => AppPicker::Fixed(PathBuf::from(path)),
        None => AppPicker::Dialog,
    };

    let engine = FfmpegEngine::with_binaries(
        &settings.engine.ffmpeg_path,
        &settings.engine.ffprobe_path,
    );

    let sink = StatusSink::new();

    // Mirror every status message to stdout.
    let mut status_rx = sink.subscribe();
    let printer = tokio::spawn(async move {
        while let Ok(message) = status_rx.recv().await {
            println!("{message}");
        }
    });

    let orchestrator = Orchestrator::new(picker, engine, sink).with_audio_params(
        settings.engine.output_format.as_str(),
        settings.engine.audio_bitrate.as_str(),
    );

    let outcome = orchestrator.run_once().await;
    drop(orchestrator); // closes the sink so the printer drains and stops
    let _ = printer.await;

    match outcome {
        Ok(Some(record)) => {
            // Size display is best-effort; a failed stat degrades to "--".
            let formatted_size = match stat_file(&record.source_path) {
                Ok(stats) => Some(format_size(stats.size_bytes)),
                Err(e) => {
                    tracing::warn!("{}", e);
                    None
                }
            };

            let mut history = HistoryStore::new(history_path(&settings.paths.history_file));
            let entry = HistoryRecord::from_extraction(&record, formatted_size.clone());
            history.append(entry).context("saving history")?;

            println!(
                "{} ({}) -> {}",
                record.source_path.display(),
                formatted_size.as_deref().unwrap_or("--"),
                record.output_path.display()
            );
            Ok(())
        }
        Ok(None) => {
            println!("No file selected.");
            Ok(())
        }
        Err(e) => Err(e).context("audio extraction failed"),
    }
}

/// Resolve the history file: relative paths live in the platform data dir.
fn history_path(configured: &str) -> PathBuf {
    let path = PathBuf::from(configured);
    if path.is_absolute() {
        return path;
    }

    directories::ProjectDirs::from("", "", "trackrip")
        .map(|dirs| dirs.data_dir().join(&path))
        .unwrap_or(path)
}
