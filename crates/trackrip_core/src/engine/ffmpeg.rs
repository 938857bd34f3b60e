//! ffmpeg-backed engine implementation.
//!
//! Spawns one ffmpeg process per invocation with `-progress pipe:1` and
//! parses the key=value blocks it writes to stdout into progress samples.
//! The completion percentage is derived from the input duration, probed
//! up front with ffprobe; if the probe fails the samples simply carry no
//! percentage.

use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;

use super::{EngineError, EngineRequest, EngineResult, TranscodeEngine};
use crate::models::ProgressSample;

/// Number of trailing stderr lines kept for failure diagnostics.
const STDERR_TAIL_LINES: usize = 8;

/// Engine backed by the ffmpeg and ffprobe command-line tools.
#[derive(Debug, Clone)]
pub struct FfmpegEngine {
    ffmpeg: PathBuf,
    ffprobe: PathBuf,
}

impl FfmpegEngine {
    /// Create an engine that resolves `ffmpeg` and `ffprobe` from PATH.
    pub fn new() -> Self {
        Self::with_binaries("ffmpeg", "ffprobe")
    }

    /// Create an engine with explicit binary locations.
    pub fn with_binaries(ffmpeg: impl Into<PathBuf>, ffprobe: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            ffprobe: ffprobe.into(),
        }
    }

    /// Probe the input duration in seconds.
    ///
    /// Best effort: any failure (missing ffprobe, unreadable file, stream
    /// without a duration) yields `None` and the run proceeds without
    /// percentages.
    async fn probe_duration_secs(&self, input: &Path) -> Option<f64> {
        let output = Command::new(&self.ffprobe)
            .args([
                "-v",
                "error",
                "-show_entries",
                "format=duration",
                "-of",
                "default=noprint_wrappers=1:nokey=1",
            ])
            .arg(input)
            .stdin(Stdio::null())
            .output()
            .await;

        let output = match output {
            Ok(out) if out.status.success() => out,
            Ok(out) => {
                tracing::debug!(
                    "ffprobe exited with {:?} for {}",
                    out.status.code(),
                    input.display()
                );
                return None;
            }
            Err(e) => {
                tracing::debug!("Failed to run ffprobe: {}", e);
                return None;
            }
        };

        String::from_utf8_lossy(&output.stdout)
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|d| d.is_finite() && *d > 0.0)
    }
}

impl Default for FfmpegEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TranscodeEngine for FfmpegEngine {
    async fn invoke(
        &self,
        request: EngineRequest,
        progress: mpsc::UnboundedSender<ProgressSample>,
    ) -> EngineResult<()> {
        let duration = self.probe_duration_secs(&request.input).await;

        let mut cmd = Command::new(&self.ffmpeg);
        cmd.arg("-y")
            .arg("-i")
            .arg(&request.input)
            .arg("-vn")
            .arg("-f")
            .arg(&request.format)
            .arg("-b:a")
            .arg(&request.bitrate)
            .arg("-progress")
            .arg("pipe:1")
            .arg("-nostats")
            .arg("-loglevel")
            .arg("error")
            .arg(&request.output)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        tracing::debug!(
            "Running: ffmpeg -y -i {} -vn -f {} -b:a {} {}",
            request.input.display(),
            request.format,
            request.bitrate,
            request.output.display()
        );

        let mut child = cmd.spawn().map_err(|e| EngineError::Spawn {
            tool: "ffmpeg".to_string(),
            source: e,
        })?;

        let stdout = child.stdout.take().ok_or_else(|| EngineError::Io {
            operation: "capture ffmpeg stdout".to_string(),
            source: io::Error::other("stdout was not piped"),
        })?;
        let stderr = child.stderr.take().ok_or_else(|| EngineError::Io {
            operation: "capture ffmpeg stderr".to_string(),
            source: io::Error::other("stderr was not piped"),
        })?;

        // Drain stderr concurrently so a chatty ffmpeg can't fill the pipe
        // and stall while we read progress from stdout.
        let stderr_task = tokio::spawn(collect_stderr_tail(stderr));

        let mut lines = BufReader::new(stdout).lines();
        let mut block = ProgressBlock::default();

        while let Some(line) = lines.next_line().await.map_err(|e| EngineError::Io {
            operation: "read ffmpeg progress".to_string(),
            source: e,
        })? {
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            block.set(key, value.trim());

            // Each block ends with a "progress=continue|end" line.
            if key == "progress" {
                let _ = progress.send(block.into_sample(duration));
                block = ProgressBlock::default();
            }
        }

        let status = child.wait().await.map_err(|e| EngineError::Io {
            operation: "wait for ffmpeg".to_string(),
            source: e,
        })?;

        let stderr_tail = stderr_task.await.unwrap_or_default();

        if !status.success() {
            return Err(EngineError::CommandFailed {
                tool: "ffmpeg".to_string(),
                exit_code: status.code().unwrap_or(-1),
                message: stderr_tail,
            });
        }

        tracing::info!(
            "Extracted audio from {} to {}",
            request.input.display(),
            request.output.display()
        );

        Ok(())
    }
}

/// Keep the last few stderr lines for error messages.
async fn collect_stderr_tail(stderr: tokio::process::ChildStderr) -> String {
    let mut tail: Vec<String> = Vec::new();
    let mut lines = BufReader::new(stderr).lines();

    while let Ok(Some(line)) = lines.next_line().await {
        if tail.len() == STDERR_TAIL_LINES {
            tail.remove(0);
        }
        tail.push(line);
    }

    tail.join("\n")
}

/// Accumulator for one `-progress` key=value block.
#[derive(Debug, Default)]
struct ProgressBlock {
    out_time_us: Option<i64>,
    timemark: Option<String>,
    frames: Option<u64>,
    bitrate_kbps: Option<f64>,
    speed: Option<f64>,
}

impl ProgressBlock {
    fn set(&mut self, key: &str, value: &str) {
        let value = value.trim();
        match key {
            // out_time_ms is microseconds too (long-standing ffmpeg quirk);
            // prefer out_time_us when both appear.
            "out_time_us" => self.out_time_us = value.parse().ok(),
            "out_time_ms" => {
                if self.out_time_us.is_none() {
                    self.out_time_us = value.parse().ok();
                }
            }
            "out_time" => self.timemark = Some(value.to_string()),
            "frame" => self.frames = value.parse().ok(),
            "bitrate" => {
                self.bitrate_kbps = value
                    .strip_suffix("kbits/s")
                    .and_then(|v| v.trim().parse().ok());
            }
            "speed" => {
                self.speed = value.strip_suffix('x').and_then(|v| v.trim().parse().ok());
            }
            _ => {}
        }
    }

    fn into_sample(self, duration_secs: Option<f64>) -> ProgressSample {
        let percent = match (self.out_time_us, duration_secs) {
            (Some(us), Some(duration)) if us >= 0 => {
                Some(us as f64 / 1_000_000.0 / duration * 100.0)
            }
            _ => None,
        };

        ProgressSample {
            percent,
            frames: self.frames,
            bitrate_kbps: self.bitrate_kbps,
            speed: self.speed,
            timemark: self.timemark,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block_from(lines: &[&str]) -> ProgressBlock {
        let mut block = ProgressBlock::default();
        for line in lines {
            let (key, value) = line.split_once('=').unwrap();
            block.set(key, value);
        }
        block
    }

    #[test]
    fn parses_full_progress_block() {
        let block = block_from(&[
            "frame=1234",
            "bitrate= 128.0kbits/s",
            "out_time_us=30000000",
            "out_time=00:00:30.000000",
            "speed=12.3x",
            "progress=continue",
        ]);

        let sample = block.into_sample(Some(60.0));
        assert_eq!(sample.percent, Some(50.0));
        assert_eq!(sample.frames, Some(1234));
        assert_eq!(sample.speed, Some(12.3));
        assert_eq!(sample.timemark.as_deref(), Some("00:00:30.000000"));
    }

    #[test]
    fn missing_duration_yields_no_percent() {
        let block = block_from(&["out_time_us=30000000", "progress=continue"]);
        let sample = block.into_sample(None);
        assert!(sample.percent.is_none());
    }

    #[test]
    fn out_time_ms_is_a_fallback_for_out_time_us() {
        // Same value under both keys: the _us key wins.
        let block = block_from(&["out_time_ms=15000000", "out_time_us=30000000"]);
        assert_eq!(block.out_time_us, Some(30000000));

        let only_ms = block_from(&["out_time_ms=15000000"]);
        assert_eq!(only_ms.out_time_us, Some(15000000));
    }

    #[test]
    fn unparsable_values_are_skipped() {
        let block = block_from(&["frame=N/A", "bitrate=N/A", "out_time_us=N/A"]);
        let sample = block.into_sample(Some(60.0));
        assert!(sample.percent.is_none());
        assert!(sample.frames.is_none());
        assert!(sample.bitrate_kbps.is_none());
    }
}
