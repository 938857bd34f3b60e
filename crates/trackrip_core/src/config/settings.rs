//! Settings struct with TOML-based sections.

use serde::{Deserialize, Serialize};

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Engine (ffmpeg) configuration.
    #[serde(default)]
    pub engine: EngineSettings,

    /// Path-related settings.
    #[serde(default)]
    pub paths: PathSettings,
}

/// External tool and encoding configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSettings {
    /// ffmpeg binary (name or absolute path).
    #[serde(default = "default_ffmpeg")]
    pub ffmpeg_path: String,

    /// ffprobe binary (name or absolute path).
    #[serde(default = "default_ffprobe")]
    pub ffprobe_path: String,

    /// Audio container/format for extracted files.
    #[serde(default = "default_format")]
    pub output_format: String,

    /// Audio bitrate passed to the encoder.
    #[serde(default = "default_bitrate")]
    pub audio_bitrate: String,
}

fn default_ffmpeg() -> String {
    "ffmpeg".to_string()
}

fn default_ffprobe() -> String {
    "ffprobe".to_string()
}

fn default_format() -> String {
    "mp3".to_string()
}

fn default_bitrate() -> String {
    "128k".to_string()
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg(),
            ffprobe_path: default_ffprobe(),
            output_format: default_format(),
            audio_bitrate: default_bitrate(),
        }
    }
}

/// Path configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathSettings {
    /// File the processed-files history is persisted to.
    #[serde(default = "default_history_file")]
    pub history_file: String,
}

fn default_history_file() -> String {
    "history.json".to_string()
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            history_file: default_history_file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_original_tool() {
        let settings = Settings::default();
        assert_eq!(settings.engine.output_format, "mp3");
        assert_eq!(settings.engine.audio_bitrate, "128k");
        assert_eq!(settings.engine.ffmpeg_path, "ffmpeg");
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [engine]
            audio_bitrate = "192k"
            "#,
        )
        .unwrap();

        assert_eq!(settings.engine.audio_bitrate, "192k");
        assert_eq!(settings.engine.output_format, "mp3");
        assert_eq!(settings.paths.history_file, "history.json");
    }
}
