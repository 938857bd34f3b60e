//! Source-file pickers for the app shell.

use std::path::PathBuf;

use trackrip_core::orchestrator::SourcePicker;

/// Container extensions the open dialog filters to.
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mkv", "mov"];

/// Picker used by the binary: a native open dialog, or a fixed path when
/// one was passed on the command line.
pub enum AppPicker {
    /// Ask via the platform file dialog.
    Dialog,
    /// Use this path without asking.
    Fixed(PathBuf),
}

impl SourcePicker for AppPicker {
    async fn pick_source(&self) -> Option<PathBuf> {
        match self {
            AppPicker::Fixed(path) => Some(path.clone()),
            AppPicker::Dialog => {
                rfd::AsyncFileDialog::new()
                    .set_title("Select Video")
                    .add_filter("Videos", VIDEO_EXTENSIONS)
                    .pick_file()
                    .await
                    .map(|f| f.path().to_path_buf())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixed_picker_returns_its_path() {
        let picker = AppPicker::Fixed(PathBuf::from("/videos/a.mp4"));
        assert_eq!(
            picker.pick_source().await,
            Some(PathBuf::from("/videos/a.mp4"))
        );
    }
}
