use crate::config::default_reveal_after_download;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Download configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Where downloads are written (None = the user's downloads folder).
    #[serde(default)]
    pub download_dir: Option<PathBuf>,
    /// Open the saved file with the system handler after a download.
    #[serde(default = "default_reveal_after_download")]
    pub reveal_after_download: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            download_dir: None,
            reveal_after_download: default_reveal_after_download(),
        }
    }
}
