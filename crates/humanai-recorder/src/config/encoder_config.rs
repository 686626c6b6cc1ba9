use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Encoder configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EncoderConfig {
    /// ffmpeg binary to use (None = search `PATH`).
    #[serde(default)]
    pub ffmpeg_path: Option<PathBuf>,
}
