//! Saves finished recordings into the downloads folder.

use crate::{AppResult, config::{Config, OutputConfig}};

use humanai_recorder_core::{CoreResult, FileSaver, MediaBlob, RecorderError};

use std::{
    fs,
    io::Write,
    panic::Location,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use directories::UserDirs;
use error_location::ErrorLocation;
use tracing::{info, instrument};

/// [`FileSaver`] writing into a fixed directory.
pub(crate) struct DownloadSaver {
    dir: PathBuf,
}

impl DownloadSaver {
    /// Saver for the configured directory, else the user's downloads
    /// folder, else the app's data directory.
    #[track_caller]
    pub(crate) fn new(config: &OutputConfig) -> AppResult<Self> {
        let user_downloads =
            UserDirs::new().and_then(|dirs| dirs.download_dir().map(Path::to_path_buf));
        let dir = match (&config.download_dir, user_downloads) {
            (Some(dir), _) => dir.clone(),
            (None, Some(dir)) => dir,
            (None, None) => Config::project_dirs()?.data_dir().join("recordings"),
        };

        info!(download_dir = ?dir, "Downloads directory resolved");

        Ok(Self::with_dir(dir))
    }

    pub(crate) fn with_dir(dir: PathBuf) -> Self {
        Self { dir }
    }
}

#[async_trait]
impl FileSaver for DownloadSaver {
    #[instrument(skip(self, blob), fields(size = blob.size()))]
    async fn save(&self, blob: &MediaBlob, filename: &str) -> CoreResult<PathBuf> {
        if filename.is_empty() || filename.contains(['/', '\\']) || filename.starts_with('.') {
            return Err(RecorderError::FileSave {
                reason: format!("invalid download filename '{}'", filename),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let target = self.dir.join(filename);
        let blob = blob.clone();

        let written = tokio::task::spawn_blocking(move || {
            write_atomically(&target, blob.bytes()).map(|()| target)
        })
        .await;

        match written {
            Ok(Ok(path)) => {
                info!(path = ?path, "Recording saved");
                Ok(path)
            }
            Ok(Err(e)) => Err(RecorderError::FileSave {
                reason: e.to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
            Err(e) => Err(RecorderError::FileSave {
                reason: format!("save task failed: {}", e),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}

/// Write to `<path>.part` and rename, so a partial file never carries the
/// final name.
fn write_atomically(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension("part");
    let mut temp_file = fs::File::create(&temp_path)?;
    temp_file.write_all(bytes)?;
    temp_file.sync_all()?;

    fs::rename(&temp_path, path)
}
