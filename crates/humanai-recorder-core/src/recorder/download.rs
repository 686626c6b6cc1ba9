use crate::{CoreResult, media::MediaBlob, recorder::container_extension};

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Save-as-file action for a finished recording.
#[async_trait]
pub trait FileSaver: Send + Sync {
    /// Persist `blob` under `filename`. Returns where it was written.
    ///
    /// # Errors
    ///
    /// `FileSave` if the blob could not be written.
    async fn save(&self, blob: &MediaBlob, filename: &str) -> CoreResult<PathBuf>;
}

/// Download filename for a recording saved at `at`.
pub fn artifact_filename(at: DateTime<Utc>, mime_type: &str) -> String {
    format!(
        "screen-recording-{}.{}",
        at.timestamp_millis(),
        container_extension(mime_type)
    )
}
