use crate::{CoreResult, RecorderError, media::MediaBlob};

use std::panic::Location;

use chrono::{DateTime, Utc};
use error_location::ErrorLocation;
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// Encoded chunks collected during one recording.
#[derive(Debug)]
pub struct RecordingArtifact {
    id: Uuid,
    mime_type: String,
    chunks: Vec<Vec<u8>>,
    total_bytes: usize,
}

impl RecordingArtifact {
    /// Create an empty artifact of the given container type.
    pub fn new(mime_type: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            mime_type: mime_type.into(),
            chunks: Vec::new(),
            total_bytes: 0,
        }
    }

    /// Artifact id.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Container type.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Chunks appended so far.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Bytes appended so far.
    pub fn total_bytes(&self) -> usize {
        self.total_bytes
    }

    /// Append a chunk. Empty chunks are dropped; returns whether it was kept.
    pub fn append(&mut self, chunk: Vec<u8>) -> bool {
        if chunk.is_empty() {
            return false;
        }

        self.total_bytes += chunk.len();
        self.chunks.push(chunk);

        debug!(
            artifact_id = %self.id,
            chunk_count = self.chunks.len(),
            total_bytes = self.total_bytes,
            "Chunk appended"
        );

        true
    }

    /// Concatenate the chunks, in order, into the final blob.
    ///
    /// # Errors
    ///
    /// `EmptyArtifact` if no bytes were recorded.
    #[track_caller]
    #[instrument(skip(self), fields(artifact_id = %self.id))]
    pub fn seal(self) -> CoreResult<SealedArtifact> {
        if self.total_bytes == 0 {
            return Err(RecorderError::EmptyArtifact {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let chunk_count = self.chunks.len();
        let data = self.chunks.concat();

        info!(
            chunk_count,
            total_bytes = data.len(),
            mime_type = %self.mime_type,
            "Artifact sealed"
        );

        Ok(SealedArtifact {
            id: self.id,
            blob: MediaBlob::new(self.mime_type, data),
            chunk_count,
            sealed_at: Utc::now(),
        })
    }
}

/// The finished, immutable recording.
#[derive(Debug, Clone)]
pub struct SealedArtifact {
    id: Uuid,
    blob: MediaBlob,
    chunk_count: usize,
    sealed_at: DateTime<Utc>,
}

impl SealedArtifact {
    /// Artifact id.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The recording bytes and their type.
    pub fn blob(&self) -> &MediaBlob {
        &self.blob
    }

    /// Number of chunks concatenated into the blob.
    pub fn chunk_count(&self) -> usize {
        self.chunk_count
    }

    /// When the artifact was sealed.
    pub fn sealed_at(&self) -> DateTime<Utc> {
        self.sealed_at
    }
}
