use crate::{media::ObjectUrl, recorder::SealedArtifact};

use std::fmt;

use serde::Serialize;
use uuid::Uuid;

/// Controller phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecorderPhase {
    /// Nothing recording, no artifact shown.
    Idle,
    /// Capturing and encoding.
    Recording,
    /// Recording finished; an artifact (possibly unusable) is shown.
    Stopped,
}

impl RecorderPhase {
    /// Lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecorderPhase::Idle => "idle",
            RecorderPhase::Recording => "recording",
            RecorderPhase::Stopped => "stopped",
        }
    }
}

impl fmt::Display for RecorderPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a stopped recording.
#[derive(Debug, Clone)]
pub enum ArtifactStatus {
    /// Playable recording with a live preview URL.
    Usable {
        /// The sealed recording.
        artifact: SealedArtifact,
        /// Object URL for previewing it.
        preview_url: ObjectUrl,
    },
    /// Recording failed to produce playable output.
    Unusable {
        /// Why it is unusable.
        reason: String,
    },
}

/// Notifications broadcast by the controller.
#[derive(Debug, Clone)]
pub enum RecorderEvent {
    /// The controller entered a new phase.
    PhaseChanged {
        /// New phase.
        phase: RecorderPhase,
        /// Session the phase belongs to, if any.
        session_id: Option<Uuid>,
    },
    /// A recording was sealed and can be played back.
    ArtifactReady {
        /// Session that produced it.
        session_id: Uuid,
        /// Size in bytes.
        size: usize,
        /// Preview URL.
        preview_url: ObjectUrl,
    },
    /// An operation failed and the user should be told.
    Failed {
        /// Session involved, if any.
        session_id: Option<Uuid>,
        /// Error message.
        message: String,
    },
}
