use error_location::ErrorLocation;
use thiserror::Error;

/// Recording pipeline errors with source location tracking.
#[derive(Error, Debug)]
pub enum RecorderError {
    /// The user or the platform refused access to a capture device.
    #[error("Permission denied for {device} {location}")]
    PermissionDenied {
        /// Device that was refused (screen, webcam, microphone).
        device: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The requested capture device does not exist or cannot be opened.
    #[error("Device unavailable: {device}: {reason} {location}")]
    DeviceUnavailable {
        /// Device that could not be opened.
        device: String,
        /// Description of the device failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The user dismissed the screen picker.
    #[error("Capture cancelled by user {location}")]
    UserCancelled {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Stopping produced a recording with zero bytes.
    #[error("Recording resulted in empty artifact {location}")]
    EmptyArtifact {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A single composited frame could not be drawn.
    #[error("Frame draw failed: {reason} {location}")]
    TransientDraw {
        /// Description of the draw failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The encoder could not produce a finalized recording.
    #[error("Encoder finalization failed: {reason} {location}")]
    Finalization {
        /// Description of the finalization failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The encoder could not be started.
    #[error("Encoder error: {reason} {location}")]
    Encoder {
        /// Description of the encoder failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Operation is not valid in the controller's current phase.
    #[error("Cannot {operation} while {phase} {location}")]
    InvalidTransition {
        /// The rejected operation.
        operation: &'static str,
        /// Phase the controller was in.
        phase: &'static str,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// No usable recording is available.
    #[error("No recording available {location}")]
    NoArtifact {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Saving the recording to a file failed.
    #[error("Failed to save recording: {reason} {location}")]
    FileSave {
        /// Description of the save failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

impl RecorderError {
    /// True for errors raised while acquiring capture devices.
    ///
    /// These all surface to the user as one "failed to start recording" condition.
    pub fn is_acquisition_failure(&self) -> bool {
        matches!(
            self,
            RecorderError::PermissionDenied { .. }
                | RecorderError::DeviceUnavailable { .. }
                | RecorderError::UserCancelled { .. }
        )
    }
}

/// Result type alias using [`RecorderError`].
pub type Result<T> = std::result::Result<T, RecorderError>;
