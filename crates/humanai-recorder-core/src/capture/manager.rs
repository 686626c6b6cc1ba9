use crate::{
    CoreResult, RecorderError,
    capture::{
        CaptureSession, CaptureSource, DeviceCapture, DisplayCapture, DisplayRequest, SourceRole,
        UserMediaRequest,
    },
    media::MediaTrack,
    recorder::RecorderProfile,
};

use std::panic::Location;

use error_location::ErrorLocation;
use tracing::{info, instrument, warn};

/// Acquires and releases the live sources for a recording.
pub struct CaptureManager {
    display: Box<dyn DisplayCapture>,
    devices: Box<dyn DeviceCapture>,
}

impl CaptureManager {
    /// Create a manager over the platform's capture providers.
    pub fn new(display: Box<dyn DisplayCapture>, devices: Box<dyn DeviceCapture>) -> Self {
        Self { display, devices }
    }

    /// Acquire every source the profile needs, in order.
    ///
    /// Display (video + audio) first, then the webcam if the profile
    /// composites one, then the microphone. Each request is awaited before
    /// the next is made.
    ///
    /// # Errors
    ///
    /// Returns the first acquisition error. Any source acquired before the
    /// failure has already been released when this returns.
    pub async fn acquire(&self, profile: RecorderProfile) -> CoreResult<CaptureSession> {
        let (session, _) = self.acquire_with_screen(profile).await?;
        Ok(session)
    }

    /// Like [`CaptureManager::acquire`], also handing back the screen's
    /// video track.
    #[instrument(skip(self))]
    pub(crate) async fn acquire_with_screen(
        &self,
        profile: RecorderProfile,
    ) -> CoreResult<(CaptureSession, MediaTrack)> {
        let mut session = CaptureSession::new();

        let screen = match self.acquire_into(&mut session, profile).await {
            Ok(screen) => screen,
            Err(e) => {
                let released = session.release();
                warn!(
                    session_id = %session.id(),
                    released_tracks = released,
                    error = %e,
                    "Acquisition failed, released partial session"
                );
                return Err(e);
            }
        };

        info!(
            session_id = %session.id(),
            live_tracks = session.live_track_count(),
            "All capture sources acquired"
        );

        Ok((session, screen))
    }

    async fn acquire_into(
        &self,
        session: &mut CaptureSession,
        profile: RecorderProfile,
    ) -> CoreResult<MediaTrack> {
        let screen = self
            .display
            .request_display_capture(DisplayRequest {
                video: true,
                audio: Some(profile.screen_audio()),
            })
            .await?;
        let screen_video = screen.video_tracks().next().cloned();
        session.attach(CaptureSource::new(SourceRole::Screen, screen));

        let Some(screen_video) = screen_video else {
            return Err(RecorderError::DeviceUnavailable {
                device: SourceRole::Screen.to_string(),
                reason: "display capture granted no video track".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        };

        if profile.uses_webcam() {
            let webcam = self
                .devices
                .request_user_media(UserMediaRequest {
                    video: true,
                    audio: None,
                })
                .await?;
            session.attach(CaptureSource::new(SourceRole::Webcam, webcam));
        }

        let microphone = self
            .devices
            .request_user_media(UserMediaRequest {
                video: false,
                audio: Some(profile.microphone_audio()),
            })
            .await?;
        session.attach(CaptureSource::new(SourceRole::Microphone, microphone));

        Ok(screen_video)
    }
}
