//! Recording state machine.
//!
//! Drives one recording at a time through `Idle -> Recording -> Stopped`,
//! owning the capture session, the compositor and the encoder run for the
//! duration of a recording.

use crate::{
    CoreResult, RecorderError,
    capture::{CaptureManager, CaptureSession},
    compositor::{Corner, FrameCompositor, TickOutcome},
    media::{ObjectUrl, ObjectUrlStore},
    recorder::{
        ArtifactStatus, EncoderEvent, EncoderOptions, EncoderSink, FileSaver, RecorderEvent,
        RecorderOptions, RecorderPhase, RecordingArtifact, SealedArtifact, artifact_filename,
        select_mime_type,
    },
    synth::{OutputStream, StreamSynthesizer},
};

use std::{
    panic::Location,
    path::PathBuf,
    time::{Duration, Instant},
};

use chrono::Utc;
use error_location::ErrorLocation;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Everything owned by an in-progress recording.
struct ActiveRecording {
    session_id: Uuid,
    capture: CaptureSession,
    compositor: Option<FrameCompositor>,
    output: OutputStream,
    encoder_events: mpsc::UnboundedReceiver<EncoderEvent>,
    artifact: RecordingArtifact,
    terminal: Option<Result<(), String>>,
    started_at: Instant,
}

impl ActiveRecording {
    /// Append every chunk already delivered by the encoder.
    fn drain_encoder_events(&mut self) {
        while self.terminal.is_none() {
            match self.encoder_events.try_recv() {
                Ok(event) => self.apply(event),
                Err(mpsc::error::TryRecvError::Empty) => break,
                Err(mpsc::error::TryRecvError::Disconnected) => {
                    self.terminal = Some(Err("encoder closed without finalizing".to_string()));
                }
            }
        }
    }

    fn apply(&mut self, event: EncoderEvent) {
        match event {
            EncoderEvent::Chunk(chunk) => {
                self.artifact.append(chunk);
            }
            EncoderEvent::Finalized => {
                debug!(session_id = %self.session_id, "Encoder finalized");
                self.terminal = Some(Ok(()));
            }
            EncoderEvent::Failed(reason) => {
                error!(session_id = %self.session_id, reason = %reason, "Encoder failed");
                self.terminal = Some(Err(reason));
            }
        }
    }

    /// Wait for the encoder's terminal event, appending chunks as they arrive.
    async fn await_finalization(
        &mut self,
        encoder: &mut dyn EncoderSink,
        timeout: Duration,
    ) -> CoreResult<()> {
        self.drain_encoder_events();

        if self.terminal.is_none() {
            let wait = async {
                while self.terminal.is_none() {
                    match self.encoder_events.recv().await {
                        Some(event) => self.apply(event),
                        None => {
                            self.terminal =
                                Some(Err("encoder closed without finalizing".to_string()));
                        }
                    }
                }
            };

            if tokio::time::timeout(timeout, wait).await.is_err() {
                warn!(
                    session_id = %self.session_id,
                    timeout_ms = timeout.as_millis(),
                    "Encoder did not finalize in time, forcing stop"
                );
                encoder.force_stop();
                self.terminal = Some(Err(format!(
                    "encoder did not finalize within {}ms",
                    timeout.as_millis()
                )));
            }
        }

        match self.terminal.take() {
            Some(Ok(())) => Ok(()),
            Some(Err(reason)) => Err(RecorderError::Finalization {
                reason,
                location: ErrorLocation::from(Location::caller()),
            }),
            None => Err(RecorderError::Finalization {
                reason: "encoder produced no terminal event".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}

enum Phase {
    Idle,
    Recording(Box<ActiveRecording>),
    Stopped {
        session_id: Uuid,
        status: ArtifactStatus,
    },
}

impl Phase {
    fn name(&self) -> RecorderPhase {
        match self {
            Phase::Idle => RecorderPhase::Idle,
            Phase::Recording(_) => RecorderPhase::Recording,
            Phase::Stopped { .. } => RecorderPhase::Stopped,
        }
    }
}

/// Start/stop/restart state machine over the whole recording pipeline.
///
/// Single-owner and not thread-safe: one controller drives at most one
/// recording, and every operation is gated on the current phase.
pub struct RecordingController {
    capture: CaptureManager,
    encoder: Box<dyn EncoderSink>,
    saver: Box<dyn FileSaver>,
    urls: ObjectUrlStore,
    options: RecorderOptions,
    phase: Phase,
    events: broadcast::Sender<RecorderEvent>,
}

impl RecordingController {
    /// Create an idle controller.
    pub fn new(
        capture: CaptureManager,
        encoder: Box<dyn EncoderSink>,
        saver: Box<dyn FileSaver>,
        options: RecorderOptions,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Self {
            capture,
            encoder,
            saver,
            urls: ObjectUrlStore::new(),
            options,
            phase: Phase::Idle,
            events,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> RecorderPhase {
        self.phase.name()
    }

    /// Subscribe to phase changes and results.
    pub fn subscribe(&self) -> broadcast::Receiver<RecorderEvent> {
        self.events.subscribe()
    }

    /// Current options, including the live webcam corner and visibility.
    pub fn options(&self) -> &RecorderOptions {
        &self.options
    }

    /// Object URLs currently held by the controller.
    pub fn object_urls(&self) -> &ObjectUrlStore {
        &self.urls
    }

    /// The running compositor, while recording with one.
    pub fn compositor(&self) -> Option<&FrameCompositor> {
        match &self.phase {
            Phase::Recording(active) => active.compositor.as_ref(),
            _ => None,
        }
    }

    /// The live capture session, while recording.
    pub fn capture_session(&self) -> Option<&CaptureSession> {
        match &self.phase {
            Phase::Recording(active) => Some(&active.capture),
            _ => None,
        }
    }

    /// The stream being encoded, while recording.
    pub fn output_stream(&self) -> Option<&OutputStream> {
        match &self.phase {
            Phase::Recording(active) => Some(&active.output),
            _ => None,
        }
    }

    /// Outcome of the last recording, while stopped.
    pub fn artifact_status(&self) -> Option<&ArtifactStatus> {
        match &self.phase {
            Phase::Stopped { status, .. } => Some(status),
            _ => None,
        }
    }

    /// Preview URL of a usable recording.
    pub fn preview_url(&self) -> Option<&ObjectUrl> {
        match self.artifact_status()? {
            ArtifactStatus::Usable { preview_url, .. } => Some(preview_url),
            ArtifactStatus::Unusable { .. } => None,
        }
    }

    /// Move the webcam overlay. Remembered for later recordings.
    pub fn set_webcam_corner(&mut self, corner: Corner) {
        self.options.webcam_corner = corner;
        if let Phase::Recording(active) = &mut self.phase
            && let Some(compositor) = active.compositor.as_mut()
        {
            compositor.set_corner(corner);
        }
    }

    /// Show or hide the webcam overlay. Remembered for later recordings.
    pub fn set_webcam_visible(&mut self, visible: bool) {
        self.options.show_webcam = visible;
        if let Phase::Recording(active) = &mut self.phase
            && let Some(compositor) = active.compositor.as_mut()
        {
            compositor.set_webcam_visible(visible);
        }
    }

    /// Begin a recording. Valid only while idle.
    ///
    /// Acquires the sources, starts the compositor, synthesizes the output
    /// stream and starts the encoder. On failure nothing is left running and
    /// the controller stays idle.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` when not idle, acquisition errors from the
    /// capture providers, `Encoder` if encoding cannot start.
    #[instrument(skip(self), fields(profile = ?self.options.profile))]
    pub async fn start(&mut self) -> CoreResult<Uuid> {
        if !matches!(self.phase, Phase::Idle) {
            return Err(self.invalid_transition("start"));
        }

        match self.begin_recording().await {
            Ok(active) => {
                let session_id = active.session_id;
                self.phase = Phase::Recording(active);
                self.emit_phase(Some(session_id));
                info!(session_id = %session_id, "Recording started");
                Ok(session_id)
            }
            Err(e) => {
                error!(error = %e, "Failed to start recording");
                self.emit(RecorderEvent::Failed {
                    session_id: None,
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    async fn begin_recording(&mut self) -> CoreResult<Box<ActiveRecording>> {
        let profile = self.options.profile;
        let (mut capture, screen) = self.capture.acquire_with_screen(profile).await?;

        let (compositor, video) = if profile.uses_compositor() {
            let compositor = FrameCompositor::new(
                screen,
                capture.webcam_video_track().cloned(),
                self.options.webcam_corner,
                self.options.show_webcam,
            );
            let canvas_track = compositor.canvas_track();
            (Some(compositor), canvas_track)
        } else {
            (None, screen)
        };

        let output = StreamSynthesizer::synthesize(video, &capture);
        let mime_type = select_mime_type(self.encoder.as_ref());
        let options = EncoderOptions {
            mime_type: mime_type.clone(),
            timeslice: profile.timeslice(),
            video_bits_per_second: profile.video_bits_per_second(),
        };

        let encoder_events = match self.encoder.start_encoding(output.clone(), options).await {
            Ok(rx) => rx,
            Err(e) => {
                output.video_track().stop();
                capture.release();
                return Err(e);
            }
        };

        let session_id = capture.id();
        Ok(Box::new(ActiveRecording {
            session_id,
            capture,
            compositor,
            output,
            encoder_events,
            artifact: RecordingArtifact::new(mime_type),
            terminal: None,
            started_at: Instant::now(),
        }))
    }

    /// One iteration of the render loop: composite a frame and collect any
    /// chunks the encoder has produced.
    ///
    /// Returns [`TickOutcome::Halted`] when no recording is running.
    pub fn render_tick(&mut self) -> TickOutcome {
        let Phase::Recording(active) = &mut self.phase else {
            return TickOutcome::Halted;
        };

        let outcome = match active.compositor.as_mut() {
            Some(compositor) => compositor.render_tick(),
            None => TickOutcome::Continue,
        };

        let pending = active.terminal.is_none();
        active.drain_encoder_events();

        // The recording keeps running until stop(); only report the failure.
        if pending && let Some(Err(reason)) = &active.terminal {
            let session_id = active.session_id;
            let message = format!("Encoding failed while recording: {}", reason);
            warn!(session_id = %session_id, reason = %reason, "Encoder ended mid-recording");
            self.emit(RecorderEvent::Failed {
                session_id: Some(session_id),
                message,
            });
        }

        outcome
    }

    /// Finish the recording. Valid only while recording.
    ///
    /// Asks the encoder to flush, halts the compositor, waits for
    /// finalization, releases every device and seals the artifact. Devices
    /// are released even when finalization fails. The controller ends up
    /// `Stopped` in every case; on error the artifact is marked unusable.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` when not recording, `Finalization` if the encoder
    /// did not finish cleanly, `EmptyArtifact` if nothing was recorded.
    #[instrument(skip(self))]
    pub async fn stop(&mut self) -> CoreResult<SealedArtifact> {
        let mut active = match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Recording(active) => active,
            other => {
                self.phase = other;
                return Err(self.invalid_transition("stop"));
            }
        };

        let session_id = active.session_id;
        self.encoder.request_stop();
        if let Some(compositor) = active.compositor.as_mut() {
            compositor.stop();
        }

        let finalized = active
            .await_finalization(self.encoder.as_mut(), self.options.finalize_timeout)
            .await;

        active.output.video_track().stop();
        let released = active.capture.release();

        let duration = active.started_at.elapsed();
        let mime_type = active.artifact.mime_type().to_string();
        let artifact = std::mem::replace(&mut active.artifact, RecordingArtifact::new(mime_type));
        drop(active);

        info!(
            session_id = %session_id,
            duration_ms = duration.as_millis(),
            chunk_count = artifact.chunk_count(),
            total_bytes = artifact.total_bytes(),
            released_tracks = released,
            "Recording stopped"
        );

        match finalized.and_then(|()| artifact.seal()) {
            Ok(sealed) => {
                let preview_url = self.urls.create(sealed.blob().clone());
                self.phase = Phase::Stopped {
                    session_id,
                    status: ArtifactStatus::Usable {
                        artifact: sealed.clone(),
                        preview_url: preview_url.clone(),
                    },
                };
                self.emit_phase(Some(session_id));
                self.emit(RecorderEvent::ArtifactReady {
                    session_id,
                    size: sealed.blob().size(),
                    preview_url,
                });
                Ok(sealed)
            }
            Err(e) => {
                error!(session_id = %session_id, error = %e, "Failed to create recording");
                self.phase = Phase::Stopped {
                    session_id,
                    status: ArtifactStatus::Unusable {
                        reason: e.to_string(),
                    },
                };
                self.emit_phase(Some(session_id));
                self.emit(RecorderEvent::Failed {
                    session_id: Some(session_id),
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Discard the last recording and start a new one. Valid only while stopped.
    ///
    /// Always passes through `Idle`; if the new start fails the controller
    /// stays there.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` when not stopped, otherwise as [`Self::start`].
    #[instrument(skip(self))]
    pub async fn restart(&mut self) -> CoreResult<Uuid> {
        if !matches!(self.phase, Phase::Stopped { .. }) {
            return Err(self.invalid_transition("restart"));
        }

        self.discard_artifact();
        self.start().await
    }

    /// Save the recording through the file saver. Valid only while stopped.
    ///
    /// A temporary object URL is created for the save and revoked as soon
    /// as the save returns.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` when not stopped, `NoArtifact` if the recording
    /// is unusable, `FileSave` if writing failed.
    #[instrument(skip(self))]
    pub async fn download(&mut self) -> CoreResult<PathBuf> {
        let artifact = match &self.phase {
            Phase::Stopped {
                status: ArtifactStatus::Usable { artifact, .. },
                ..
            } => artifact.clone(),
            Phase::Stopped { .. } => {
                return Err(RecorderError::NoArtifact {
                    location: ErrorLocation::from(Location::caller()),
                });
            }
            _ => return Err(self.invalid_transition("download")),
        };

        if artifact.blob().size() == 0 {
            return Err(RecorderError::EmptyArtifact {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let url = self.urls.create(artifact.blob().clone());
        let filename = artifact_filename(Utc::now(), artifact.blob().mime());

        let result = match self.urls.resolve(&url).cloned() {
            Some(blob) => self.saver.save(&blob, &filename).await,
            None => Err(RecorderError::NoArtifact {
                location: ErrorLocation::from(Location::caller()),
            }),
        };
        self.urls.revoke(&url);

        match &result {
            Ok(path) => info!(path = ?path, filename = %filename, "Recording downloaded"),
            Err(e) => error!(error = %e, "Download failed"),
        }

        result
    }

    /// Drop the recording and its preview and return to idle. Valid only
    /// while stopped. Does not start a new recording.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` when not stopped.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn delete(&mut self) -> CoreResult<()> {
        if !matches!(self.phase, Phase::Stopped { .. }) {
            return Err(self.invalid_transition("delete"));
        }

        self.discard_artifact();
        Ok(())
    }

    /// Stop any running recording, ignoring its outcome, and drop previews.
    #[instrument(skip(self))]
    pub async fn shutdown(&mut self) {
        if matches!(self.phase, Phase::Recording(_))
            && let Err(e) = self.stop().await
        {
            warn!(error = %e, "Recording did not finish cleanly during shutdown");
        }

        if matches!(self.phase, Phase::Stopped { .. }) {
            self.discard_artifact();
        }
    }

    fn discard_artifact(&mut self) {
        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Stopped { session_id, status } => {
                if let ArtifactStatus::Usable { preview_url, .. } = status {
                    self.urls.revoke(&preview_url);
                }
                debug!(session_id = %session_id, "Recording discarded");
                self.emit_phase(None);
            }
            other => self.phase = other,
        }
    }

    #[track_caller]
    fn invalid_transition(&self, operation: &'static str) -> RecorderError {
        let phase = self.phase.name();
        warn!(operation, phase = %phase, "Rejected operation");
        RecorderError::InvalidTransition {
            operation,
            phase: phase.as_str(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    fn emit_phase(&self, session_id: Option<Uuid>) {
        self.emit(RecorderEvent::PhaseChanged {
            phase: self.phase.name(),
            session_id,
        });
    }

    fn emit(&self, event: RecorderEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}
