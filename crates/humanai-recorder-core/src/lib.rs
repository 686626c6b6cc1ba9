//! HumanAI Recorder Core Library
//!
//! Screen + webcam compositing recorder: acquires live capture sources,
//! composites the webcam over the screen on a canvas, synthesizes one
//! output stream and records it into a downloadable artifact.
//!
//! Platform capture, encoding and file saving are reached through the
//! [`DisplayCapture`], [`DeviceCapture`], [`EncoderSink`] and [`FileSaver`]
//! traits.
//!
//! # Example
//!
//! ```no_run
//! use humanai_recorder_core::{
//!     CaptureManager, CoreResult, DeviceCapture, DisplayCapture, EncoderSink, FileSaver,
//!     RecorderOptions, RecordingController, TickOutcome,
//! };
//!
//! use std::time::Duration;
//!
//! async fn record(
//!     display: Box<dyn DisplayCapture>,
//!     devices: Box<dyn DeviceCapture>,
//!     encoder: Box<dyn EncoderSink>,
//!     saver: Box<dyn FileSaver>,
//! ) -> CoreResult<()> {
//!     let capture = CaptureManager::new(display, devices);
//!     let mut recorder =
//!         RecordingController::new(capture, encoder, saver, RecorderOptions::default());
//!
//!     recorder.start().await?;
//!     let mut refresh = tokio::time::interval(Duration::from_millis(16));
//!     for _ in 0..180 {
//!         refresh.tick().await;
//!         if recorder.render_tick() == TickOutcome::Halted {
//!             break;
//!         }
//!     }
//!     recorder.stop().await?;
//!
//!     let path = recorder.download().await?;
//!     println!("Saved to {}", path.display());
//!     Ok(())
//! }
//! ```

mod capture;
mod compositor;
mod error;
mod media;
mod recorder;
mod synth;

pub use {
    capture::{
        AudioConstraints, CaptureManager, CaptureSession, CaptureSource, DeviceCapture,
        DisplayCapture, DisplayRequest, SourceRole, UserMediaRequest,
    },
    compositor::{
        CanvasSize, CompositorState, Corner, DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH,
        FrameCompositor, OVERLAY_INSET, ParseCornerError, Rect, RgbaCanvas, TickOutcome,
        overlay_rect,
    },
    error::{RecorderError, Result as CoreResult},
    media::{
        MediaBlob, MediaStream, MediaTrack, ObjectUrl, ObjectUrlStore, TrackControl, TrackKind,
        TrackSettings, VideoFrame,
    },
    recorder::{
        ArtifactStatus, EncoderEvent, EncoderOptions, EncoderSink, FALLBACK_MIME_TYPE, FileSaver,
        MIME_CANDIDATES, RecorderEvent, RecorderOptions, RecorderPhase, RecorderProfile,
        RecordingArtifact, RecordingController, SealedArtifact, artifact_filename,
        container_extension, select_mime_type,
    },
    synth::{CANVAS_FRAME_RATE, FrameSampler, OutputStream, StreamSynthesizer},
};

#[cfg(test)]
mod tests;
