use crate::{
    CoreResult,
    compositor::{CanvasSize, Corner, Rect, RgbaCanvas, overlay_rect},
    media::{MediaTrack, TrackSettings, VideoFrame},
};

use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

/// Result of one render tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// A frame was processed; schedule the next tick.
    Continue,
    /// The loop has been stopped; do not schedule again.
    Halted,
}

/// Mutable compositing state for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompositorState {
    /// Canvas dimensions, fixed for the session.
    pub canvas: CanvasSize,
    /// Corner the webcam overlay is anchored to.
    pub corner: Corner,
    /// Whether the webcam overlay is drawn.
    pub webcam_visible: bool,
    /// Whether the draw loop keeps rescheduling itself.
    pub running: bool,
}

/// Composites the screen and an optional webcam overlay onto one canvas.
///
/// Driven by an external refresh source calling [`FrameCompositor::render_tick`]
/// once per display refresh. Each composited frame is published on a watch
/// channel; that channel is the only way other components see the canvas.
pub struct FrameCompositor {
    state: CompositorState,
    canvas: RgbaCanvas,
    screen: MediaTrack,
    webcam: Option<MediaTrack>,
    output: watch::Sender<Option<VideoFrame>>,
    frames_drawn: u64,
    draw_errors: u64,
}

impl FrameCompositor {
    /// Create a running compositor sized after the screen track.
    #[instrument(skip(screen, webcam))]
    pub fn new(
        screen: MediaTrack,
        webcam: Option<MediaTrack>,
        corner: Corner,
        webcam_visible: bool,
    ) -> Self {
        let canvas_size = CanvasSize::from_settings(&screen.settings());
        let (output, _) = watch::channel(None);

        info!(
            width = canvas_size.width,
            height = canvas_size.height,
            has_webcam = webcam.is_some(),
            "Compositor initialized"
        );

        Self {
            state: CompositorState {
                canvas: canvas_size,
                corner,
                webcam_visible,
                running: true,
            },
            canvas: RgbaCanvas::new(canvas_size),
            screen,
            webcam,
            output,
            frames_drawn: 0,
            draw_errors: 0,
        }
    }

    /// Current state.
    pub fn state(&self) -> &CompositorState {
        &self.state
    }

    /// Whether the loop is still running.
    pub fn is_running(&self) -> bool {
        self.state.running
    }

    /// Move the overlay. Applies from the next tick.
    pub fn set_corner(&mut self, corner: Corner) {
        self.state.corner = corner;
        debug!(corner = %corner, "Webcam corner changed");
    }

    /// Show or hide the overlay. Applies from the next tick.
    pub fn set_webcam_visible(&mut self, visible: bool) {
        self.state.webcam_visible = visible;
        debug!(visible, "Webcam visibility changed");
    }

    /// Stop the loop. The next tick returns [`TickOutcome::Halted`].
    pub fn stop(&mut self) {
        if self.state.running {
            self.state.running = false;
            info!(
                frames_drawn = self.frames_drawn,
                draw_errors = self.draw_errors,
                "Compositor stopped"
            );
        }
    }

    /// Frames composited successfully.
    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    /// Ticks whose draw failed.
    pub fn draw_errors(&self) -> u64 {
        self.draw_errors
    }

    /// Current canvas pixels.
    pub fn canvas(&self) -> &image::RgbaImage {
        self.canvas.image()
    }

    /// Subscribe to composited frames.
    pub fn canvas_stream(&self) -> watch::Receiver<Option<VideoFrame>> {
        self.output.subscribe()
    }

    /// A video track that carries the composited canvas.
    pub fn canvas_track(&self) -> MediaTrack {
        let size = self.state.canvas;
        MediaTrack::video(
            "composited-canvas",
            TrackSettings::video(size.width, size.height),
            self.canvas_stream(),
            || {},
        )
    }

    /// Run one iteration of the draw loop.
    ///
    /// A failed draw is logged and counted; it never ends the loop.
    pub fn render_tick(&mut self) -> TickOutcome {
        if !self.state.running {
            return TickOutcome::Halted;
        }

        match self.draw_frame() {
            Ok(()) => {
                self.frames_drawn += 1;
                self.output.send_replace(Some(self.canvas.snapshot()));
            }
            Err(e) => {
                self.draw_errors += 1;
                warn!(error = %e, draw_errors = self.draw_errors, "Frame draw failed, continuing");
            }
        }

        TickOutcome::Continue
    }

    fn draw_frame(&mut self) -> CoreResult<()> {
        self.canvas.clear();

        if let Some(frame) = self.screen.latest_frame() {
            self.canvas.draw(&frame, Rect::full(self.state.canvas))?;
        }

        if !self.state.webcam_visible {
            return Ok(());
        }

        if let Some(frame) = self.webcam.as_ref().and_then(MediaTrack::latest_frame) {
            let rect = overlay_rect(self.state.canvas, self.state.corner);
            self.canvas.draw(&frame, rect)?;
        }

        Ok(())
    }
}
