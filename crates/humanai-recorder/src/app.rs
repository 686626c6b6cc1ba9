use crate::{
    AppCommand, AppResult,
    app_command::COMMAND_HELP,
    command_reader::spawn_command_reader,
    config::Config,
};

use humanai_recorder_core::{
    ArtifactStatus, RecorderEvent, RecorderPhase, RecordingController, TickOutcome,
};

use std::time::Duration;

use tokio::{
    sync::{broadcast, mpsc},
    time::MissedTickBehavior,
};
use tracing::{debug, error, info, instrument, warn};

const COMMAND_CHANNEL_CAPACITY: usize = 32;

/// Main application state.
///
/// Owns the recording controller and drives it from two sources: commands
/// read from stdin and the render refresh timer.
pub struct App {
    controller: RecordingController,
    config: Config,
    events: broadcast::Receiver<RecorderEvent>,
    command_tx: mpsc::Sender<AppCommand>,
    command_rx: mpsc::Receiver<AppCommand>,
}

impl App {
    pub(crate) fn new(controller: RecordingController, config: Config) -> Self {
        let events = controller.subscribe();
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);

        Self {
            controller,
            config,
            events,
            command_tx,
            command_rx,
        }
    }

    /// Run the main application event loop.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) -> AppResult<()> {
        info!("HumanAI Recorder starting");

        let reader_handle = spawn_command_reader(self.command_tx.clone());

        let mut refresh = tokio::time::interval(self.config.render.tick_interval());
        refresh.set_missed_tick_behavior(MissedTickBehavior::Skip);

        println!("{COMMAND_HELP}");

        loop {
            tokio::select! {
                _ = refresh.tick(), if self.controller.phase() == RecorderPhase::Recording => {
                    if self.controller.render_tick() == TickOutcome::Halted {
                        debug!("Render tick after recording ended");
                    }
                }

                Some(command) = self.command_rx.recv() => {
                    if command == AppCommand::Quit {
                        info!("Shutdown requested");
                        break;
                    }
                    if let Err(e) = self.handle_command(command).await {
                        error!(?command, error = %e, "Command failed");
                        println!("error: {e}");
                    }
                }

                event = self.events.recv() => match event {
                    Ok(event) => report_event(&event),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Missed recorder events");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },

                else => {
                    info!("All channels closed, shutting down");
                    break;
                }
            }
        }

        self.controller.shutdown().await;
        drop(self.command_rx);

        // The reader is parked on a blocking stdin read; it exits on the next
        // line or with the process.
        match tokio::time::timeout(Duration::from_secs(1), reader_handle).await {
            Ok(Ok(Ok(()))) => info!("Command reader stopped cleanly"),
            Ok(Ok(Err(e))) => debug!(error = %e, "Command reader stopped"),
            Ok(Err(e)) => error!(error = ?e, "Command reader task panicked"),
            Err(_) => debug!("Command reader still blocked on stdin, leaving it to exit"),
        }

        info!("HumanAI Recorder shut down successfully");

        Ok(())
    }

    #[instrument(skip(self))]
    async fn handle_command(&mut self, command: AppCommand) -> AppResult<()> {
        match command {
            AppCommand::Start => {
                let session_id = self.controller.start().await?;
                println!("recording ({session_id})");
            }
            AppCommand::Stop => {
                self.controller.stop().await?;
            }
            AppCommand::Restart => {
                let session_id = self.controller.restart().await?;
                println!("recording ({session_id})");
            }
            AppCommand::Download => {
                let path = self.controller.download().await?;
                println!("saved {}", path.display());
                if self.config.output.reveal_after_download
                    && let Err(e) = open::that(&path)
                {
                    warn!(error = %e, path = ?path, "Failed to open saved recording");
                }
            }
            AppCommand::Delete => {
                self.controller.delete()?;
                println!("recording deleted");
            }
            AppCommand::Corner(corner) => {
                self.controller.set_webcam_corner(corner);
                self.config.recorder.webcam_corner = corner;
                self.persist_config();
            }
            AppCommand::Webcam(visible) => {
                self.controller.set_webcam_visible(visible);
                self.config.recorder.show_webcam = visible;
                self.persist_config();
            }
            AppCommand::Status => self.print_status(),
            AppCommand::Help => println!("{COMMAND_HELP}"),
            AppCommand::Quit => {}
        }

        Ok(())
    }

    /// Remember overlay preferences for the next launch.
    fn persist_config(&self) {
        if let Err(e) = self.config.save() {
            warn!(error = %e, "Failed to save overlay preferences");
        }
    }

    fn print_status(&self) {
        let options = self.controller.options();
        println!("phase: {}", self.controller.phase());
        println!(
            "webcam: {} ({})",
            if options.show_webcam { "on" } else { "off" },
            options.webcam_corner
        );

        if let Some(session) = self.controller.capture_session() {
            println!(
                "session: {} ({} live tracks)",
                session.id(),
                session.live_track_count()
            );
        }
        if let Some(output) = self.controller.output_stream() {
            println!(
                "output: 1 video + {} audio @ {} fps",
                output.audio_track_count(),
                output.frame_rate()
            );
        }
        if let Some(compositor) = self.controller.compositor() {
            let canvas = compositor.state().canvas;
            println!(
                "canvas: {}x{}, {} frames, {} draw errors",
                canvas.width,
                canvas.height,
                compositor.frames_drawn(),
                compositor.draw_errors()
            );
        }
        match self.controller.artifact_status() {
            Some(ArtifactStatus::Usable {
                artifact,
                preview_url,
            }) => println!(
                "artifact: {} bytes in {} chunks, preview {}",
                artifact.blob().size(),
                artifact.chunk_count(),
                preview_url
            ),
            Some(ArtifactStatus::Unusable { reason }) => println!("artifact unusable: {reason}"),
            None => {}
        }
    }
}

fn report_event(event: &RecorderEvent) {
    match event {
        RecorderEvent::PhaseChanged { phase, session_id } => {
            debug!(phase = %phase, session_id = ?session_id, "Phase changed");
        }
        RecorderEvent::ArtifactReady {
            session_id,
            size,
            preview_url,
        } => {
            info!(session_id = %session_id, size, "Recording ready");
            println!("recording ready: {size} bytes, preview {preview_url}");
        }
        RecorderEvent::Failed {
            session_id,
            message,
        } => {
            // The failing command already printed the error.
            debug!(session_id = ?session_id, message = %message, "Failure reported");
        }
    }
}
