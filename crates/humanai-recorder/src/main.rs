//! HumanAI Recorder: headless screen + webcam recorder driven from stdin.

mod app;
mod app_command;
mod command_reader;
mod config;
mod devices;
mod download_saver;
mod encoder;
mod error;
mod logging;

pub(crate) use {
    app::App,
    app_command::AppCommand,
    download_saver::DownloadSaver,
    encoder::FfmpegEncoder,
    error::{AppError, Result as AppResult},
};

use crate::{
    config::Config,
    devices::{SyntheticDevices, SyntheticDisplay},
};

use humanai_recorder_core::{CaptureManager, RecordingController};

use std::time::Duration;

use tracing::error;

/// How long blocked tasks (the stdin reader) get to finish at exit.
const RUNTIME_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(1);

/// Application entry point.
fn main() {
    let log_guard = logging::init_logging();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {:?}", e);
            drop(log_guard);
            std::process::exit(1);
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to create tokio runtime: {:?}", e);
            drop(log_guard);
            std::process::exit(1);
        }
    };

    let result = rt.block_on(async {
        let app = build_app(config)?;
        app.run().await
    });
    rt.shutdown_timeout(RUNTIME_SHUTDOWN_TIMEOUT);

    if let Err(e) = result {
        error!(error = ?e, "App error");
        drop(log_guard);
        std::process::exit(1);
    }
}

/// Wire the recording controller to the synthetic devices, ffmpeg and the
/// downloads folder.
fn build_app(config: Config) -> AppResult<App> {
    let encoder = FfmpegEncoder::new(&config.encoder)?;
    let saver = DownloadSaver::new(&config.output)?;
    let capture = CaptureManager::new(
        Box::new(SyntheticDisplay::new(config.capture.clone())),
        Box::new(SyntheticDevices::new(config.capture.clone())),
    );

    let controller = RecordingController::new(
        capture,
        Box::new(encoder),
        Box::new(saver),
        config.recorder.recorder_options(),
    );

    Ok(App::new(controller, config))
}
