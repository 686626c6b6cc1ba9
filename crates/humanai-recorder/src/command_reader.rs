use crate::{AppCommand, AppError, AppResult, app_command::COMMAND_HELP};

use std::{io::BufRead, panic::Location};

use error_location::ErrorLocation;
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, info, warn};

/// Forwards stdin lines to the app as parsed commands.
///
/// Reading stdin blocks, so this runs on a single blocking task. It ends
/// when stdin closes (sending `Quit`) or, with `ChannelSendFailed`, when the
/// app has dropped its receiver.
pub(crate) fn spawn_command_reader(
    command_tx: mpsc::Sender<AppCommand>,
) -> JoinHandle<AppResult<()>> {
    tokio::task::spawn_blocking(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    warn!(error = %e, "Failed to read stdin");
                    break;
                }
            };

            if line.trim().is_empty() {
                continue;
            }

            match line.parse::<AppCommand>() {
                Ok(command) => {
                    debug!(?command, "Command received");
                    forward(&command_tx, command)?;
                }
                Err(e) => {
                    warn!(input = %line.trim(), error = %e, "Ignoring invalid command");
                    println!("{e}\n{COMMAND_HELP}");
                }
            }
        }

        info!("stdin closed, requesting shutdown");
        forward(&command_tx, AppCommand::Quit)
    })
}

fn forward(command_tx: &mpsc::Sender<AppCommand>, command: AppCommand) -> AppResult<()> {
    command_tx
        .blocking_send(command)
        .map_err(|e| AppError::ChannelSendFailed {
            message: format!("app stopped accepting commands: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
}
