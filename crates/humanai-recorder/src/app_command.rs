use humanai_recorder_core::Corner;

use std::str::FromStr;

use thiserror::Error;

/// Commands sent from the stdin reader to the main application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// Start a new recording.
    Start,
    /// Stop the current recording.
    Stop,
    /// Discard the stopped recording and start a new one.
    Restart,
    /// Save the stopped recording to the downloads folder.
    Download,
    /// Discard the stopped recording.
    Delete,
    /// Move the webcam overlay.
    Corner(Corner),
    /// Show or hide the webcam overlay.
    Webcam(bool),
    /// Print the recorder state.
    Status,
    /// Print the command list.
    Help,
    /// Request application shutdown.
    Quit,
}

/// Usage text printed for `help` and unknown commands.
pub const COMMAND_HELP: &str = "commands: start | stop | restart | download | delete | \
corner <top-left|top-right|bottom-left|bottom-right> | webcam <on|off> | status | help | quit";

/// A line that is not a valid command.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseCommandError {
    /// Blank input.
    #[error("Empty command")]
    Empty,
    /// First word is not a command.
    #[error("Unknown command '{0}'")]
    Unknown(String),
    /// Command is missing its argument or has a bad one.
    #[error("Invalid argument for '{command}': {reason}")]
    InvalidArgument {
        /// Command name.
        command: &'static str,
        /// What is wrong with the argument.
        reason: String,
    },
}

impl FromStr for AppCommand {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            return Err(ParseCommandError::Empty);
        };
        let argument = words.next();

        match command.to_ascii_lowercase().as_str() {
            "start" => Ok(AppCommand::Start),
            "stop" => Ok(AppCommand::Stop),
            "restart" => Ok(AppCommand::Restart),
            "download" | "save" => Ok(AppCommand::Download),
            "delete" => Ok(AppCommand::Delete),
            "status" => Ok(AppCommand::Status),
            "help" | "?" => Ok(AppCommand::Help),
            "quit" | "exit" => Ok(AppCommand::Quit),
            "corner" => {
                let argument = argument.ok_or(ParseCommandError::InvalidArgument {
                    command: "corner",
                    reason: "missing corner".to_string(),
                })?;
                argument
                    .parse::<Corner>()
                    .map(AppCommand::Corner)
                    .map_err(|e| ParseCommandError::InvalidArgument {
                        command: "corner",
                        reason: e.to_string(),
                    })
            }
            "webcam" => match argument.map(str::to_ascii_lowercase).as_deref() {
                Some("on" | "show") => Ok(AppCommand::Webcam(true)),
                Some("off" | "hide") => Ok(AppCommand::Webcam(false)),
                Some(other) => Err(ParseCommandError::InvalidArgument {
                    command: "webcam",
                    reason: format!("expected on or off, got '{}'", other),
                }),
                None => Err(ParseCommandError::InvalidArgument {
                    command: "webcam",
                    reason: "expected on or off".to_string(),
                }),
            },
            _ => Err(ParseCommandError::Unknown(command.to_string())),
        }
    }
}
