use std::fmt::{Display, Formatter};

use async_trait::async_trait;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Color {
    Red,
    Yellow,
    Green,
}

impl Color {
    pub const ALL: [Color; 3] = [Color::Red, Color::Yellow, Color::Green];

    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Yellow => "yellow",
            Color::Green => "green",
        }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Action {
    On,
    Off,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::On => "on",
            Action::Off => "off",
        }
    }

    pub fn is_on(&self) -> bool {
        matches!(self, Action::On)
    }
}

impl From<bool> for Action {
    fn from(on: bool) -> Self {
        if on {
            Action::On
        } else {
            Action::Off
        }
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One request to the board: drive `color` to `action`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LedCommand {
    pub color: Color,
    pub action: Action,
}

impl LedCommand {
    pub fn new(color: Color, on: bool) -> LedCommand {
        LedCommand {
            color,
            action: Action::from(on),
        }
    }

    /// Path under the device base URL, e.g. `led/red/on`.
    pub fn path(&self) -> String {
        format!("led/{}/{}", self.color, self.action)
    }
}

impl Display for LedCommand {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.color, self.action)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    #[error("Device request for {command} failed. Reason: {source}")]
    Transport {
        command: LedCommand,
        #[source]
        source: reqwest::Error,
    },
    #[error("Device answered {command} with status {status}.")]
    Status {
        command: LedCommand,
        status: reqwest::StatusCode,
    },
    #[error("Device rejected {command}. Reason: {reason}")]
    Rejected { command: LedCommand, reason: String },
}

/// Device Control Endpoint. The answer body is plain text and only ever logged.
#[async_trait]
pub trait DeviceEndpoint {
    async fn send(&self, command: &LedCommand) -> Result<String, DeviceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_path_uses_lowercase_names() {
        assert_eq!(LedCommand::new(Color::Red, true).path(), "led/red/on");
        assert_eq!(LedCommand::new(Color::Yellow, false).path(), "led/yellow/off");
        assert_eq!(LedCommand::new(Color::Green, true).path(), "led/green/on");
    }

    #[test]
    fn action_from_bool() {
        assert_eq!(Action::from(true), Action::On);
        assert_eq!(Action::from(false), Action::Off);
        assert!(Action::On.is_on());
        assert!(!Action::Off.is_on());
    }
}
