use std::time::Duration;

use serde::Deserialize;

use crate::device::model::{Color, LedCommand};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Pattern {
    #[default]
    LeftToRight,
    RightToLeft,
}

impl Pattern {
    /// Turn-on order of a run. The reset turns the LEDs off in this same order, not mirrored.
    pub fn order(&self) -> [Color; 3] {
        match self {
            Pattern::LeftToRight => [Color::Red, Color::Yellow, Color::Green],
            Pattern::RightToLeft => [Color::Green, Color::Yellow, Color::Red],
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LedState {
    pub red: bool,
    pub yellow: bool,
    pub green: bool,
}

impl LedState {
    pub fn get(&self, color: Color) -> bool {
        match color {
            Color::Red => self.red,
            Color::Yellow => self.yellow,
            Color::Green => self.green,
        }
    }

    pub fn set(&mut self, color: Color, on: bool) {
        match color {
            Color::Red => self.red = on,
            Color::Yellow => self.yellow = on,
            Color::Green => self.green = on,
        }
    }

    pub fn all_off(&self) -> bool {
        Color::ALL.iter().all(|c| !self.get(*c))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlaybackStatus {
    #[default]
    Idle,
    Playing,
}

/// What the presentation layer gets to see. Published on every change.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub leds: LedState,
    pub pattern: Pattern,
    pub status: PlaybackStatus,
}

impl Snapshot {
    pub fn is_playing(&self) -> bool {
        self.status == PlaybackStatus::Playing
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timings {
    /// Gap between consecutive turn-on steps. The reset starts three steps after `play`.
    pub step_every: Duration,
    /// Gap between a completed turn-off and the next one.
    pub reset_every: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Timings {
            step_every: Duration::from_millis(1000),
            reset_every: Duration::from_millis(200),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PatternChange {
    Applied,
    /// A run is in flight; the pattern stays as it was.
    Ignored,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayOutcome {
    Started,
    AlreadyPlaying,
}

/// Emitted when the board did not acknowledge a command. Local state was updated anyway.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandFailure {
    pub command: LedCommand,
    pub reason: String,
}

#[derive(Debug, thiserror::Error)]
pub enum SequencerError {
    #[error("Sequencer is not running anymore.")]
    Stopped,
}
