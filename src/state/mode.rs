//! Activation modes and their durations

use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};

/// How long a running mode keeps the display awake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeDuration {
    Finite(Duration),
    Unbounded,
}

impl ModeDuration {
    /// Build a finite duration from whole minutes
    pub const fn minutes(minutes: u64) -> Self {
        ModeDuration::Finite(Duration::from_secs(minutes * 60))
    }

    /// Total length in whole seconds, `None` when unbounded
    pub fn as_secs(&self) -> Option<u64> {
        match self {
            ModeDuration::Finite(duration) => Some(duration.as_secs()),
            ModeDuration::Unbounded => None,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self, ModeDuration::Unbounded)
    }
}

/// A point in the cyclic activation sequence.
///
/// `Inactive` is the initial state and the state after any reset. Advancing
/// walks the running modes in order; advancing from `Infinite` is handled by
/// the controller as a reset rather than another lap of the cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    #[serde(rename = "inactive")]
    Inactive,
    #[serde(rename = "15min")]
    Minutes15,
    #[serde(rename = "30min")]
    Minutes30,
    #[serde(rename = "60min")]
    Minutes60,
    #[serde(rename = "120min")]
    Minutes120,
    #[serde(rename = "infinite")]
    Infinite,
}

impl Mode {
    /// Running modes in activation order
    pub const RUNNING: [Mode; 5] = [
        Mode::Minutes15,
        Mode::Minutes30,
        Mode::Minutes60,
        Mode::Minutes120,
        Mode::Infinite,
    ];

    /// Cyclic successor. `Inactive` leads to the first running mode and the
    /// terminal `Infinite` wraps back to `Inactive`.
    pub fn next(self) -> Mode {
        match self {
            Mode::Inactive => Mode::Minutes15,
            Mode::Minutes15 => Mode::Minutes30,
            Mode::Minutes30 => Mode::Minutes60,
            Mode::Minutes60 => Mode::Minutes120,
            Mode::Minutes120 => Mode::Infinite,
            Mode::Infinite => Mode::Inactive,
        }
    }

    /// Duration of a running mode, `None` for `Inactive`
    pub fn duration(self) -> Option<ModeDuration> {
        match self {
            Mode::Inactive => None,
            Mode::Infinite => Some(ModeDuration::Unbounded),
            running => running.minutes().map(ModeDuration::minutes),
        }
    }

    /// Fixed number of minutes for the finite modes
    pub fn minutes(self) -> Option<u64> {
        match self {
            Mode::Minutes15 => Some(15),
            Mode::Minutes30 => Some(30),
            Mode::Minutes60 => Some(60),
            Mode::Minutes120 => Some(120),
            Mode::Inactive | Mode::Infinite => None,
        }
    }

    /// Display label shown when the mode is first activated
    pub fn label(self) -> &'static str {
        match self {
            Mode::Inactive => "Caffeine",
            Mode::Minutes15 => "15:00",
            Mode::Minutes30 => "30:00",
            Mode::Minutes60 => "60:00",
            Mode::Minutes120 => "120:00",
            Mode::Infinite => "\u{221e}",
        }
    }

    pub fn is_running(self) -> bool {
        self != Mode::Inactive
    }

    /// The single running mode whose advance forces a reset
    pub fn is_terminal(self) -> bool {
        self == Mode::Infinite
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::Inactive => "inactive",
            Mode::Minutes15 => "15min",
            Mode::Minutes30 => "30min",
            Mode::Minutes60 => "60min",
            Mode::Minutes120 => "120min",
            Mode::Infinite => "infinite",
        };
        f.write_str(name)
    }
}
