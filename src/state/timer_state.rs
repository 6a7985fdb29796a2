//! Timer state structure and management

use std::time::Duration;

use super::ModeDuration;

/// Countdown for the current running mode
#[derive(Debug, Clone, PartialEq)]
pub struct TimerState {
    total: ModeDuration,
    remaining: Duration,
}

/// Label and completion fraction delivered to timer listeners on each tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickProgress {
    pub label: String,
    pub percentage: f32,
}

impl TimerState {
    /// Create a full countdown sized to the given duration
    pub fn new(total: ModeDuration) -> Self {
        let remaining = match total {
            ModeDuration::Finite(duration) => duration,
            ModeDuration::Unbounded => Duration::MAX,
        };
        Self { total, remaining }
    }

    pub fn total(&self) -> ModeDuration {
        self.total
    }

    /// Remaining time, `None` for an unbounded countdown
    pub fn remaining(&self) -> Option<Duration> {
        match self.total {
            ModeDuration::Finite(_) => Some(self.remaining),
            ModeDuration::Unbounded => None,
        }
    }

    /// Record the time left as reported by the countdown. Never moves backwards.
    pub fn update(&mut self, remaining: Duration) {
        if let ModeDuration::Finite(_) = self.total {
            self.remaining = self.remaining.min(remaining);
        }
    }

    /// `remaining / total` in milliseconds, clamped to [0, 1]
    pub fn percentage_remaining(&self) -> Option<f32> {
        match self.total {
            ModeDuration::Finite(total) if total.is_zero() => Some(0.0),
            ModeDuration::Finite(total) => {
                let fraction = self.remaining.as_millis() as f64 / total.as_millis() as f64;
                Some(fraction.clamp(0.0, 1.0) as f32)
            }
            ModeDuration::Unbounded => None,
        }
    }

    /// Tick payload at seconds granularity: `m:ss` label and
    /// `seconds_remaining / total_seconds`. Unbounded countdowns never tick.
    pub fn tick_progress(&self) -> Option<TickProgress> {
        let total_secs = self.total.as_secs().filter(|secs| *secs > 0)?;
        let secs = self.remaining.as_secs().min(total_secs);
        let minutes = secs / 60;

        Some(TickProgress {
            label: format!("{}:{:02}", minutes, secs % 60),
            percentage: secs as f32 / total_secs as f32,
        })
    }
}
