use std::{env, time::Duration};

// Runtime defaults for round pacing (not gameplay tuning).

pub const DEFAULT_WINDOW_DURATION: Duration = Duration::from_secs(5);
pub const DEFAULT_ROUND_DURATION: Duration = Duration::from_secs(8);

fn env_duration_ms(key: &str, default: Duration) -> Duration {
    env::var(key)
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(default)
}

pub fn window_duration() -> Duration {
    env_duration_ms("COMBAT_WINDOW_MS", DEFAULT_WINDOW_DURATION)
}

pub fn round_duration() -> Duration {
    env_duration_ms("COMBAT_ROUND_MS", DEFAULT_ROUND_DURATION)
}

/// Errors from validating round pacing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("submission window duration must be non-zero")]
    ZeroWindow,
    #[error("submission window {window_ms}ms exceeds round duration {round_ms}ms")]
    WindowExceedsRound { window_ms: u64, round_ms: u64 },
}

/// Immutable pacing for one encounter: how long the submission window stays
/// open, and how long a full round lasts before the next one begins.
#[derive(Debug, Clone, Copy)]
pub struct RoundConfig {
    window_duration: Duration,
    round_duration: Duration,
}

impl RoundConfig {
    /// Validates that the window fits inside the round. A window longer than
    /// the round would let round N+1 open before round N's window closed,
    /// corrupting submission ordering, so it is rejected up front.
    pub fn new(window_duration: Duration, round_duration: Duration) -> Result<Self, ConfigError> {
        if window_duration.is_zero() {
            return Err(ConfigError::ZeroWindow);
        }
        if window_duration > round_duration {
            return Err(ConfigError::WindowExceedsRound {
                window_ms: window_duration.as_millis() as u64,
                round_ms: round_duration.as_millis() as u64,
            });
        }
        Ok(Self {
            window_duration,
            round_duration,
        })
    }

    /// Builds pacing from the environment, falling back to the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::new(window_duration(), round_duration())
    }

    pub fn window_duration(&self) -> Duration {
        self.window_duration
    }

    pub fn round_duration(&self) -> Duration {
        self.round_duration
    }
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            window_duration: DEFAULT_WINDOW_DURATION,
            round_duration: DEFAULT_ROUND_DURATION,
        }
    }
}
