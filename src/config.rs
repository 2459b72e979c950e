use std::time::Duration;

use crate::error::GameError;

pub const DEFAULT_FIELD_SIZE: i32 = 10;
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(250);
/// Largest accepted field side.
pub const MAX_FIELD_SIZE: i32 = 1024;

/// Fixed parameters of one game session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameConfig {
    /// Side length of the square playing field, in cells.
    pub field_size: i32,
    /// Time between two movement steps.
    pub tick_interval: Duration,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            field_size: DEFAULT_FIELD_SIZE,
            tick_interval: DEFAULT_TICK_INTERVAL,
        }
    }
}

impl GameConfig {
    pub fn new(field_size: i32, tick_interval: Duration) -> Self {
        Self {
            field_size,
            tick_interval,
        }
    }

    /// Same as the default but on a field of the given size.
    pub fn with_field_size(field_size: i32) -> Self {
        Self {
            field_size,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), GameError> {
        if self.field_size <= 0 || self.field_size > MAX_FIELD_SIZE {
            return Err(GameError::InvalidConfig(format!(
                "field size must be between 1 and {}, got {}",
                MAX_FIELD_SIZE, self.field_size
            )));
        }
        if self.tick_interval.is_zero() {
            return Err(GameError::InvalidConfig(
                "tick interval must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}
