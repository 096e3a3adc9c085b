use std::time::Duration;

use crate::constants::{DEFAULT_SCREEN_HEIGHT, DEFAULT_SCREEN_WIDTH, DEFAULT_TICK_MS};
use crate::error::GameError;

/// Session settings fixed at construction time.
#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    /// Play-field width; the wrap and off-screen boundary on x
    pub width: i32,
    /// Play-field height; the wrap and off-screen boundary on y
    pub height: i32,
    /// Seed for the session's spawn generator
    pub seed: u64,
    /// Wall-clock pause between driver frames
    pub tick_interval: Duration,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            width: DEFAULT_SCREEN_WIDTH,
            height: DEFAULT_SCREEN_HEIGHT,
            seed: 0,
            tick_interval: Duration::from_millis(DEFAULT_TICK_MS),
        }
    }
}

impl GameConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_extent(mut self, width: i32, height: i32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn validate(&self) -> Result<(), GameError> {
        if self.width <= 0 || self.height <= 0 {
            return Err(GameError::InvalidConfig(format!(
                "screen extent must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.tick_interval.is_zero() {
            return Err(GameError::InvalidConfig("tick interval must be non-zero".to_string()));
        }
        Ok(())
    }
}
