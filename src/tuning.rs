//! Game tuning
//!
//! Round length, mistake budget and the pair reveal delay. Persisted
//! separately from session saves.

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_GAME_TIME, DEFAULT_MAX_MISTAKES, RESOLVE_DELAY};
use crate::platform::storage::Storage;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Round length in seconds
    pub game_time: f32,
    /// Mistakes allowed before game over
    pub max_mistakes: u32,
    /// Seconds both cards stay up before the pair is compared
    pub resolve_delay: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            game_time: DEFAULT_GAME_TIME,
            max_mistakes: DEFAULT_MAX_MISTAKES,
            resolve_delay: RESOLVE_DELAY,
        }
    }
}

impl Tuning {
    /// Storage key
    const STORAGE_KEY: &'static str = "pair_flip_tuning";

    /// Replace out-of-range values with defaults
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !self.game_time.is_finite() || self.game_time <= 0.0 {
            self.game_time = defaults.game_time;
        }
        if self.max_mistakes == 0 {
            self.max_mistakes = defaults.max_mistakes;
        }
        if !self.resolve_delay.is_finite() || self.resolve_delay < 0.0 {
            self.resolve_delay = defaults.resolve_delay;
        }
        self
    }

    /// Load tuning from storage, falling back to defaults
    pub fn load(storage: &impl Storage) -> Self {
        if storage.has(Self::STORAGE_KEY) {
            match storage.get(Self::STORAGE_KEY) {
                Ok(json) => match serde_json::from_str::<Tuning>(&json) {
                    Ok(tuning) => {
                        log::info!("Loaded tuning from storage");
                        return tuning.sanitized();
                    }
                    Err(e) => log::warn!("Ignoring malformed tuning: {e}"),
                },
                Err(e) => log::warn!("Failed to read tuning: {e}"),
            }
        }

        log::info!("Using default tuning");
        Self::default()
    }

    pub fn save(&self, storage: &mut impl Storage) {
        match serde_json::to_string(self) {
            Ok(json) => match storage.set(Self::STORAGE_KEY, &json) {
                Ok(()) => log::info!("Tuning saved"),
                Err(e) => log::warn!("Failed to save tuning: {e}"),
            },
            Err(e) => log::warn!("Failed to encode tuning: {e}"),
        }
    }
}
