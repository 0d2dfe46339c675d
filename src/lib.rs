//! Pair Flip - rules engine for a timed memory-matching card game
//!
//! Core modules:
//! - `sim`: Deterministic rules (cards, clock, scoring, turn state machine)
//! - `game`: Driver wiring the clock, scheduler, rules, persistence and presenter
//! - `presentation`: Flip/sound/panel/HUD requests consumed by the host
//! - `persistence`: Session save/load over a key-value backend
//! - `platform`: Storage backends (memory, file, LocalStorage)
//! - `tuning`: Data-driven game settings

pub mod game;
pub mod persistence;
pub mod platform;
pub mod presentation;
pub mod sim;
pub mod tuning;

pub use game::Game;
pub use persistence::{PersistError, SessionStore};
pub use platform::storage::{MemoryStorage, Storage, StorageError};
pub use presentation::{HudSnapshot, NullPresenter, Presenter, SoundCue};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed frame step used by the headless driver (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Round length in seconds
    pub const DEFAULT_GAME_TIME: f32 = 60.0;
    /// Mistakes allowed before the run ends
    pub const DEFAULT_MAX_MISTAKES: u32 = 10;
    /// Delay between picking the second card and comparing the pair
    pub const RESOLVE_DELAY: f32 = 0.5;

    /// Scoring
    pub const MATCH_BONUS: i64 = 100;
    pub const MISMATCH_PENALTY: i64 = 50;
    pub const TIME_BONUS_PER_SEC: i64 = 10;
    pub const TURN_PENALTY: i64 = 10;
    pub const MISTAKE_PENALTY: i64 = 50;
}
