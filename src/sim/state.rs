//! Session state and rule-engine events
//!
//! `SessionState` is the record that gets persisted for Continue. Field names
//! on the wire are part of the save compatibility surface.

use serde::{Deserialize, Serialize};

use super::card::{CardId, Face};
use crate::consts::DEFAULT_GAME_TIME;
use crate::presentation::{HudSnapshot, SoundCue};

/// Current phase of the turn state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// No card picked this turn
    Idle,
    /// One card face up, waiting for its partner
    AwaitingSecond,
    /// Two cards face up, input locked until the pair resolves
    Evaluating,
    /// Every pair found
    Won,
    /// Out of time or out of mistakes
    GameOver,
}

/// How a finished run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ending {
    Win,
    GameOver,
}

impl Ending {
    pub fn phase(&self) -> GamePhase {
        match self {
            Ending::Win => GamePhase::Won,
            Ending::GameOver => GamePhase::GameOver,
        }
    }

    pub fn sound(&self) -> SoundCue {
        match self {
            Ending::Win => SoundCue::Win,
            Ending::GameOver => SoundCue::GameOver,
        }
    }
}

/// Persisted session counters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub score: u32,
    /// Seconds left on the clock
    #[serde(rename = "remainingTime")]
    pub remaining_time: f32,
    /// Completed pair attempts
    pub turns: u32,
    #[serde(rename = "mistakeCount")]
    pub mistakes: u32,
    #[serde(rename = "matchedPairs")]
    pub matched_pairs: u32,
    /// Terminal flag, never reverts
    #[serde(rename = "gameFinished")]
    pub finished: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(DEFAULT_GAME_TIME)
    }
}

impl SessionState {
    /// Fresh session with a full clock
    pub fn new(game_time: f32) -> Self {
        Self {
            score: 0,
            remaining_time: game_time,
            turns: 0,
            mistakes: 0,
            matched_pairs: 0,
            finished: false,
        }
    }

    /// Sanity check for records coming back from storage
    pub fn is_valid(&self) -> bool {
        self.remaining_time.is_finite() && self.remaining_time >= 0.0
    }
}

/// Requests the rules emit for the presentation layer, in order
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Animate a card to the given face
    Flip { card: CardId, face: Face },
    Sound(SoundCue),
    /// Show the end-of-run panel
    ShowPanel(Ending),
    /// Counters changed
    Hud(HudSnapshot),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_field_names() {
        let state = SessionState {
            score: 120,
            remaining_time: 42.5,
            turns: 3,
            mistakes: 1,
            matched_pairs: 2,
            finished: false,
        };
        let json = serde_json::to_value(state).unwrap();
        let obj = json.as_object().unwrap();

        let mut keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            [
                "gameFinished",
                "matchedPairs",
                "mistakeCount",
                "remainingTime",
                "score",
                "turns"
            ]
        );
        assert_eq!(obj["mistakeCount"], 1);
        assert_eq!(obj["remainingTime"], 42.5);
    }

    #[test]
    fn test_validity() {
        assert!(SessionState::default().is_valid());

        let mut state = SessionState::new(0.0);
        assert!(state.is_valid());
        state.remaining_time = -1.0;
        assert!(!state.is_valid());
        state.remaining_time = f32::NAN;
        assert!(!state.is_valid());
    }

    #[test]
    fn test_ending_phase() {
        assert_eq!(Ending::Win.phase(), GamePhase::Won);
        assert_eq!(Ending::GameOver.phase(), GamePhase::GameOver);
        assert_eq!(Ending::Win.sound(), SoundCue::Win);
    }
}
