//! Presentation requests
//!
//! The rules never animate, play audio or draw text themselves. They hand
//! these requests to a `Presenter` supplied by the host.

use crate::sim::{CardId, Ending, Face, GameEvent};

/// Sound effect cues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    /// Card turned face up
    Flip,
    /// Pair found
    Match,
    /// Pair did not match
    Mismatch,
    /// All pairs found
    Win,
    /// Out of time or mistakes
    GameOver,
}

/// Values shown on the HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HudSnapshot {
    pub score: u32,
    pub turns: u32,
    pub matched_pairs: u32,
    pub total_pairs: u32,
    /// Remaining time rounded up to whole seconds
    pub remaining_secs: u32,
}

/// Host-side sink for presentation requests
pub trait Presenter {
    fn request_flip(&mut self, card: CardId, face: Face);
    fn play_sound(&mut self, cue: SoundCue);
    fn show_panel(&mut self, ending: Ending);
    fn update_display(&mut self, hud: &HudSnapshot);
}

/// Presenter that drops every request (headless runs)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn request_flip(&mut self, _card: CardId, _face: Face) {}
    fn play_sound(&mut self, _cue: SoundCue) {}
    fn show_panel(&mut self, _ending: Ending) {}
    fn update_display(&mut self, _hud: &HudSnapshot) {}
}

impl GameEvent {
    /// Forward this event to the matching presenter call
    pub fn dispatch<P: Presenter + ?Sized>(&self, presenter: &mut P) {
        match self {
            GameEvent::Flip { card, face } => presenter.request_flip(*card, *face),
            GameEvent::Sound(cue) => presenter.play_sound(*cue),
            GameEvent::ShowPanel(ending) => presenter.show_panel(*ending),
            GameEvent::Hud(hud) => presenter.update_display(hud),
        }
    }
}
