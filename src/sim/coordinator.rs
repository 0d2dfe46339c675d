//! Turn state machine
//!
//! Accepts card picks, locks input while a pair is waiting to be compared,
//! resolves the pair, keeps the counters and decides when the run ends.
//!
//! Resolution is delayed by the caller (see `Scheduler`). The clock can end
//! the run while a resolution is still pending and pending resolutions are
//! never cancelled, so `resolve` checks `finished` before touching any
//! counter.

use super::card::{Board, CardId, Face};
use super::score::{self, Outcome};
use super::state::{Ending, GameEvent, GamePhase, SessionState};
use crate::presentation::{HudSnapshot, SoundCue};

/// Rule parameters fixed for the lifetime of a session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rules {
    pub total_pairs: u32,
    pub max_mistakes: u32,
}

/// Token for a pair waiting to be compared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingResolution {
    pub first: CardId,
    pub second: CardId,
    /// Turn number that produced this pair
    pub turn: u32,
}

/// Cards picked this turn
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionSlots {
    pub first: Option<CardId>,
    pub second: Option<CardId>,
    pub input_locked: bool,
}

impl SelectionSlots {
    fn clear(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone)]
pub struct SelectionCoordinator {
    board: Board,
    rules: Rules,
    session: SessionState,
    slots: SelectionSlots,
    pending: Option<PendingResolution>,
    ending: Option<Ending>,
    /// Last HUD seconds value published, to avoid per-frame spam
    shown_secs: Option<u32>,
    events: Vec<GameEvent>,
}

impl SelectionCoordinator {
    pub fn new(board: Board, max_mistakes: u32, game_time: f32) -> Self {
        let rules = Rules {
            total_pairs: board.total_pairs(),
            max_mistakes: max_mistakes.max(1),
        };
        Self {
            board,
            rules,
            session: SessionState::new(game_time),
            slots: SelectionSlots::default(),
            pending: None,
            ending: None,
            shown_secs: None,
            events: Vec::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn rules(&self) -> Rules {
        self.rules
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn slots(&self) -> SelectionSlots {
        self.slots
    }

    pub fn ending(&self) -> Option<Ending> {
        self.ending
    }

    pub fn is_finished(&self) -> bool {
        self.session.finished
    }

    pub fn phase(&self) -> GamePhase {
        if let Some(ending) = self.ending {
            return ending.phase();
        }
        match (self.slots.first, self.slots.second) {
            (None, _) => GamePhase::Idle,
            (Some(_), None) => GamePhase::AwaitingSecond,
            (Some(_), Some(_)) => GamePhase::Evaluating,
        }
    }

    pub fn hud(&self) -> HudSnapshot {
        HudSnapshot {
            score: self.session.score,
            turns: self.session.turns,
            matched_pairs: self.session.matched_pairs,
            total_pairs: self.rules.total_pairs,
            remaining_secs: self.session.remaining_time.ceil() as u32,
        }
    }

    /// Take every event queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Queue a HUD refresh
    pub fn publish_hud(&mut self) {
        let hud = self.hud();
        self.shown_secs = Some(hud.remaining_secs);
        self.events.push(GameEvent::Hud(hud));
    }

    /// Apply a saved session wholesale. Only meaningful before play starts.
    pub fn restore(&mut self, snapshot: SessionState) {
        if self.slots != SelectionSlots::default() || self.ending.is_some() {
            log::warn!("Ignoring session restore on a board already in play");
            return;
        }

        self.session = SessionState {
            matched_pairs: snapshot.matched_pairs.min(self.rules.total_pairs),
            finished: false,
            ..snapshot
        };
        log::info!(
            "Restored session: score {}, turn {}, {:.1}s left",
            self.session.score,
            self.session.turns,
            self.session.remaining_time
        );

        // A record saved just before an ending still has to end
        let all_found = self.session.matched_pairs >= self.rules.total_pairs;
        let out_of_time = self.session.remaining_time <= 0.0;
        let out_of_mistakes = self.session.mistakes >= self.rules.max_mistakes;
        if all_found {
            self.finish(Ending::Win);
        } else if snapshot.finished || out_of_time || out_of_mistakes {
            self.finish(Ending::GameOver);
        }
    }

    /// Record the clock's remaining time. Publishes the HUD when the shown
    /// whole-second value changes.
    pub fn sync_clock(&mut self, remaining: f32) {
        if self.session.finished {
            return;
        }
        self.session.remaining_time = remaining.max(0.0);
        let secs = self.session.remaining_time.ceil() as u32;
        if self.shown_secs != Some(secs) {
            self.publish_hud();
        }
    }

    /// Handle a click on `id`. Returns the pair to resolve when this pick
    /// completes a pair; the caller schedules `resolve` after the delay.
    pub fn select_card(&mut self, id: CardId) -> Option<PendingResolution> {
        if self.session.finished || self.slots.input_locked {
            log::trace!("{} ignored: input closed", id);
            return None;
        }

        let card = self.board.get_mut(id)?;
        if !card.is_interactive() || !card.reveal() {
            log::trace!("{} ignored: not selectable", id);
            return None;
        }

        self.events.push(GameEvent::Flip {
            card: id,
            face: Face::Up,
        });
        self.events.push(GameEvent::Sound(SoundCue::Flip));

        let Some(first) = self.slots.first else {
            self.slots.first = Some(id);
            return None;
        };

        self.slots.second = Some(id);
        self.slots.input_locked = true;
        self.session.turns = self.session.turns.saturating_add(1);
        self.publish_hud();

        let pending = PendingResolution {
            first,
            second: id,
            turn: self.session.turns,
        };
        self.pending = Some(pending);
        Some(pending)
    }

    /// Compare the pair picked this turn and apply the result
    pub fn resolve(&mut self, pending: PendingResolution) {
        if self.pending != Some(pending) {
            log::warn!(
                "Stale resolution for turn {} ({} / {}), ignoring",
                pending.turn,
                pending.first,
                pending.second
            );
            return;
        }
        self.pending = None;

        let (Some(a), Some(b)) = (self.board.get(pending.first), self.board.get(pending.second))
        else {
            self.slots.clear();
            return;
        };
        let is_match = a.pair_key == b.pair_key;

        if self.session.finished {
            // Run already ended (clock): only put a failed pair back face down
            if !is_match {
                self.hide_pair(pending);
            }
            self.slots.clear();
            return;
        }

        if is_match {
            for id in [pending.first, pending.second] {
                if let Some(card) = self.board.get_mut(id) {
                    card.mark_matched();
                }
            }
            self.session.matched_pairs = self.session.matched_pairs.saturating_add(1);
            score::apply(Outcome::Match, &mut self.session);
            self.events.push(GameEvent::Sound(SoundCue::Match));
            self.publish_hud();
            log::debug!(
                "Turn {}: match ({}/{})",
                pending.turn,
                self.session.matched_pairs,
                self.rules.total_pairs
            );

            if self.session.matched_pairs >= self.rules.total_pairs {
                self.finish(Ending::Win);
            }
        } else {
            self.session.mistakes = self.session.mistakes.saturating_add(1);
            score::apply(Outcome::Mismatch, &mut self.session);
            self.events.push(GameEvent::Sound(SoundCue::Mismatch));
            self.publish_hud();
            log::debug!(
                "Turn {}: mismatch ({}/{} mistakes)",
                pending.turn,
                self.session.mistakes,
                self.rules.max_mistakes
            );

            if self.session.mistakes >= self.rules.max_mistakes {
                self.finish(Ending::GameOver);
            }
            self.hide_pair(pending);
        }

        self.slots.clear();
    }

    /// Clock ran out
    pub fn expire(&mut self) {
        if self.session.finished {
            return;
        }
        self.session.remaining_time = 0.0;
        self.publish_hud();
        self.finish(Ending::GameOver);
    }

    fn hide_pair(&mut self, pending: PendingResolution) {
        for id in [pending.first, pending.second] {
            let flipped = self.board.get_mut(id).is_some_and(|card| card.hide());
            if flipped {
                self.events.push(GameEvent::Flip {
                    card: id,
                    face: Face::Down,
                });
            }
        }
    }

    fn finish(&mut self, ending: Ending) {
        if self.session.finished {
            return;
        }
        self.session.finished = true;
        self.ending = Some(ending);
        self.board.disable_all();

        self.events.push(GameEvent::Sound(ending.sound()));
        self.events.push(GameEvent::ShowPanel(ending));
        log::info!(
            "Run over ({:?}): score {}, {} turns, {} mistakes",
            ending,
            self.session.score,
            self.session.turns,
            self.session.mistakes
        );
    }
}
