//! Game driver
//!
//! Owns one session: the rules, the countdown, the frame scheduler, the
//! session store and the host presenter. The host feeds it clicks and frame
//! deltas; everything else happens here.

use crate::persistence::SessionStore;
use crate::platform::storage::Storage;
use crate::presentation::Presenter;
use crate::sim::{Board, CardId, GameClock, PendingResolution, Scheduler, SelectionCoordinator};
use crate::tuning::Tuning;

/// Work the scheduler hands back each frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Task {
    /// Per-frame countdown tick
    ClockTick,
    /// Delayed pair comparison
    Resolve(PendingResolution),
}

pub struct Game<S, P> {
    coordinator: SelectionCoordinator,
    clock: GameClock,
    scheduler: Scheduler<Task>,
    store: SessionStore<S>,
    presenter: P,
    tuning: Tuning,
    started: bool,
}

impl<S: Storage, P: Presenter> Game<S, P> {
    pub fn new(board: Board, tuning: Tuning, storage: S, presenter: P) -> Self {
        let tuning = tuning.sanitized();
        Self {
            coordinator: SelectionCoordinator::new(board, tuning.max_mistakes, tuning.game_time),
            clock: GameClock::new(tuning.game_time),
            scheduler: Scheduler::new(),
            store: SessionStore::new(storage),
            presenter,
            tuning,
            started: false,
        }
    }

    pub fn coordinator(&self) -> &SelectionCoordinator {
        &self.coordinator
    }

    pub fn clock(&self) -> &GameClock {
        &self.clock
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn tuning(&self) -> Tuning {
        self.tuning
    }

    pub fn is_finished(&self) -> bool {
        self.coordinator.is_finished()
    }

    /// Begin the session, continuing from a saved record if one exists
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;

        if let Some(saved) = self.store.load() {
            self.coordinator.restore(saved);
            self.clock.restore(saved.remaining_time);
        }

        self.scheduler.every_frame(Task::ClockTick);
        if !self.coordinator.is_finished() {
            self.clock.start();
        }
        self.coordinator.publish_hud();
        self.flush();

        log::info!(
            "Session started: {} pairs, {:.0}s, {} mistakes allowed",
            self.coordinator.rules().total_pairs,
            self.clock.remaining(),
            self.coordinator.rules().max_mistakes
        );
    }

    /// Route a click from the host
    pub fn card_clicked(&mut self, id: CardId) {
        if let Some(pending) = self.coordinator.select_card(id) {
            self.scheduler.after(self.tuning.resolve_delay, Task::Resolve(pending));
        }
        self.flush();
    }

    /// Advance one frame
    pub fn update(&mut self, dt: f32) {
        for task in self.scheduler.advance(dt) {
            match task {
                Task::ClockTick => self.tick_clock(dt),
                Task::Resolve(pending) => self.coordinator.resolve(pending),
            }
        }
        self.flush();
    }

    /// Save the current session now
    pub fn save(&mut self) {
        let session = *self.coordinator.session();
        self.store.save(&session);
    }

    /// Forget any saved session (new game)
    pub fn discard_saved_session(&mut self) {
        self.store.clear();
    }

    /// Save and hand back the backend and presenter
    pub fn shutdown(mut self) -> (S, P) {
        self.save();
        log::info!("Session shut down");
        self.into_parts()
    }

    /// Hand back the backend and presenter without saving
    pub fn into_parts(self) -> (S, P) {
        (self.store.into_storage(), self.presenter)
    }

    fn tick_clock(&mut self, dt: f32) {
        // Countdown freezes once the run is over
        if self.coordinator.is_finished() {
            return;
        }
        if self.clock.tick(dt) {
            log::info!("Time up");
            self.coordinator.expire();
        } else {
            self.coordinator.sync_clock(self.clock.remaining());
        }
    }

    fn flush(&mut self) {
        for event in self.coordinator.drain_events() {
            event.dispatch(&mut self.presenter);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::persistence::SESSION_KEY;
    use crate::platform::storage::{MemoryStorage, StorageError};
    use crate::presentation::{HudSnapshot, SoundCue};
    use crate::sim::{Ending, Face, GameEvent, GamePhase, PairKey, SessionState};

    /// Presenter that records every request
    #[derive(Default)]
    struct Recorder {
        events: Vec<GameEvent>,
    }

    impl Presenter for Recorder {
        fn request_flip(&mut self, card: CardId, face: Face) {
            self.events.push(GameEvent::Flip { card, face });
        }
        fn play_sound(&mut self, cue: SoundCue) {
            self.events.push(GameEvent::Sound(cue));
        }
        fn show_panel(&mut self, ending: Ending) {
            self.events.push(GameEvent::ShowPanel(ending));
        }
        fn update_display(&mut self, hud: &HudSnapshot) {
            self.events.push(GameEvent::Hud(*hud));
        }
    }

    impl Recorder {
        fn panels(&self) -> Vec<Ending> {
            self.events
                .iter()
                .filter_map(|e| match e {
                    GameEvent::ShowPanel(ending) => Some(*ending),
                    _ => None,
                })
                .collect()
        }
    }

    fn game(keys: &[u32], tuning: Tuning, storage: MemoryStorage) -> Game<MemoryStorage, Recorder> {
        let board = Board::from_pair_keys(keys.iter().copied().map(PairKey)).unwrap();
        let mut game = Game::new(board, tuning, storage, Recorder::default());
        game.start();
        game
    }

    #[test]
    fn test_one_pair_win_after_delay() {
        let mut g = game(&[1, 1], Tuning::default(), MemoryStorage::new());

        g.card_clicked(CardId(0));
        g.card_clicked(CardId(1));
        assert_eq!(g.coordinator().phase(), GamePhase::Evaluating);

        // Not yet due
        g.update(0.25);
        assert_eq!(g.coordinator().session().matched_pairs, 0);

        g.update(0.25);
        let session = g.coordinator().session();
        assert_eq!(session.matched_pairs, 1);
        assert!(session.finished);
        assert_eq!(session.remaining_time, 59.5);
        assert_eq!(session.score, 100 + 59 * 10 - 10);
        assert_eq!(g.presenter().panels(), vec![Ending::Win]);

        // Clock is frozen after the win
        g.update(5.0);
        assert_eq!(g.coordinator().session().remaining_time, 59.5);
    }

    #[test]
    fn test_one_mistake_allowed_game_over() {
        let tuning = Tuning {
            max_mistakes: 1,
            ..Tuning::default()
        };
        let mut g = game(&[1, 2, 1, 2], tuning, MemoryStorage::new());

        g.card_clicked(CardId(0));
        g.card_clicked(CardId(1));
        g.update(0.5);

        assert_eq!(g.coordinator().session().mistakes, 1);
        assert_eq!(g.coordinator().phase(), GamePhase::GameOver);
        let events = &g.presenter().events;
        for id in [CardId(0), CardId(1)] {
            assert!(events.contains(&GameEvent::Flip {
                card: id,
                face: Face::Down
            }));
        }
    }

    #[test]
    fn test_time_runs_out_mid_evaluation() {
        let tuning = Tuning {
            game_time: 1.0,
            ..Tuning::default()
        };
        let mut g = game(&[1, 2, 1, 2], tuning, MemoryStorage::new());

        g.update(0.75);
        g.card_clicked(CardId(0));
        g.card_clicked(CardId(2));
        let turns = g.coordinator().session().turns;
        let score = g.coordinator().session().score;

        // Clock hits zero before the pair is due
        g.update(0.3);
        assert_eq!(g.coordinator().phase(), GamePhase::GameOver);
        assert_eq!(g.coordinator().session().remaining_time, 0.0);

        // Pending comparison fires afterwards and changes nothing
        g.update(0.3);
        let session = g.coordinator().session();
        assert_eq!(session.turns, turns);
        assert_eq!(session.score, score);
        assert_eq!(session.matched_pairs, 0);
        assert!(g.coordinator().board().iter().all(|c| !c.is_matched()));
        assert_eq!(g.presenter().panels(), vec![Ending::GameOver]);
    }

    #[test]
    fn test_clicks_ignored_after_game_over() {
        let tuning = Tuning {
            game_time: 0.5,
            ..Tuning::default()
        };
        let mut g = game(&[1, 1], tuning, MemoryStorage::new());
        g.update(1.0);
        assert!(g.is_finished());

        let before = g.presenter().events.len();
        g.card_clicked(CardId(0));
        assert_eq!(g.presenter().events.len(), before);
        assert_eq!(g.coordinator().slots().first, None);
    }

    #[test]
    fn test_shutdown_saves_and_start_restores() {
        let mut g = game(&[1, 2, 1, 2], Tuning::default(), MemoryStorage::new());
        g.update(10.25);
        g.card_clicked(CardId(0));
        g.card_clicked(CardId(2));
        g.update(0.5);

        let saved = *g.coordinator().session();
        let (storage, _) = g.shutdown();
        assert!(storage.has(SESSION_KEY));

        let g = game(&[1, 2, 1, 2], Tuning::default(), storage);
        assert_eq!(*g.coordinator().session(), saved);
        assert_eq!(g.clock().remaining(), saved.remaining_time);
        assert!(g.clock().is_running());
    }

    #[test]
    fn test_restored_finished_session_stays_over() {
        let mut storage = MemoryStorage::new();
        let record = SessionState {
            score: 40,
            remaining_time: 0.0,
            turns: 9,
            mistakes: 4,
            matched_pairs: 1,
            finished: true,
        };
        storage
            .set(SESSION_KEY, &serde_json::to_string(&record).unwrap())
            .unwrap();

        let mut g = game(&[1, 2, 1, 2], Tuning::default(), storage);
        assert_eq!(g.coordinator().phase(), GamePhase::GameOver);
        assert!(!g.clock().is_running());

        g.card_clicked(CardId(0));
        g.update(1.0);
        assert_eq!(*g.coordinator().session(), record);
    }

    #[test]
    fn test_corrupt_save_starts_fresh() {
        let mut storage = MemoryStorage::new();
        storage.set(SESSION_KEY, "garbage").unwrap();
        let g = game(&[1, 1], Tuning::default(), storage);
        assert_eq!(*g.coordinator().session(), SessionState::new(60.0));
    }

    /// Backend that rejects every write
    #[derive(Default)]
    struct ReadOnly;

    impl Storage for ReadOnly {
        fn has(&self, _key: &str) -> bool {
            false
        }
        fn get(&self, key: &str) -> Result<String, StorageError> {
            Err(StorageError::Missing(key.to_string()))
        }
        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("read-only".into()))
        }
        fn remove(&mut self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("read-only".into()))
        }
    }

    #[test]
    fn test_failed_save_keeps_playing() {
        let board = Board::from_pair_keys([1, 2, 1, 2].map(PairKey)).unwrap();
        let mut g = Game::new(board, Tuning::default(), ReadOnly, Recorder::default());
        g.start();
        g.update(1.0);
        g.card_clicked(CardId(0));

        let session = *g.coordinator().session();
        let slots = g.coordinator().slots();
        g.save();
        assert_eq!(*g.coordinator().session(), session);
        assert_eq!(g.coordinator().slots(), slots);
        assert_eq!(g.coordinator().phase(), GamePhase::AwaitingSecond);

        g.card_clicked(CardId(2));
        g.update(0.5);
        assert_eq!(g.coordinator().session().matched_pairs, 1);
        assert_eq!(g.coordinator().phase(), GamePhase::Idle);

        let (_, presenter) = g.shutdown();
        assert!(presenter.panels().is_empty());
    }

    #[test]
    fn test_time_up_shows_zero_seconds() {
        let tuning = Tuning {
            game_time: 2.0,
            ..Tuning::default()
        };
        let mut g = game(&[1, 2, 1, 2], tuning, MemoryStorage::new());
        for _ in 0..200 {
            g.update(SIM_DT);
        }
        assert!(g.is_finished());

        let last_hud = g
            .presenter()
            .events
            .iter()
            .rev()
            .find_map(|e| match e {
                GameEvent::Hud(hud) => Some(hud.remaining_secs),
                _ => None,
            });
        assert_eq!(last_hud, Some(0));
    }

    #[test]
    fn test_saved_session_with_no_time_left_is_over() {
        let mut storage = MemoryStorage::new();
        let record = SessionState {
            remaining_time: 0.0,
            ..SessionState::default()
        };
        storage
            .set(SESSION_KEY, &serde_json::to_string(&record).unwrap())
            .unwrap();

        let mut g = game(&[1, 2, 1, 2], Tuning::default(), storage);
        assert!(g.is_finished());
        assert_eq!(g.presenter().panels(), vec![Ending::GameOver]);

        for _ in 0..600 {
            g.update(SIM_DT);
        }
        g.card_clicked(CardId(0));
        g.card_clicked(CardId(1));
        g.update(1.0);
        assert_eq!(g.coordinator().session().turns, 0);
        assert_eq!(g.coordinator().session().mistakes, 0);
    }

    #[test]
    fn test_discard_saved_session() {
        let mut g = game(&[1, 1], Tuning::default(), MemoryStorage::new());
        g.save();
        g.discard_saved_session();
        assert!(!g.store.storage().has(SESSION_KEY));
    }
}
