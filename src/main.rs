//! Pair Flip entry point
//!
//! Native builds run a headless autoplay session on a fixed timestep and
//! keep the save in a local directory. Web hosts embed the library directly.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::collections::HashMap;

    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use pair_flip::consts::SIM_DT;
    use pair_flip::platform::FileStorage;
    use pair_flip::sim::{Board, BoardError, CardId, Ending, Face, GamePhase, PairKey};
    use pair_flip::{Game, HudSnapshot, Presenter, SoundCue, Storage, Tuning};

    /// Pairs dealt for the demo board
    const DEMO_PAIRS: u32 = 8;
    /// Frames between autoplay clicks
    const CLICK_INTERVAL: u32 = 20;
    /// Chance the autoplayer forgets a card it has seen
    const FORGET_CHANCE: f64 = 0.35;
    /// Hard stop for the loop (10 minutes of frames)
    const MAX_FRAMES: u32 = 60 * 600;

    /// Presenter that writes every request to the log
    struct LogPresenter;

    impl Presenter for LogPresenter {
        fn request_flip(&mut self, card: CardId, face: Face) {
            log::debug!("flip {card} -> {face:?}");
        }

        fn play_sound(&mut self, cue: SoundCue) {
            log::debug!("sound {cue:?}");
        }

        fn show_panel(&mut self, ending: Ending) {
            match ending {
                Ending::Win => log::info!("*** YOU WIN ***"),
                Ending::GameOver => log::info!("*** GAME OVER ***"),
            }
        }

        fn update_display(&mut self, hud: &HudSnapshot) {
            log::debug!(
                "Time: {} secs | Turns: {} | Matches: {}/{} | Score: {}",
                hud.remaining_secs,
                hud.turns,
                hud.matched_pairs,
                hud.total_pairs,
                hud.score
            );
        }
    }

    /// Autoplayer with a leaky memory of revealed cards
    struct AutoPlayer {
        rng: Pcg32,
        seen: HashMap<CardId, PairKey>,
    }

    impl AutoPlayer {
        fn new(seed: u64) -> Self {
            Self {
                rng: Pcg32::seed_from_u64(seed ^ 0x5eed),
                seen: HashMap::new(),
            }
        }

        /// Remember face-up cards, occasionally forgetting old ones
        fn observe(&mut self, board: &Board) {
            for card in board.iter() {
                if card.is_matched() {
                    self.seen.remove(&card.id);
                } else if card.face() == Face::Up {
                    self.seen.insert(card.id, card.pair_key);
                }
            }
            let rng = &mut self.rng;
            self.seen.retain(|_, _| !rng.random_bool(FORGET_CHANCE / 10.0));
        }

        fn choose(&mut self, board: &Board, first: Option<CardId>) -> Option<CardId> {
            let selectable: Vec<CardId> = board
                .iter()
                .filter(|c| c.is_selectable() && c.is_interactive())
                .map(|c| c.id)
                .collect();
            if selectable.is_empty() {
                return None;
            }

            let recalled = match first.and_then(|id| board.get(id)) {
                // Partner of the card already up
                Some(up) => selectable
                    .iter()
                    .copied()
                    .find(|id| self.seen.get(id) == Some(&up.pair_key)),
                // Any remembered pair
                None => selectable.iter().copied().find(|a| {
                    let Some(key) = self.seen.get(a) else {
                        return false;
                    };
                    selectable
                        .iter()
                        .any(|b| a != b && self.seen.get(b) == Some(key))
                }),
            };

            recalled
                .filter(|_| !self.rng.random_bool(FORGET_CHANCE))
                .or_else(|| {
                    let i = self.rng.random_range(0..selectable.len());
                    Some(selectable[i])
                })
        }
    }

    fn deal(seed: u64) -> Result<Board, BoardError> {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut keys: Vec<PairKey> = (0..DEMO_PAIRS)
            .flat_map(|k| [PairKey(k), PairKey(k)])
            .collect();
        keys.shuffle(&mut rng);
        Board::from_pair_keys(keys)
    }

    pub fn run() {
        env_logger::init();
        log::info!("Pair Flip (native) starting...");

        let save_dir = std::env::temp_dir().join("pair_flip");
        let storage = match FileStorage::new(&save_dir) {
            Ok(storage) => storage,
            Err(e) => {
                log::error!("Cannot open save directory {}: {e}", save_dir.display());
                return;
            }
        };
        let tuning = Tuning::load(&storage);

        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(12345);
        log::info!("Dealing {DEMO_PAIRS} pairs with seed: {seed}");

        let board = match deal(seed) {
            Ok(board) => board,
            Err(e) => {
                log::error!("Bad demo layout: {e}");
                return;
            }
        };

        let mut game = Game::new(board.clone(), tuning, storage, LogPresenter);
        game.start();

        if game.is_finished() {
            // Last run already ended; start over
            game.discard_saved_session();
            let (storage, presenter) = game.into_parts();
            game = Game::new(board, tuning, storage, presenter);
            game.start();
        }

        let mut player = AutoPlayer::new(seed);
        let mut frame = 0;
        while !game.is_finished() && frame < MAX_FRAMES {
            game.update(SIM_DT);
            frame += 1;

            let coordinator = game.coordinator();
            player.observe(coordinator.board());
            let ready = matches!(coordinator.phase(), GamePhase::Idle | GamePhase::AwaitingSecond);
            if ready && frame % CLICK_INTERVAL == 0 {
                let first = coordinator.slots().first;
                if let Some(id) = player.choose(coordinator.board(), first) {
                    game.card_clicked(id);
                }
            }
        }

        let session = *game.coordinator().session();
        log::info!(
            "Final: score {}, {} turns, {} mistakes, {}/{} pairs, {:.1}s left",
            session.score,
            session.turns,
            session.mistakes,
            session.matched_pairs,
            game.coordinator().rules().total_pairs,
            session.remaining_time
        );

        let (storage, _) = game.shutdown();
        if storage.has(pair_flip::persistence::SESSION_KEY) {
            log::info!("Save written to {}", save_dir.display());
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Web hosts drive `pair_flip::Game` directly; nothing to run here
}
