//! Deterministic rules module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Time only advances through explicit `tick`/`advance` calls
//! - No rendering, audio or storage dependencies
//! - Presentation is requested through queued `GameEvent`s

pub mod card;
pub mod clock;
pub mod coordinator;
pub mod scheduler;
pub mod score;
pub mod state;

pub use card::{Board, BoardError, Card, CardId, Face, PairKey};
pub use clock::GameClock;
pub use coordinator::{PendingResolution, Rules, SelectionCoordinator, SelectionSlots};
pub use scheduler::Scheduler;
pub use score::{Outcome, compute_delta};
pub use state::{Ending, GameEvent, GamePhase, SessionState};
