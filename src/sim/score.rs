//! Score rules
//!
//! Every resolved pair adds the outcome bonus/penalty plus a running term
//! built from time left, turns taken and mistakes made. The time/turn/mistake
//! term is applied on matches and mismatches alike.

use super::state::SessionState;
use crate::consts::*;

/// Result of comparing a selected pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Match,
    Mismatch,
}

/// Score change for a resolution. `session` must already carry the
/// post-increment turn and mistake counts for this resolution.
pub fn compute_delta(outcome: Outcome, session: &SessionState) -> i64 {
    let base = match outcome {
        Outcome::Match => MATCH_BONUS,
        Outcome::Mismatch => -MISMATCH_PENALTY,
    };

    let whole_seconds = session.remaining_time.max(0.0).floor() as i64;
    base + whole_seconds * TIME_BONUS_PER_SEC
        - i64::from(session.turns) * TURN_PENALTY
        - i64::from(session.mistakes) * MISTAKE_PENALTY
}

/// Apply a resolution to the session score, clamping at zero
pub fn apply(outcome: Outcome, session: &mut SessionState) {
    let next = i64::from(session.score) + compute_delta(outcome, session);
    session.score = next.clamp(0, i64::from(u32::MAX)) as u32;
}
