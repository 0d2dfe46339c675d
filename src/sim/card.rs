//! Card entities and the board that owns them
//!
//! Cards only hold their own flip/match flags. Every transition is issued by
//! the selection coordinator, which also emits the matching presentation
//! requests.

use std::collections::HashMap;

use thiserror::Error;

/// Board-unique card identifier (index into the board)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CardId(pub u32);

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Opaque pair key. Two cards match iff their keys are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PairKey(pub u32);

/// Which side of the card is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Face {
    #[default]
    Down,
    Up,
}

/// A single card on the board
#[derive(Debug, Clone)]
pub struct Card {
    pub id: CardId,
    pub pair_key: PairKey,
    face: Face,
    matched: bool,
    /// Cleared when the run ends so the card stops taking clicks
    interactive: bool,
}

impl Card {
    pub fn new(id: CardId, pair_key: PairKey) -> Self {
        Self {
            id,
            pair_key,
            face: Face::Down,
            matched: false,
            interactive: true,
        }
    }

    pub fn face(&self) -> Face {
        self.face
    }

    pub fn is_matched(&self) -> bool {
        self.matched
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    /// True iff the card is face down and not yet matched
    pub fn is_selectable(&self) -> bool {
        !self.matched && self.face == Face::Down
    }

    /// Turn the card face up. Returns false (and does nothing) if the card is
    /// not selectable.
    pub fn reveal(&mut self) -> bool {
        if !self.is_selectable() {
            return false;
        }
        self.face = Face::Up;
        true
    }

    /// Turn a face-up, unmatched card back down. Returns whether it flipped.
    pub fn hide(&mut self) -> bool {
        if self.matched || self.face == Face::Down {
            return false;
        }
        self.face = Face::Down;
        true
    }

    /// Lock the card as part of a found pair. Idempotent.
    pub fn mark_matched(&mut self) {
        if self.face != Face::Up {
            log::warn!("{} marked matched while face down, ignoring", self.id);
            return;
        }
        self.matched = true;
    }

    pub fn disable(&mut self) {
        self.interactive = false;
    }
}

/// Reasons a layout cannot be turned into a board
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("board must contain at least one pair")]
    Empty,
    #[error("pair key {key} appears {count} times; every key must appear exactly twice")]
    UnpairedKey { key: u32, count: usize },
}

/// The explicit set of cards in play, built once at session start
#[derive(Debug, Clone)]
pub struct Board {
    cards: Vec<Card>,
}

impl Board {
    /// Build a board from a layout of pair keys. Card ids follow layout order.
    pub fn from_pair_keys(keys: impl IntoIterator<Item = PairKey>) -> Result<Self, BoardError> {
        let cards: Vec<Card> = keys
            .into_iter()
            .enumerate()
            .map(|(i, key)| Card::new(CardId(i as u32), key))
            .collect();

        if cards.is_empty() {
            return Err(BoardError::Empty);
        }

        let mut counts: HashMap<PairKey, usize> = HashMap::new();
        for card in &cards {
            *counts.entry(card.pair_key).or_default() += 1;
        }
        // Report the first offending key in layout order so errors are stable
        for card in &cards {
            let count = counts[&card.pair_key];
            if count != 2 {
                return Err(BoardError::UnpairedKey {
                    key: card.pair_key.0,
                    count,
                });
            }
        }

        Ok(Self { cards })
    }

    pub fn total_pairs(&self) -> u32 {
        (self.cards.len() / 2) as u32
    }

    pub fn get(&self, id: CardId) -> Option<&Card> {
        self.cards.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: CardId) -> Option<&mut Card> {
        self.cards.get_mut(id.0 as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    /// Stop every card from taking input (single pass at end of run)
    pub fn disable_all(&mut self) {
        for card in &mut self.cards {
            card.disable();
        }
    }
}
