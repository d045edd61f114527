//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (rule engine, wire protocol, client mirror).
//!
//! # Card Composition
//!
//! A round is played with a fixed multiset of 150 cards:
//!
//! | Value | Copies |
//! |-------|--------|
//! | -2 | 5 |
//! | -1 | 10 |
//! | 0 | 15 |
//! | 1 ..= 12 | 10 each |
//!
//! # Hand Layout
//!
//! Each player is dealt [`HAND_SIZE`] cards laid out as [`GRID_ROWS`] rows by
//! `len / GRID_ROWS` columns, stored row-major. Clearing a column removes one
//! card from every row, so the grid stays rectangular.
//!
//! # Match Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `MIN_PLAYERS` | 2 | Players required to start |
//! | `MAX_PLAYERS` | 8 | Seats at the table |
//! | `INITIAL_REVEALS` | 2 | Cards each player reveals to decide initiative |
//! | `MATCH_END_SCORE` | 100 | Cumulative score that ends the match |
//!
//! # Examples
//!
//! ```
//! use skyjo_types::{Card, CardId, DrawSource, Intent, DECK_SIZE};
//!
//! let card = Card::new(CardId(7), 12);
//! assert!(!card.is_face_up());
//!
//! let shown = card.revealed();
//! assert!(shown.is_face_up());
//! assert_eq!(shown.id(), card.id());
//!
//! assert_eq!(DrawSource::from_str("discard"), Some(DrawSource::Discard));
//! assert_eq!(Intent::Exchange(3).as_str(), "exchange");
//! assert_eq!(DECK_SIZE, 150);
//! ```

use std::fmt;

/// Rows in a player's grid
pub const GRID_ROWS: usize = 3;

/// Cards dealt to each player at the start of a round
pub const HAND_SIZE: usize = 12;

/// Columns in a freshly dealt grid
pub const MAX_COLUMNS: usize = HAND_SIZE / GRID_ROWS;

/// Total number of cards in play during a round
pub const DECK_SIZE: usize = 150;

/// Minimum number of seated players for a match to start or continue
pub const MIN_PLAYERS: usize = 2;

/// Maximum number of seated players
pub const MAX_PLAYERS: usize = 8;

/// Cards each player reveals before the first round to decide who opens
pub const INITIAL_REVEALS: usize = 2;

/// Cumulative score at which the match ends
pub const MATCH_END_SCORE: i32 = 100;

/// Longest accepted display name, in characters
pub const MAX_NAME_LEN: usize = 32;

/// Card values and how many copies of each make up the deck
pub const CARD_COMPOSITION: [(i8, u8); 15] = [
    (-2, 5),
    (-1, 10),
    (0, 15),
    (1, 10),
    (2, 10),
    (3, 10),
    (4, 10),
    (5, 10),
    (6, 10),
    (7, 10),
    (8, 10),
    (9, 10),
    (10, 10),
    (11, 10),
    (12, 10),
];

/// Stable player identity assigned by the session at join time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable card identity, unique within one round's deck
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CardId(pub u32);

/// A single card: value, visibility, and an identity that never changes
///
/// Cards are value objects. Flipping returns a new card with the same id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Card {
    id: CardId,
    value: i8,
    face_up: bool,
}

impl Card {
    /// Create a face-down card
    pub const fn new(id: CardId, value: i8) -> Self {
        Self {
            id,
            value,
            face_up: false,
        }
    }

    pub fn id(&self) -> CardId {
        self.id
    }

    pub fn value(&self) -> i8 {
        self.value
    }

    pub fn is_face_up(&self) -> bool {
        self.face_up
    }

    /// Same card, face-up
    #[must_use]
    pub fn revealed(self) -> Self {
        Self {
            face_up: true,
            ..self
        }
    }

    /// Same card, face-down
    #[must_use]
    pub fn hidden(self) -> Self {
        Self {
            face_up: false,
            ..self
        }
    }
}

/// Pile a turn's card is drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawSource {
    Deck,
    Discard,
}

impl DrawSource {
    /// Parse draw source from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "deck" => Some(DrawSource::Deck),
            "discard" => Some(DrawSource::Discard),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DrawSource::Deck => "deck",
            DrawSource::Discard => "discard",
        }
    }
}

/// Player intents accepted by the engine
///
/// Every inbound wire message that asks for a state change maps onto exactly
/// one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Start the match (from the lobby) or the next round
    Start,
    /// Draw a card from the given pile
    Draw(DrawSource),
    /// Swap the pending card into the given hand slot
    Exchange(usize),
    /// Throw the pending card away; a reveal must follow
    Discard,
    /// Turn the given face-down slot face-up
    Reveal(usize),
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Start => "start",
            Intent::Draw(_) => "draw",
            Intent::Exchange(_) => "exchange",
            Intent::Discard => "discard",
            Intent::Reveal(_) => "reveal",
        }
    }
}

/// Phase of the session state machine
///
/// - **Lobby**: players joining, no cards dealt
/// - **InitialReveal**: every player reveals two cards; the highest total opens
/// - **AwaitingDraw**: the current player must draw
/// - **AwaitingDecision**: a card is pending; exchange it or discard it
/// - **AwaitingReveal**: the pending card was discarded; a face-down slot must be revealed
/// - **RoundOver**: scores tallied, waiting for the next start
/// - **MatchOver**: terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Lobby,
    InitialReveal,
    AwaitingDraw,
    AwaitingDecision,
    AwaitingReveal,
    RoundOver,
    MatchOver,
}

impl Phase {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "lobby" => Some(Phase::Lobby),
            "initial_reveal" => Some(Phase::InitialReveal),
            "awaiting_draw" => Some(Phase::AwaitingDraw),
            "awaiting_decision" => Some(Phase::AwaitingDecision),
            "awaiting_reveal" => Some(Phase::AwaitingReveal),
            "round_over" => Some(Phase::RoundOver),
            "match_over" => Some(Phase::MatchOver),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Lobby => "lobby",
            Phase::InitialReveal => "initial_reveal",
            Phase::AwaitingDraw => "awaiting_draw",
            Phase::AwaitingDecision => "awaiting_decision",
            Phase::AwaitingReveal => "awaiting_reveal",
            Phase::RoundOver => "round_over",
            Phase::MatchOver => "match_over",
        }
    }

    /// True while some seat holds the turn
    pub fn is_turn_phase(&self) -> bool {
        matches!(
            self,
            Phase::AwaitingDraw | Phase::AwaitingDecision | Phase::AwaitingReveal
        )
    }

    /// True once cards have been dealt and the match has not ended
    pub fn is_in_match(&self) -> bool {
        !matches!(self, Phase::Lobby | Phase::MatchOver)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composition_sums_to_deck_size() {
        let total: usize = CARD_COMPOSITION.iter().map(|&(_, n)| n as usize).sum();
        assert_eq!(total, DECK_SIZE);
        assert_eq!(MAX_COLUMNS, 4);
    }

    #[test]
    fn reveal_and_hide_keep_identity() {
        let card = Card::new(CardId(3), -2);
        let up = card.revealed();
        assert!(up.is_face_up());
        assert_eq!(up.hidden(), card);
        assert_eq!(up.value(), -2);
    }

    #[test]
    fn intent_names_round_trip() {
        for intent in [
            Intent::Start,
            Intent::Draw(DrawSource::Deck),
            Intent::Discard,
            Intent::Reveal(0),
            Intent::Exchange(0),
        ] {
            assert!(!intent.as_str().is_empty());
        }
        assert_eq!(Phase::from_str("awaiting_draw"), Some(Phase::AwaitingDraw));
        assert_eq!(Phase::MatchOver.as_str(), "match_over");
    }
}
