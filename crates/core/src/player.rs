//! Player module - seat identity, hand, and cumulative score

use crate::hand::Hand;
use crate::types::{PlayerId, INITIAL_REVEALS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    id: PlayerId,
    name: String,
    hand: Hand,
    score: i32,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            hand: Hand::default(),
            score: 0,
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hand(&self) -> &Hand {
        &self.hand
    }

    pub fn hand_mut(&mut self) -> &mut Hand {
        &mut self.hand
    }

    /// Replace the hand with a freshly dealt one
    pub fn deal(&mut self, hand: Hand) {
        self.hand = hand;
    }

    /// Cumulative score across rounds
    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn add_score(&mut self, points: i32) {
        self.score += points;
    }

    /// Whether this player has finished the initiative reveal
    pub fn initiative_ready(&self) -> bool {
        self.hand.face_up_count() >= INITIAL_REVEALS
    }
}
