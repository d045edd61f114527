//! Read-only view of a game, shaped for the wire
//!
//! The snapshot is plain serde data so the protocol layer can serialize it
//! without reaching into engine internals. Every card carries its id, its
//! visibility, and its value; [`GameSnapshot::redacted_for`] blanks the values
//! a given viewer should not see.

use serde::{Deserialize, Serialize};

use crate::types::{Card, Phase};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhaseLower {
    #[serde(rename = "lobby")]
    Lobby,
    #[serde(rename = "initial_reveal")]
    InitialReveal,
    #[serde(rename = "awaiting_draw")]
    AwaitingDraw,
    #[serde(rename = "awaiting_decision")]
    AwaitingDecision,
    #[serde(rename = "awaiting_reveal")]
    AwaitingReveal,
    #[serde(rename = "round_over")]
    RoundOver,
    #[serde(rename = "match_over")]
    MatchOver,
}

impl From<Phase> for PhaseLower {
    fn from(value: Phase) -> Self {
        match value {
            Phase::Lobby => PhaseLower::Lobby,
            Phase::InitialReveal => PhaseLower::InitialReveal,
            Phase::AwaitingDraw => PhaseLower::AwaitingDraw,
            Phase::AwaitingDecision => PhaseLower::AwaitingDecision,
            Phase::AwaitingReveal => PhaseLower::AwaitingReveal,
            Phase::RoundOver => PhaseLower::RoundOver,
            Phase::MatchOver => PhaseLower::MatchOver,
        }
    }
}

impl From<PhaseLower> for Phase {
    fn from(value: PhaseLower) -> Self {
        match value {
            PhaseLower::Lobby => Phase::Lobby,
            PhaseLower::InitialReveal => Phase::InitialReveal,
            PhaseLower::AwaitingDraw => Phase::AwaitingDraw,
            PhaseLower::AwaitingDecision => Phase::AwaitingDecision,
            PhaseLower::AwaitingReveal => Phase::AwaitingReveal,
            PhaseLower::RoundOver => Phase::RoundOver,
            PhaseLower::MatchOver => Phase::MatchOver,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardView {
    pub id: u32,
    /// `None` only in a redacted snapshot
    pub value: Option<i8>,
    pub face_up: bool,
}

impl From<&Card> for CardView {
    fn from(card: &Card) -> Self {
        Self {
            id: card.id().0,
            value: Some(card.value()),
            face_up: card.is_face_up(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub id: u32,
    pub name: String,
    pub score: i32,
    /// Row-major, three rows
    pub hand: Vec<CardView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub round: u32,
    pub phase: PhaseLower,
    /// Seating order
    pub players: Vec<PlayerView>,
    pub discard_top: Option<CardView>,
    pub draw_count: usize,
    pub current_player: Option<u32>,
    #[serde(default)]
    pub pending: Option<CardView>,
    pub final_round: bool,
}

impl GameSnapshot {
    pub fn player(&self, id: u32) -> Option<&PlayerView> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Copy with other players' face-down values blanked
    ///
    /// `None` hides every face-down value, which suits spectators.
    pub fn redacted_for(&self, viewer: Option<u32>) -> GameSnapshot {
        let mut out = self.clone();
        for player in out.players.iter_mut() {
            if Some(player.id) == viewer {
                continue;
            }
            for card in player.hand.iter_mut().filter(|c| !c.face_up) {
                card.value = None;
            }
        }
        out
    }

    /// Cards visible in hands, the discard top, and the pending slot
    pub fn visible_card_count(&self) -> usize {
        let in_hands: usize = self.players.iter().map(|p| p.hand.len()).sum();
        in_hands + self.discard_top.iter().count() + self.pending.iter().count()
    }
}
