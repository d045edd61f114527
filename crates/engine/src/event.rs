//! Events emitted by a successful engine transition
//!
//! The session turns these into wire broadcasts; the engine never talks to
//! connections itself.

use arrayvec::ArrayVec;

use crate::core::RoundResult;
use crate::types::{DrawSource, Phase, PlayerId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// Cards dealt for a new round
    Started { round: u32 },
    /// A card moved to the pending slot
    Drew {
        player: PlayerId,
        source: DrawSource,
        /// The discard pile was reshuffled into the draw pile first
        recycled: bool,
    },
    Exchanged {
        player: PlayerId,
        index: usize,
        displaced_value: i8,
    },
    Discarded { player: PlayerId },
    Revealed { player: PlayerId, index: usize },
    ColumnsCleared {
        player: PlayerId,
        columns: ArrayVec<usize, 4>,
    },
    /// `player` revealed a full hand; everyone else gets one more turn
    FinalRound { player: PlayerId },
    TurnChanged(PlayerId),
    RoundOver(RoundResult),
    MatchOver(RoundResult),
    PlayerLeft(PlayerId),
    /// Too few players remain to continue
    MatchAbandoned,
}

/// Result of one applied intent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub events: ArrayVec<GameEvent, 8>,
    /// Phase after the transition
    pub phase: Phase,
}

impl Outcome {
    pub(crate) fn new(phase: Phase) -> Self {
        Self {
            events: ArrayVec::new(),
            phase,
        }
    }

    pub fn started(&self) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, GameEvent::Started { .. }))
    }

    /// Round result, if this transition ended a round or the match
    pub fn round_result(&self) -> Option<&RoundResult> {
        self.events.iter().find_map(|e| match e {
            GameEvent::RoundOver(r) | GameEvent::MatchOver(r) => Some(r),
            _ => None,
        })
    }

    pub fn abandoned(&self) -> bool {
        self.events.iter().any(|e| matches!(e, GameEvent::MatchAbandoned))
    }
}
