//! Engine rejections
//!
//! Every rejected intent leaves the game untouched. [`GameError::kind`] maps a
//! rejection onto the coarse taxonomy reported to clients.

use thiserror::Error;

use crate::core::DeckError;
use crate::types::{Phase, PlayerId};

/// Coarse classification sent on the wire as the `ERROR` prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    ProtocolError,
    TurnViolation,
    ResourceExhausted,
    InvalidIndex,
    InsufficientPlayers,
    Rejected,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ProtocolError => "protocol_error",
            ErrorKind::TurnViolation => "turn_violation",
            ErrorKind::ResourceExhausted => "resource_exhausted",
            ErrorKind::InvalidIndex => "invalid_index",
            ErrorKind::InsufficientPlayers => "insufficient_players",
            ErrorKind::Rejected => "rejected",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "protocol_error" => Some(ErrorKind::ProtocolError),
            "turn_violation" => Some(ErrorKind::TurnViolation),
            "resource_exhausted" => Some(ErrorKind::ResourceExhausted),
            "invalid_index" => Some(ErrorKind::InvalidIndex),
            "insufficient_players" => Some(ErrorKind::InsufficientPlayers),
            "rejected" => Some(ErrorKind::Rejected),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("not player {player}'s turn (current: {current})")]
    NotYourTurn { player: PlayerId, current: PlayerId },
    #[error("{action} is not allowed during {phase}")]
    WrongPhase { action: &'static str, phase: Phase },
    #[error("a card drawn from the discard pile must be exchanged")]
    MustExchange,
    #[error("no face-down card left to reveal; exchange instead")]
    NothingToReveal,
    #[error("player {0} already revealed two cards")]
    InitiativeDone(PlayerId),
    #[error("card index {index} out of range (hand has {len})")]
    InvalidIndex { index: usize, len: usize },
    #[error("card {0} is already face-up")]
    AlreadyFaceUp(usize),
    #[error("{0}")]
    Deck(#[from] DeckError),
    #[error("need at least {required} players, have {joined}")]
    InsufficientPlayers { joined: usize, required: usize },
    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),
    #[error("player {0} is already seated")]
    DuplicatePlayer(PlayerId),
    #[error("name `{0}` is already taken")]
    NameTaken(String),
    #[error("table is full ({0} seats)")]
    TableFull(usize),
    #[error("match already in progress")]
    MatchInProgress,
}

impl GameError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GameError::NotYourTurn { .. }
            | GameError::WrongPhase { .. }
            | GameError::MustExchange
            | GameError::NothingToReveal
            | GameError::InitiativeDone(_) => ErrorKind::TurnViolation,
            GameError::InvalidIndex { .. } | GameError::AlreadyFaceUp(_) => ErrorKind::InvalidIndex,
            GameError::Deck(_) => ErrorKind::ResourceExhausted,
            GameError::InsufficientPlayers { .. } => ErrorKind::InsufficientPlayers,
            GameError::UnknownPlayer(_)
            | GameError::DuplicatePlayer(_)
            | GameError::NameTaken(_)
            | GameError::TableFull(_)
            | GameError::MatchInProgress => ErrorKind::Rejected,
        }
    }
}
