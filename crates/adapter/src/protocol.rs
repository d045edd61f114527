//! Wire protocol definitions
//!
//! One message per line, fields separated by `|`. The first field is the
//! message type, the second a player id (`-1` for server/broadcast), the rest
//! type-specific. Parsing splits at most as many fields as the type needs, so
//! a snapshot or error text may itself contain `|`.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::engine::{ErrorKind, GameSnapshot};
use crate::types::{DrawSource, Intent, PlayerId, MAX_NAME_LEN};

pub const DELIMITER: char = '|';

/// Player-id field meaning "no specific player"
pub const SERVER_ID: &str = "-1";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("empty line")]
    Empty,
    #[error("invalid utf-8")]
    InvalidUtf8,
    #[error("unknown message type `{0}`")]
    UnknownType(String),
    #[error("wrong field count for {kind}: got {got}")]
    FieldCount { kind: &'static str, got: usize },
    #[error("bad player id `{0}`")]
    BadPlayerId(String),
    #[error("bad card index `{0}`")]
    BadIndex(String),
    #[error("bad draw source `{0}`")]
    BadSource(String),
    #[error("bad end reason `{0}`")]
    BadReason(String),
    #[error("bad name: {0}")]
    BadName(&'static str),
    #[error("bad snapshot: {0}")]
    BadSnapshot(String),
}

/// Why an `END` was sent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndReason {
    Round,
    Match,
    InsufficientPlayers,
}

impl EndReason {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "round" => Some(EndReason::Round),
            "match" => Some(EndReason::Match),
            "insufficient_players" => Some(EndReason::InsufficientPlayers),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EndReason::Round => "round",
            EndReason::Match => "match",
            EndReason::InsufficientPlayers => "insufficient_players",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// `player` is `None` on the client's request and set on the broadcast
    Join {
        player: Option<PlayerId>,
        name: String,
    },
    /// `None` when server-originated
    Start { player: Option<PlayerId> },
    Pick {
        player: PlayerId,
        source: DrawSource,
    },
    Discard { player: PlayerId },
    Reveal { player: PlayerId, index: usize },
    Exchange { player: PlayerId, index: usize },
    Turn { player: PlayerId },
    State { snapshot: Box<GameSnapshot> },
    End { reason: Option<EndReason> },
    Left { name: String },
    Error { message: String },
}

impl Message {
    /// Message type token
    pub fn kind(&self) -> &'static str {
        match self {
            Message::Join { .. } => "JOIN",
            Message::Start { .. } => "START",
            Message::Pick { .. } => "PICK",
            Message::Discard { .. } => "DISCARD",
            Message::Reveal { .. } => "REVEAL",
            Message::Exchange { .. } => "EXCHANGE",
            Message::Turn { .. } => "TURN",
            Message::State { .. } => "STATE",
            Message::End { .. } => "END",
            Message::Left { .. } => "LEFT",
            Message::Error { .. } => "ERROR",
        }
    }

    /// Player id carried in the second field, if any
    pub fn player(&self) -> Option<PlayerId> {
        match self {
            Message::Join { player, .. } | Message::Start { player } => *player,
            Message::Pick { player, .. }
            | Message::Discard { player }
            | Message::Reveal { player, .. }
            | Message::Exchange { player, .. }
            | Message::Turn { player } => Some(*player),
            Message::State { .. }
            | Message::End { .. }
            | Message::Left { .. }
            | Message::Error { .. } => None,
        }
    }

    /// Types only the server may send
    pub fn is_server_only(&self) -> bool {
        matches!(
            self,
            Message::Turn { .. }
                | Message::State { .. }
                | Message::End { .. }
                | Message::Left { .. }
                | Message::Error { .. }
        )
    }

    /// Engine intent this message requests, for client-originated types
    pub fn intent(&self) -> Option<Intent> {
        match self {
            Message::Start { .. } => Some(Intent::Start),
            Message::Pick { source, .. } => Some(Intent::Draw(*source)),
            Message::Discard { .. } => Some(Intent::Discard),
            Message::Reveal { index, .. } => Some(Intent::Reveal(*index)),
            Message::Exchange { index, .. } => Some(Intent::Exchange(*index)),
            _ => None,
        }
    }

    pub fn state(snapshot: GameSnapshot) -> Self {
        Message::State {
            snapshot: Box::new(snapshot),
        }
    }
}

fn write_id(f: &mut fmt::Formatter<'_>, player: Option<PlayerId>) -> fmt::Result {
    match player {
        Some(id) => write!(f, "{}", id.0),
        None => f.write_str(SERVER_ID),
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind())?;
        f.write_str("|")?;
        write_id(f, self.player())?;
        match self {
            Message::Join { name, .. } | Message::Left { name } => write!(f, "|{name}"),
            Message::Pick {
                source: DrawSource::Discard,
                ..
            } => f.write_str("|discard"),
            Message::Reveal { index, .. } | Message::Exchange { index, .. } => {
                write!(f, "|{index}")
            }
            Message::State { snapshot } => {
                let json = serde_json::to_string(&**snapshot).map_err(|_| fmt::Error)?;
                write!(f, "|{json}")
            }
            Message::End {
                reason: Some(reason),
            } => write!(f, "|{}", reason.as_str()),
            Message::Error { message } => write!(f, "|{message}"),
            _ => Ok(()),
        }
    }
}

impl FromStr for Message {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_message(s)
    }
}

/// Check a display name and return it trimmed
pub fn validate_name(name: &str) -> Result<String, ProtocolError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ProtocolError::BadName("empty"));
    }
    if name.contains(['|', '\r', '\n']) {
        return Err(ProtocolError::BadName("contains a reserved character"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(ProtocolError::BadName("too long"));
    }
    Ok(name.to_string())
}

fn parse_id(field: &str) -> Result<Option<PlayerId>, ProtocolError> {
    if field == SERVER_ID {
        return Ok(None);
    }
    field
        .parse::<u32>()
        .map(|id| Some(PlayerId(id)))
        .map_err(|_| ProtocolError::BadPlayerId(field.to_string()))
}

fn require_player(field: &str) -> Result<PlayerId, ProtocolError> {
    parse_id(field)?.ok_or_else(|| ProtocolError::BadPlayerId(field.to_string()))
}

fn require_server(field: &str) -> Result<(), ProtocolError> {
    match parse_id(field)? {
        None => Ok(()),
        Some(_) => Err(ProtocolError::BadPlayerId(field.to_string())),
    }
}

fn parse_index(field: &str) -> Result<usize, ProtocolError> {
    field
        .parse::<usize>()
        .map_err(|_| ProtocolError::BadIndex(field.to_string()))
}

/// Parse one line (without its terminator) into a [`Message`]
pub fn parse_message(line: &str) -> Result<Message, ProtocolError> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return Err(ProtocolError::Empty);
    }

    let mut fields = line.splitn(3, DELIMITER);
    let kind = fields.next().unwrap_or_default();
    let id = fields.next();
    let rest = fields.next();

    let field_count = |kind: &'static str| ProtocolError::FieldCount {
        kind,
        got: line.split(DELIMITER).count(),
    };

    let message = match kind {
        "JOIN" => match (id, rest) {
            (Some(id), Some(name)) => Message::Join {
                player: parse_id(id)?,
                name: validate_name(name)?,
            },
            _ => return Err(field_count("JOIN")),
        },
        "START" => match (id, rest) {
            (Some(id), None) => Message::Start {
                player: parse_id(id)?,
            },
            _ => return Err(field_count("START")),
        },
        "PICK" => match (id, rest) {
            (Some(id), source) => {
                let source = match source {
                    None => DrawSource::Deck,
                    Some(s) => DrawSource::from_str(s)
                        .ok_or_else(|| ProtocolError::BadSource(s.to_string()))?,
                };
                Message::Pick {
                    player: require_player(id)?,
                    source,
                }
            }
            _ => return Err(field_count("PICK")),
        },
        "DISCARD" => match (id, rest) {
            (Some(id), None) => Message::Discard {
                player: require_player(id)?,
            },
            _ => return Err(field_count("DISCARD")),
        },
        "REVEAL" => match (id, rest) {
            (Some(id), Some(index)) => Message::Reveal {
                player: require_player(id)?,
                index: parse_index(index)?,
            },
            _ => return Err(field_count("REVEAL")),
        },
        "EXCHANGE" => match (id, rest) {
            (Some(id), Some(index)) => Message::Exchange {
                player: require_player(id)?,
                index: parse_index(index)?,
            },
            _ => return Err(field_count("EXCHANGE")),
        },
        "TURN" => match (id, rest) {
            (Some(id), None) => Message::Turn {
                player: require_player(id)?,
            },
            _ => return Err(field_count("TURN")),
        },
        "STATE" => match (id, rest) {
            (Some(id), Some(json)) => {
                require_server(id)?;
                let snapshot: GameSnapshot = serde_json::from_str(json)
                    .map_err(|e| ProtocolError::BadSnapshot(e.to_string()))?;
                Message::state(snapshot)
            }
            _ => return Err(field_count("STATE")),
        },
        "END" => match (id, rest) {
            (Some(id), reason) => {
                require_server(id)?;
                let reason = match reason {
                    None => None,
                    Some(r) => Some(
                        EndReason::from_str(r)
                            .ok_or_else(|| ProtocolError::BadReason(r.to_string()))?,
                    ),
                };
                Message::End { reason }
            }
            _ => return Err(field_count("END")),
        },
        "LEFT" => match (id, rest) {
            (Some(id), Some(name)) => {
                require_server(id)?;
                Message::Left {
                    name: name.to_string(),
                }
            }
            _ => return Err(field_count("LEFT")),
        },
        "ERROR" => match (id, rest) {
            (Some(id), Some(message)) => {
                require_server(id)?;
                Message::Error {
                    message: message.to_string(),
                }
            }
            _ => return Err(field_count("ERROR")),
        },
        other => return Err(ProtocolError::UnknownType(other.to_string())),
    };
    Ok(message)
}

/// Build an `ERROR` message as `<kind>: <detail>`
pub fn create_error(kind: ErrorKind, detail: impl fmt::Display) -> Message {
    let detail = detail.to_string().replace(['\r', '\n'], " ");
    Message::Error {
        message: format!("{}: {}", kind.as_str(), detail),
    }
}

/// Split an `ERROR` text into its kind and detail
pub fn split_error(message: &str) -> (Option<ErrorKind>, &str) {
    match message.split_once(": ") {
        Some((kind, detail)) => match ErrorKind::from_str(kind) {
            Some(kind) => (Some(kind), detail),
            None => (None, message),
        },
        None => (None, message),
    }
}
