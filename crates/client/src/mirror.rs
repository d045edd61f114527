//! Client-side mirror of the table
//!
//! Folds server lines into the latest known state. Holds no socket and does
//! no I/O, so it can be driven from tests line by line.

use thiserror::Error;

use crate::adapter::{split_error, EndReason, Message};
use crate::engine::{ErrorKind, GameSnapshot};
use crate::types::{DrawSource, PlayerId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientIntent {
    Start,
    Pick(DrawSource),
    Discard,
    Reveal(usize),
    Exchange(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MirrorError {
    #[error("not joined yet")]
    NotJoined,
}

/// What a folded server line changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MirrorEvent {
    Joined {
        player: PlayerId,
        name: String,
        me: bool,
    },
    Started,
    State,
    Turn { player: PlayerId, mine: bool },
    Ended(Option<EndReason>),
    Left(String),
    Rejected {
        kind: Option<ErrorKind>,
        detail: String,
    },
}

#[derive(Debug, Clone, Default)]
pub struct Mirror {
    me: Option<PlayerId>,
    roster: Vec<(PlayerId, String)>,
    snapshot: Option<GameSnapshot>,
    turn: Option<PlayerId>,
    started: bool,
    ended: Option<EndReason>,
    last_error: Option<String>,
}

impl Mirror {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id the server assigned to this client
    pub fn me(&self) -> Option<PlayerId> {
        self.me
    }

    pub fn roster(&self) -> &[(PlayerId, String)] {
        &self.roster
    }

    pub fn snapshot(&self) -> Option<&GameSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn turn(&self) -> Option<PlayerId> {
        self.turn
    }

    pub fn is_my_turn(&self) -> bool {
        self.me.is_some() && self.turn == self.me
    }

    pub fn started(&self) -> bool {
        self.started
    }

    /// Last `END` reason since the latest `START`
    pub fn ended(&self) -> Option<EndReason> {
        self.ended
    }

    pub fn match_over(&self) -> bool {
        matches!(
            self.ended,
            Some(EndReason::Match | EndReason::InsufficientPlayers)
        )
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn apply(&mut self, message: &Message) -> Option<MirrorEvent> {
        match message {
            Message::Join {
                player: Some(player),
                name,
            } => {
                let me = self.me.is_none();
                if me {
                    self.me = Some(*player);
                }
                if !self.roster.iter().any(|(id, _)| id == player) {
                    self.roster.push((*player, name.clone()));
                }
                Some(MirrorEvent::Joined {
                    player: *player,
                    name: name.clone(),
                    me,
                })
            }
            Message::Start { .. } => {
                self.started = true;
                self.ended = None;
                Some(MirrorEvent::Started)
            }
            Message::State { snapshot } => {
                self.turn = snapshot.current_player.map(PlayerId);
                self.snapshot = Some((**snapshot).clone());
                Some(MirrorEvent::State)
            }
            Message::Turn { player } => {
                self.turn = Some(*player);
                Some(MirrorEvent::Turn {
                    player: *player,
                    mine: self.me == Some(*player),
                })
            }
            Message::End { reason } => {
                self.turn = None;
                self.ended = *reason;
                Some(MirrorEvent::Ended(*reason))
            }
            Message::Left { name } => {
                self.roster.retain(|(_, n)| n != name);
                Some(MirrorEvent::Left(name.clone()))
            }
            Message::Error { message } => {
                self.last_error = Some(message.clone());
                let (kind, detail) = split_error(message);
                Some(MirrorEvent::Rejected {
                    kind,
                    detail: detail.to_string(),
                })
            }
            _ => None,
        }
    }

    /// Stamp this client's id onto an outbound intent
    pub fn intent_message(&self, intent: ClientIntent) -> Result<Message, MirrorError> {
        let player = self.me.ok_or(MirrorError::NotJoined)?;
        Ok(match intent {
            ClientIntent::Start => Message::Start {
                player: Some(player),
            },
            ClientIntent::Pick(source) => Message::Pick { player, source },
            ClientIntent::Discard => Message::Discard { player },
            ClientIntent::Reveal(index) => Message::Reveal { player, index },
            ClientIntent::Exchange(index) => Message::Exchange { player, index },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::parse_message;

    fn feed(mirror: &mut Mirror, line: &str) -> Option<MirrorEvent> {
        mirror.apply(&parse_message(line).unwrap())
    }

    #[test]
    fn first_join_is_own_id() {
        let mut m = Mirror::new();
        assert_eq!(
            m.intent_message(ClientIntent::Start),
            Err(MirrorError::NotJoined)
        );

        feed(&mut m, "JOIN|2|cy");
        feed(&mut m, "JOIN|0|ada");
        assert_eq!(m.me(), Some(PlayerId(2)));
        assert_eq!(m.roster().len(), 2);
        assert_eq!(
            m.intent_message(ClientIntent::Exchange(4)).unwrap().to_string(),
            "EXCHANGE|2|4"
        );
    }

    #[test]
    fn turn_and_end_tracking() {
        let mut m = Mirror::new();
        feed(&mut m, "JOIN|1|bob");
        assert_eq!(
            feed(&mut m, "TURN|1"),
            Some(MirrorEvent::Turn {
                player: PlayerId(1),
                mine: true
            })
        );
        assert!(m.is_my_turn());

        feed(&mut m, "END|-1|insufficient_players");
        assert!(!m.is_my_turn());
        assert!(m.match_over());
    }

    #[test]
    fn errors_are_classified() {
        let mut m = Mirror::new();
        let event = feed(&mut m, "ERROR|-1|turn_violation: not your turn");
        assert_eq!(
            event,
            Some(MirrorEvent::Rejected {
                kind: Some(ErrorKind::TurnViolation),
                detail: "not your turn".into()
            })
        );
        assert_eq!(m.last_error(), Some("turn_violation: not your turn"));
    }

    #[test]
    fn left_players_drop_from_roster() {
        let mut m = Mirror::new();
        feed(&mut m, "JOIN|0|ada");
        feed(&mut m, "JOIN|1|bob");
        feed(&mut m, "LEFT|-1|bob");
        assert_eq!(m.roster(), &[(PlayerId(0), "ada".to_string())]);
    }
}
