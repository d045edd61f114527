//! Session - roster, authorization, and broadcast ordering
//!
//! The session owns the [`Game`] and the list of connections. It is plain
//! synchronous code: every call returns the ordered lines to deliver, and the
//! server pushes them into per-connection outboxes while it still holds the
//! session lock. Mutation and broadcast are therefore one atomic step.

use crate::engine::{ErrorKind, Game, GameConfig, GameSnapshot, Outcome};
use crate::protocol::{create_error, parse_message, EndReason, Message, ProtocolError};
use crate::types::{Phase, PlayerId};

/// Connection id, assigned at accept time
pub type ConnId = u64;

/// One outbound line for one connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub to: ConnId,
    pub line: String,
}

#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    pub game: GameConfig,
    /// Blank other players' face-down values in each recipient's snapshot
    pub redact_hidden: bool,
}

#[derive(Debug, Clone)]
struct ClientSlot {
    conn: ConnId,
    player: Option<PlayerId>,
    name: Option<String>,
}

pub struct Session {
    game: Game,
    clients: Vec<ClientSlot>,
    next_player_id: u32,
    redact_hidden: bool,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            game: Game::new(config.game),
            clients: Vec::new(),
            next_player_id: 0,
            redact_hidden: config.redact_hidden,
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn connection_count(&self) -> usize {
        self.clients.len()
    }

    pub fn joined_count(&self) -> usize {
        self.clients.iter().filter(|c| c.player.is_some()).count()
    }

    pub fn player_of(&self, conn: ConnId) -> Option<PlayerId> {
        self.slot(conn).and_then(|c| c.player)
    }

    pub fn snapshot(&self) -> GameSnapshot {
        self.game.snapshot()
    }

    fn slot(&self, conn: ConnId) -> Option<&ClientSlot> {
        self.clients.iter().find(|c| c.conn == conn)
    }

    /// Register a freshly accepted connection. It receives nothing but its
    /// own errors until it joins.
    pub fn connect(&mut self, conn: ConnId) {
        if self.slot(conn).is_none() {
            self.clients.push(ClientSlot {
                conn,
                player: None,
                name: None,
            });
        }
    }

    /// Handle one line as read off the socket, without its line ending
    ///
    /// Bytes that are not UTF-8 are refused like any other malformed line.
    pub fn handle_raw(&mut self, conn: ConnId, raw: &[u8]) -> Vec<Delivery> {
        match std::str::from_utf8(raw) {
            Ok(line) => self.handle_line(conn, line),
            Err(_) => {
                let e = ProtocolError::InvalidUtf8;
                log::debug!("[session] conn {conn}: {e}");
                let mut out = Vec::new();
                reply(&mut out, conn, create_error(ErrorKind::ProtocolError, e));
                out
            }
        }
    }

    /// Handle one inbound line from `conn`
    pub fn handle_line(&mut self, conn: ConnId, line: &str) -> Vec<Delivery> {
        let mut out = Vec::new();
        let message = match parse_message(line) {
            Ok(m) => m,
            Err(e) => {
                log::debug!("[session] conn {conn}: {e}");
                reply(&mut out, conn, create_error(ErrorKind::ProtocolError, e));
                return out;
            }
        };

        let Some(slot) = self.slot(conn) else {
            log::warn!("[session] line from unknown conn {conn}");
            return out;
        };
        let assigned = slot.player;

        if let Message::Join { player, name } = message {
            if assigned.is_some() {
                reply(&mut out, conn, create_error(ErrorKind::ProtocolError, "already joined"));
            } else if player.is_some() {
                reply(
                    &mut out,
                    conn,
                    create_error(ErrorKind::ProtocolError, "JOIN must carry player id -1"),
                );
            } else {
                self.join(conn, name, &mut out);
            }
            return out;
        }

        if message.is_server_only() {
            reply(
                &mut out,
                conn,
                create_error(
                    ErrorKind::ProtocolError,
                    format_args!("{} is server-originated", message.kind()),
                ),
            );
            return out;
        }

        let Some(player) = assigned else {
            reply(&mut out, conn, create_error(ErrorKind::ProtocolError, "JOIN first"));
            return out;
        };
        if message.player() != Some(player) {
            reply(
                &mut out,
                conn,
                create_error(
                    ErrorKind::ProtocolError,
                    format_args!("player id does not match connection (you are {player})"),
                ),
            );
            return out;
        }
        let Some(intent) = message.intent() else {
            reply(
                &mut out,
                conn,
                create_error(ErrorKind::ProtocolError, "unexpected message"),
            );
            return out;
        };

        match self.game.apply(player, intent) {
            Ok(outcome) => {
                log::debug!(
                    "[session] player {player} {} -> {}",
                    intent.as_str(),
                    outcome.phase
                );
                self.publish(&outcome, &mut out);
            }
            Err(e) => {
                log::debug!("[session] player {player} {} rejected: {e}", intent.as_str());
                reply(&mut out, conn, create_error(e.kind(), e));
            }
        }
        out
    }

    /// Drop a connection and tell everyone else what changed
    pub fn disconnect(&mut self, conn: ConnId) -> Vec<Delivery> {
        let mut out = Vec::new();
        let Some(pos) = self.clients.iter().position(|c| c.conn == conn) else {
            return out;
        };
        let slot = self.clients.remove(pos);
        let (Some(player), Some(name)) = (slot.player, slot.name) else {
            return out;
        };

        let was_in_match = self.game.phase().is_in_match();
        let outcome = match self.game.remove_player(player) {
            Ok(outcome) => outcome,
            Err(e) => {
                log::warn!("[session] removing player {player}: {e}");
                return out;
            }
        };
        log::info!("[session] player {player} ({name}) left");

        self.broadcast(&mut out, &Message::Left { name });
        if was_in_match {
            self.publish(&outcome, &mut out);
        }
        out
    }

    fn join(&mut self, conn: ConnId, name: String, out: &mut Vec<Delivery>) {
        let id = PlayerId(self.next_player_id);
        let reopens = self.game.phase() == Phase::MatchOver;
        if let Err(e) = self.game.add_player(id, &name) {
            log::debug!("[session] conn {conn} join rejected: {e}");
            reply(out, conn, create_error(e.kind(), e));
            return;
        }
        self.next_player_id += 1;

        if let Some(slot) = self.clients.iter_mut().find(|c| c.conn == conn) {
            slot.player = Some(id);
            slot.name = Some(name.clone());
        }
        log::info!("[session] conn {conn} joined as player {id} ({name})");

        self.broadcast(
            out,
            &Message::Join {
                player: Some(id),
                name,
            },
        );
        for p in self.game.players().iter().filter(|p| p.id() != id) {
            reply(
                out,
                conn,
                Message::Join {
                    player: Some(p.id()),
                    name: p.name().to_string(),
                },
            );
        }
        if reopens {
            log::info!("[session] table reopened by player {id}");
            self.broadcast_state(out);
        }
    }

    /// START, then STATE, then END or the turn holder, derived from one outcome
    fn publish(&self, outcome: &Outcome, out: &mut Vec<Delivery>) {
        if outcome.started() {
            log::info!("[session] round {} started", self.game.round());
            self.broadcast(out, &Message::Start { player: None });
        }

        self.broadcast_state(out);

        if outcome.abandoned() {
            log::info!("[session] match ended: not enough players");
            self.broadcast(
                out,
                &Message::End {
                    reason: Some(EndReason::InsufficientPlayers),
                },
            );
        } else if let Some(result) = outcome.round_result() {
            let reason = if outcome.phase == Phase::MatchOver {
                EndReason::Match
            } else {
                EndReason::Round
            };
            log::info!(
                "[session] round {} over ({}), leader {:?}",
                result.round,
                reason.as_str(),
                result.leader()
            );
            self.broadcast(
                out,
                &Message::End {
                    reason: Some(reason),
                },
            );
        } else if let Some(player) = self.game.current_player() {
            self.broadcast(out, &Message::Turn { player });
        }
    }

    fn broadcast(&self, out: &mut Vec<Delivery>, message: &Message) {
        let line = message.to_string();
        for slot in self.clients.iter().filter(|c| c.player.is_some()) {
            out.push(Delivery {
                to: slot.conn,
                line: line.clone(),
            });
        }
    }

    fn broadcast_state(&self, out: &mut Vec<Delivery>) {
        let snapshot = self.game.snapshot();
        if !self.redact_hidden {
            self.broadcast(out, &Message::state(snapshot));
            return;
        }
        for slot in &self.clients {
            if let Some(player) = slot.player {
                let view = snapshot.redacted_for(Some(player.0));
                out.push(Delivery {
                    to: slot.conn,
                    line: Message::state(view).to_string(),
                });
            }
        }
    }
}

fn reply(out: &mut Vec<Delivery>, conn: ConnId, message: Message) {
    out.push(Delivery {
        to: conn,
        line: message.to_string(),
    });
}
