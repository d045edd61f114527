//! Adapter module - multiplayer table over TCP with a `|`-delimited line protocol
//!
//! This crate puts the rule engine on the network. Clients connect, join a
//! single table, and send intents; the server answers with broadcasts that
//! keep every client's view in step.
//!
//! # Protocol Overview
//!
//! One message per line, fields separated by `|`:
//!
//! 1. **Connection**: Client connects to the TCP socket (default: 127.0.0.1:7878)
//! 2. **Join**: Client sends `JOIN|-1|<name>`, everyone gets `JOIN|<id>|<name>`
//! 3. **Start**: Any joined client sends `START|<id>`
//! 4. **Play**: The player named by `TURN` sends `PICK`, then `EXCHANGE` or
//!    `DISCARD` + `REVEAL`
//! 5. **State**: Every accepted intent is followed by a full `STATE` snapshot,
//!    then `TURN` while a player holds the turn
//!
//! # Message Types
//!
//! ## Client → Server
//!
//! - **JOIN**: `JOIN|-1|<name>`
//! - **START**: `START|<id>` starts the match or the next round
//! - **PICK**: `PICK|<id>[|deck|discard]`
//! - **DISCARD**: `DISCARD|<id>`
//! - **REVEAL**: `REVEAL|<id>|<index>`
//! - **EXCHANGE**: `EXCHANGE|<id>|<index>`
//!
//! ## Server → Client
//!
//! - **JOIN**, **START|-1**, **TURN|<id>**, **STATE|-1|<json>**
//! - **END|-1|round|match|insufficient_players**
//! - **LEFT|-1|<name>**
//! - **ERROR|-1|<kind>: <detail>**
//!
//! # Environment Variables
//!
//! - `SKYJO_HOST`: Bind address (default: "127.0.0.1")
//! - `SKYJO_PORT`: Port number (default: 7878)
//! - `SKYJO_SEED`: Deck seed for reproducible matches
//! - `SKYJO_LOG_PATH`: Append every wire line to this file
//! - `SKYJO_REDACT_HIDDEN`: "1" or "true" hides opponents' face-down values
//! - `SKYJO_INITIATIVE_EACH_ROUND`: "1" or "true" re-runs the opening reveal every round
//! - `SKYJO_MAX_PLAYERS`: Seats at the table, 2 to 8 (default: 8)
//!
//! # Example Protocol Flow
//!
//! ```text
//! Client A -> Server: JOIN|-1|ada
//! Server -> A:        JOIN|0|ada
//! Client B -> Server: JOIN|-1|bob
//! Server -> A, B:     JOIN|1|bob
//! Server -> B:        JOIN|0|ada
//! Client A -> Server: START|0
//! Server -> A, B:     START|-1
//! Server -> A, B:     STATE|-1|{"round":1,"phase":"initial_reveal",...}
//! ```
//!
//! # Implementation
//!
//! - See [`protocol`] for parsing and formatting
//! - See [`session`] for authorization and broadcast ordering
//! - See [`server`] for the tokio accept loop and connection tasks
//!
//! # Testing
//!
//! ```bash
//! nc 127.0.0.1 7878
//! JOIN|-1|me
//! ```

pub mod protocol;
pub mod server;
pub mod session;

pub use skyjo_engine as engine;
pub use skyjo_types as types;

// Re-export protocol types for convenience
pub use protocol::*;
pub use server::{run_server, ServerConfig, DEFAULT_PORT};
pub use session::{ConnId, Delivery, Session, SessionConfig};
