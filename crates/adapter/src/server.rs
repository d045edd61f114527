//! TCP server
//!
//! Accepts connections and gives each one a reader task and a writer task.
//! Readers funnel every line into the shared [`Session`] under one mutex;
//! the deliveries it returns are pushed into the per-connection outboxes
//! before the lock is released, so every client observes broadcasts in
//! mutation order. The lock is never held across a socket read or write.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::OwnedReadHalf;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot, Mutex};
use tokio::task::JoinSet;

use crate::engine::GameConfig;
use crate::session::{ConnId, Delivery, Session, SessionConfig};
use crate::types::{MAX_PLAYERS, MIN_PLAYERS};

pub const DEFAULT_PORT: u16 = 7878;

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Master deck seed; random when unset
    pub seed: Option<u64>,
    /// Append every wire line to this file
    pub log_path: Option<String>,
    pub redact_hidden: bool,
    pub initiative_each_round: bool,
    pub max_players: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            seed: None,
            log_path: None,
            redact_hidden: false,
            initiative_each_round: false,
            max_players: MAX_PLAYERS,
        }
    }
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

impl ServerConfig {
    /// Create from `SKYJO_*` environment variables
    pub fn from_env() -> Self {
        use std::env;

        let host = env::var("SKYJO_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("SKYJO_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let seed = env::var("SKYJO_SEED").ok().and_then(|s| s.trim().parse().ok());

        let log_path = env::var("SKYJO_LOG_PATH")
            .ok()
            .map(|s| s.trim().to_string())
            .and_then(|s| if s.is_empty() { None } else { Some(s) });

        let max_players = env::var("SKYJO_MAX_PLAYERS")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(MAX_PLAYERS)
            .clamp(MIN_PLAYERS, MAX_PLAYERS);

        Self {
            host,
            port,
            seed,
            log_path,
            redact_hidden: env_flag("SKYJO_REDACT_HIDDEN"),
            initiative_each_round: env_flag("SKYJO_INITIATIVE_EACH_ROUND"),
            max_players,
        }
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid socket address {}:{}", self.host, self.port))
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            game: GameConfig {
                seed: self.seed,
                initiative_each_round: self.initiative_each_round,
                max_players: self.max_players,
                ..GameConfig::default()
            },
            redact_hidden: self.redact_hidden,
        }
    }
}

/// Session plus the outbox of every live connection
struct Hub {
    session: Session,
    outboxes: HashMap<ConnId, mpsc::UnboundedSender<String>>,
}

impl Hub {
    fn dispatch(&self, deliveries: Vec<Delivery>) {
        for delivery in deliveries {
            if let Some(tx) = self.outboxes.get(&delivery.to) {
                let _ = tx.send(delivery.line);
            }
        }
    }
}

#[derive(Debug, Clone)]
enum WireRecord {
    Inbound(ConnId, String),
    Outbound(ConnId, String),
}

fn spawn_wire_log(path: String) -> mpsc::UnboundedSender<WireRecord> {
    let (tx, mut rx) = mpsc::unbounded_channel::<WireRecord>();
    tokio::spawn(async move {
        use tokio::fs::OpenOptions;

        let mut file = match OpenOptions::new().create(true).append(true).open(&path).await {
            Ok(f) => f,
            Err(e) => {
                log::warn!("[server] cannot open wire log {path}: {e}");
                return;
            }
        };

        while let Some(rec) = rx.recv().await {
            let entry = match rec {
                WireRecord::Inbound(conn, line) => format!("< {conn} {line}\n"),
                WireRecord::Outbound(conn, line) => format!("> {conn} {line}\n"),
            };
            if file.write_all(entry.as_bytes()).await.is_err() {
                break;
            }
        }

        let _ = file.flush().await;
    });
    tx
}

/// Run the server until `shutdown` fires (or its sender is dropped)
///
/// `ready_tx` receives the bound address, which is how tests find a server
/// started on port 0.
pub async fn run_server(
    config: ServerConfig,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
    mut shutdown: oneshot::Receiver<()>,
) -> anyhow::Result<()> {
    let wire_log_tx = config.log_path.clone().map(spawn_wire_log);

    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    let bound = listener.local_addr()?;
    log::info!("[server] listening on {bound}");
    if let Some(tx) = ready_tx {
        let _ = tx.send(bound);
    }

    let hub = Arc::new(Mutex::new(Hub {
        session: Session::new(config.session_config()),
        outboxes: HashMap::new(),
    }));
    let mut tasks = JoinSet::new();
    let mut next_conn: ConnId = 0;

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (socket, peer) = match accepted {
                    Ok(pair) => pair,
                    Err(e) => {
                        log::warn!("[server] accept failed: {e}");
                        continue;
                    }
                };
                let conn = next_conn;
                next_conn += 1;
                log::info!("[server] conn {conn} connected from {peer}");

                let hub = Arc::clone(&hub);
                let wire_log_tx = wire_log_tx.clone();
                tasks.spawn(async move {
                    if let Err(e) = handle_client(socket, conn, hub, wire_log_tx).await {
                        log::warn!("[server] conn {conn} error: {e:#}");
                    }
                    log::info!("[server] conn {conn} disconnected");
                });
            }
            Some(_) = tasks.join_next(), if !tasks.is_empty() => {}
            _ = &mut shutdown => {
                log::info!("[server] shutting down");
                break;
            }
        }
    }

    tasks.shutdown().await;
    Ok(())
}

/// Serve one connection until it closes or sends something unreadable
async fn handle_client(
    socket: TcpStream,
    conn: ConnId,
    hub: Arc<Mutex<Hub>>,
    wire_log_tx: Option<mpsc::UnboundedSender<WireRecord>>,
) -> anyhow::Result<()> {
    let (reader, mut writer) = socket.into_split();
    let mut reader = BufReader::new(reader);

    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    {
        let mut guard = hub.lock().await;
        guard.outboxes.insert(conn, tx);
        guard.session.connect(conn);
    }

    let wire_log_tx_out = wire_log_tx.clone();
    let write_task = tokio::spawn(async move {
        while let Some(line) = rx.recv().await {
            if writer.write_all(line.as_bytes()).await.is_err() {
                break;
            }
            if writer.write_all(b"\n").await.is_err() {
                break;
            }
            if writer.flush().await.is_err() {
                break;
            }
            if let Some(tx) = wire_log_tx_out.as_ref() {
                let _ = tx.send(WireRecord::Outbound(conn, line));
            }
        }
    });

    let result = read_loop(&mut reader, conn, &hub, wire_log_tx.as_ref()).await;

    {
        let mut guard = hub.lock().await;
        guard.outboxes.remove(&conn);
        let deliveries = guard.session.disconnect(conn);
        guard.dispatch(deliveries);
    }

    let _ = write_task.await;
    result
}

async fn read_loop(
    reader: &mut BufReader<OwnedReadHalf>,
    conn: ConnId,
    hub: &Mutex<Hub>,
    wire_log_tx: Option<&mpsc::UnboundedSender<WireRecord>>,
) -> anyhow::Result<()> {
    let mut buf = Vec::with_capacity(256);
    loop {
        buf.clear();
        let n = reader
            .read_until(b'\n', &mut buf)
            .await
            .context("reading line")?;
        if n == 0 {
            return Ok(());
        }

        let raw = strip_line_end(&buf);
        if raw.iter().all(u8::is_ascii_whitespace) {
            continue;
        }
        let shown = String::from_utf8_lossy(raw);
        log::debug!("[server] conn {conn} <- {shown}");
        if let Some(tx) = wire_log_tx {
            let _ = tx.send(WireRecord::Inbound(conn, shown.into_owned()));
        }

        let mut guard = hub.lock().await;
        let deliveries = guard.session.handle_raw(conn, raw);
        guard.dispatch(deliveries);
    }
}

fn strip_line_end(buf: &[u8]) -> &[u8] {
    let buf = buf.strip_suffix(b"\n").unwrap_or(buf);
    buf.strip_suffix(b"\r").unwrap_or(buf)
}
