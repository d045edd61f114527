//! Async TCP client that keeps a [`Mirror`] current

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpStream, ToSocketAddrs};

use crate::adapter::{parse_message, validate_name, Message};
use crate::mirror::{ClientIntent, Mirror, MirrorEvent};

pub struct Connection {
    lines: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
    mirror: Mirror,
}

impl Connection {
    /// Connect and send `JOIN|-1|<name>`
    pub async fn connect(addr: impl ToSocketAddrs, name: &str) -> anyhow::Result<Self> {
        let name = validate_name(name)?;
        let stream = TcpStream::connect(addr).await.context("connecting")?;
        let (reader, writer) = stream.into_split();
        let mut conn = Self {
            lines: BufReader::new(reader).lines(),
            writer,
            mirror: Mirror::new(),
        };
        conn.send_message(&Message::Join { player: None, name }).await?;
        Ok(conn)
    }

    pub fn mirror(&self) -> &Mirror {
        &self.mirror
    }

    pub async fn send(&mut self, intent: ClientIntent) -> anyhow::Result<()> {
        let message = self.mirror.intent_message(intent)?;
        self.send_message(&message).await
    }

    pub async fn send_message(&mut self, message: &Message) -> anyhow::Result<()> {
        let line = format!("{message}\n");
        log::debug!("[client] -> {}", line.trim_end());
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Read until a line changes the mirror. `None` once the server closes.
    pub async fn next_event(&mut self) -> anyhow::Result<Option<MirrorEvent>> {
        while let Some(line) = self.lines.next_line().await.context("reading line")? {
            log::debug!("[client] <- {line}");
            let message = match parse_message(&line) {
                Ok(m) => m,
                Err(e) => {
                    log::warn!("[client] unreadable line from server: {e}");
                    continue;
                }
            };
            if let Some(event) = self.mirror.apply(&message) {
                return Ok(Some(event));
            }
        }
        Ok(None)
    }
}
