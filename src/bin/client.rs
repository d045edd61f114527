//! Line-mode table client.
//!
//! Usage: `skyjo-client <name>`. Connects to `SKYJO_HOST:SKYJO_PORT` and reads
//! commands from stdin:
//!
//! ```text
//! start | pick [discard] | discard | reveal N | exchange N | quit
//! ```

use anyhow::{bail, Result};
use tokio::io::{AsyncBufReadExt, BufReader};

use skyjo::adapter::DEFAULT_PORT;
use skyjo::client::{ClientIntent, Connection, Mirror, MirrorEvent};
use skyjo::engine::{CardView, GameSnapshot};
use skyjo::types::{DrawSource, GRID_ROWS};

const USAGE: &str = "start | pick [discard] | discard | reveal N | exchange N | quit";

enum Command {
    Intent(ClientIntent),
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    let mut words = line.split_whitespace();
    let verb = words.next()?.to_lowercase();
    let arg = words.next();
    let index = || arg.and_then(|s| s.parse::<usize>().ok());

    let cmd = match verb.as_str() {
        "start" => Command::Intent(ClientIntent::Start),
        "pick" | "draw" => {
            let source = match arg {
                Some(s) => DrawSource::from_str(s)?,
                None => DrawSource::Deck,
            };
            Command::Intent(ClientIntent::Pick(source))
        }
        "discard" => Command::Intent(ClientIntent::Discard),
        "reveal" => Command::Intent(ClientIntent::Reveal(index()?)),
        "exchange" | "swap" => Command::Intent(ClientIntent::Exchange(index()?)),
        "quit" | "exit" => Command::Quit,
        _ => return None,
    };
    Some(cmd)
}

fn card_label(card: &CardView) -> String {
    match (card.face_up, card.value) {
        (true, Some(v)) => format!("{v:>3}"),
        _ => "  ?".to_string(),
    }
}

fn render(snapshot: &GameSnapshot, mirror: &Mirror) {
    println!(
        "-- round {} ({:?}) draw pile {} discard {}{}",
        snapshot.round,
        snapshot.phase,
        snapshot.draw_count,
        snapshot
            .discard_top
            .as_ref()
            .map(card_label)
            .unwrap_or_else(|| " none".to_string()),
        if snapshot.final_round { " FINAL ROUND" } else { "" }
    );
    if let Some(pending) = snapshot.pending.as_ref() {
        println!("   drawn card:{}", card_label(pending));
    }
    for player in &snapshot.players {
        let me = mirror.me().map(|id| id.0) == Some(player.id);
        println!(
            "{} {} [{}] score {}",
            if me { "*" } else { " " },
            player.name,
            player.id,
            player.score
        );
        let cols = player.hand.len() / GRID_ROWS;
        if cols == 0 {
            continue;
        }
        for row in player.hand.chunks(cols) {
            let cells: Vec<String> = row.iter().map(card_label).collect();
            println!("    {}", cells.join(" "));
        }
    }
}

fn report(event: &MirrorEvent, mirror: &Mirror) {
    match event {
        MirrorEvent::Joined { player, name, me } => {
            if *me {
                println!("joined as player {player}");
            } else {
                println!("{name} is player {player}");
            }
        }
        MirrorEvent::Started => println!("round started"),
        MirrorEvent::State => {
            if let Some(snapshot) = mirror.snapshot() {
                render(snapshot, mirror);
            }
        }
        MirrorEvent::Turn { player, mine } => {
            if *mine {
                println!("your turn");
            } else {
                println!("player {player} to play");
            }
        }
        MirrorEvent::Ended(reason) => match reason {
            Some(reason) => println!("end: {}", reason.as_str()),
            None => println!("end"),
        },
        MirrorEvent::Left(name) => println!("{name} left"),
        MirrorEvent::Rejected { detail, .. } => println!("rejected: {detail}"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let Some(name) = std::env::args().nth(1) else {
        bail!("usage: skyjo-client <name>");
    };
    let host = std::env::var("SKYJO_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("SKYJO_PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT);

    let mut conn = Connection::connect((host.as_str(), port), &name).await?;
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            event = conn.next_event() => {
                match event? {
                    Some(event) => report(&event, conn.mirror()),
                    None => {
                        println!("server closed the connection");
                        return Ok(());
                    }
                }
            }
            line = stdin.next_line() => {
                let Some(line) = line? else {
                    return Ok(());
                };
                if line.trim().is_empty() {
                    continue;
                }
                match parse_command(&line) {
                    Some(Command::Intent(intent)) => conn.send(intent).await?,
                    Some(Command::Quit) => return Ok(()),
                    None => println!("commands: {USAGE}"),
                }
            }
        }
    }
}
