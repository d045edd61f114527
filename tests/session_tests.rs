//! Session tests - the table as seen through delivered lines

use skyjo::adapter::{parse_message, ConnId, Delivery, Message, Session, SessionConfig};
use skyjo::engine::GameConfig;
use skyjo::types::{Phase, PlayerId};

fn table(names: &[&str], seed: u64) -> Session {
    let mut session = Session::new(SessionConfig {
        game: GameConfig {
            seed: Some(seed),
            ..GameConfig::default()
        },
        redact_hidden: false,
    });
    for (conn, name) in names.iter().enumerate() {
        session.connect(conn as ConnId);
        session.handle_line(conn as ConnId, &format!("JOIN|-1|{name}"));
    }
    session
}

fn lines_for(out: &[Delivery], conn: ConnId) -> Vec<&str> {
    out.iter()
        .filter(|d| d.to == conn)
        .map(|d| d.line.as_str())
        .collect()
}

fn turn_in(out: &[Delivery]) -> Option<PlayerId> {
    out.iter().find_map(|d| match parse_message(&d.line) {
        Ok(Message::Turn { player }) => Some(player),
        _ => None,
    })
}

/// Start and finish the initial reveal; returns the player holding the turn
fn start_and_reveal(session: &mut Session, players: u64) -> PlayerId {
    session.handle_line(0, "START|0");
    let mut turn = None;
    for conn in 0..players {
        session.handle_line(conn, &format!("REVEAL|{conn}|0"));
        let out = session.handle_line(conn, &format!("REVEAL|{conn}|1"));
        turn = turn.or(turn_in(&out));
    }
    turn.expect("initiative should hand out the first turn")
}

#[test]
fn test_connection_and_join_counts() {
    let mut session = table(&["ada", "bob"], 1);
    session.connect(9);
    assert_eq!(session.connection_count(), 3);
    assert_eq!(session.joined_count(), 2);
    assert_eq!(session.player_of(9), None);
    assert_eq!(session.player_of(1), Some(PlayerId(1)));
}

#[test]
fn test_players_ids_are_never_reused() {
    let mut session = table(&["ada", "bob"], 1);
    session.disconnect(1);
    session.connect(2);
    let out = session.handle_line(2, "JOIN|-1|cy");
    assert_eq!(lines_for(&out, 2)[0], "JOIN|2|cy");
}

#[test]
fn test_turn_moves_after_reveal_turn() {
    let mut session = table(&["ada", "bob"], 4);
    let first = start_and_reveal(&mut session, 2);
    let conn = first.0 as ConnId;

    let out = session.handle_line(conn, &format!("PICK|{first}"));
    for c in [0, 1] {
        let lines = lines_for(&out, c);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("STATE|-1|"));
        assert_eq!(lines[1], format!("TURN|{first}"));
    }

    let out = session.handle_line(conn, &format!("DISCARD|{first}"));
    assert_eq!(turn_in(&out), Some(first));
    assert_eq!(session.game().phase(), Phase::AwaitingReveal);

    let out = session.handle_line(conn, &format!("REVEAL|{first}|2"));
    let next = turn_in(&out).unwrap();
    assert_ne!(next, first);
    for c in [0, 1] {
        let lines = lines_for(&out, c);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("STATE|-1|"));
        assert_eq!(lines[1], format!("TURN|{next}"));
    }
}

#[test]
fn test_out_of_turn_play_reaches_only_the_sender() {
    let mut session = table(&["ada", "bob"], 4);
    let first = start_and_reveal(&mut session, 2);
    let other = if first == PlayerId(0) { 1 } else { 0 };

    let out = session.handle_line(other, &format!("PICK|{other}"));
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].to, other);
    assert!(out[0].line.starts_with("ERROR|-1|turn_violation"));
    assert_eq!(session.game().phase(), Phase::AwaitingDraw);
}

#[test]
fn test_play_continues_after_one_of_three_leaves() {
    let mut session = table(&["ada", "bob", "cy"], 21);
    let first = start_and_reveal(&mut session, 3);
    let conn = first.0 as ConnId;
    session.handle_line(conn, &format!("PICK|{first}"));

    let out = session.disconnect(conn);
    let stayed: Vec<ConnId> = (0..3).filter(|&c| c != conn).collect();
    for &c in &stayed {
        let lines = lines_for(&out, c);
        let name = ["ada", "bob", "cy"][conn as usize];
        assert_eq!(lines[0], format!("LEFT|-1|{name}"));
        assert!(lines[1].starts_with("STATE|-1|"));
        assert!(lines[2].starts_with("TURN|"));
    }
    assert!(lines_for(&out, conn).is_empty());

    let next = turn_in(&out).unwrap();
    assert_ne!(next, first);
    assert_eq!(session.game().players().len(), 2);
    assert_eq!(session.game().phase(), Phase::AwaitingDraw);

    let out = session.handle_line(next.0 as ConnId, &format!("PICK|{next}"));
    for &c in &stayed {
        let lines = lines_for(&out, c);
        assert!(lines[0].starts_with("STATE|-1|"));
        assert_eq!(lines[1], format!("TURN|{next}"));
    }

    let last = stayed.into_iter().find(|&c| c != next.0 as ConnId).unwrap();
    let out = session.disconnect(last);
    let lines = lines_for(&out, next.0 as ConnId);
    assert!(lines[0].starts_with("LEFT|-1|"));
    assert_eq!(lines.last(), Some(&"END|-1|insufficient_players"));
    assert_eq!(session.game().phase(), Phase::MatchOver);

    let out = session.handle_line(next.0 as ConnId, &format!("EXCHANGE|{next}|0"));
    assert_eq!(out.len(), 1);
    assert!(out[0].line.starts_with("ERROR|-1|turn_violation"));
}
