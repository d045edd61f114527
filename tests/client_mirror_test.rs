use std::net::SocketAddr;
use std::time::Duration;

use tokio::sync::oneshot;

use skyjo::adapter::{run_server, EndReason, ServerConfig};
use skyjo::client::{ClientIntent, Connection, MirrorEvent};
use skyjo::engine::{ErrorKind, PhaseLower};
use skyjo::types::{DrawSource, PlayerId};

async fn next(conn: &mut Connection) -> MirrorEvent {
    tokio::time::timeout(Duration::from_secs(2), conn.next_event())
        .await
        .expect("timed out waiting for an event")
        .unwrap()
        .expect("server closed the connection")
}

/// Skip STATE updates until something else arrives
async fn next_non_state(conn: &mut Connection) -> MirrorEvent {
    loop {
        let event = next(conn).await;
        if event != MirrorEvent::State {
            return event;
        }
    }
}

#[tokio::test]
async fn client_mirrors_follow_a_round() {
    let config = ServerConfig {
        port: 0,
        seed: Some(5),
        ..ServerConfig::default()
    };
    let (ready_tx, ready_rx) = oneshot::channel::<SocketAddr>();
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let server = tokio::spawn(async move {
        let _ = run_server(config, Some(ready_tx), shutdown_rx).await;
    });
    let addr = tokio::time::timeout(Duration::from_secs(2), ready_rx)
        .await
        .expect("server did not signal ready")
        .expect("ready channel dropped");

    let mut ada = Connection::connect(addr, "ada").await.unwrap();
    assert_eq!(
        next(&mut ada).await,
        MirrorEvent::Joined {
            player: PlayerId(0),
            name: "ada".to_string(),
            me: true
        }
    );

    let mut bob = Connection::connect(addr, "bob").await.unwrap();
    assert!(matches!(
        next(&mut bob).await,
        MirrorEvent::Joined { me: true, .. }
    ));
    assert!(matches!(
        next(&mut bob).await,
        MirrorEvent::Joined { me: false, .. }
    ));
    assert!(matches!(
        next(&mut ada).await,
        MirrorEvent::Joined { me: false, .. }
    ));
    assert_eq!(ada.mirror().roster().len(), 2);
    assert_eq!(bob.mirror().me(), Some(PlayerId(1)));

    ada.send(ClientIntent::Start).await.unwrap();
    for conn in [&mut ada, &mut bob] {
        assert_eq!(next(conn).await, MirrorEvent::Started);
        assert_eq!(next(conn).await, MirrorEvent::State);
        let snapshot = conn.mirror().snapshot().unwrap();
        assert_eq!(snapshot.phase, PhaseLower::InitialReveal);
        assert_eq!(conn.mirror().turn(), None);
    }

    for index in [0, 1] {
        ada.send(ClientIntent::Reveal(index)).await.unwrap();
        bob.send(ClientIntent::Reveal(index)).await.unwrap();
    }
    let (ada_turn, bob_turn) = (next_non_state(&mut ada).await, next_non_state(&mut bob).await);
    let MirrorEvent::Turn { player, mine } = ada_turn else {
        panic!("expected a turn, got {ada_turn:?}");
    };
    assert_eq!(mine, player == PlayerId(0));
    assert_eq!(
        bob_turn,
        MirrorEvent::Turn {
            player,
            mine: player == PlayerId(1)
        }
    );

    let (mover, waiter) = if player == PlayerId(0) {
        (&mut ada, &mut bob)
    } else {
        (&mut bob, &mut ada)
    };
    assert!(mover.mirror().is_my_turn());
    assert!(!waiter.mirror().is_my_turn());

    waiter.send(ClientIntent::Discard).await.unwrap();
    let MirrorEvent::Rejected { kind, .. } = next(waiter).await else {
        panic!("expected a rejection");
    };
    assert_eq!(kind, Some(ErrorKind::TurnViolation));
    assert!(waiter.mirror().last_error().is_some());

    mover.send(ClientIntent::Pick(DrawSource::Discard)).await.unwrap();
    assert_eq!(next(mover).await, MirrorEvent::State);
    let snapshot = mover.mirror().snapshot().unwrap();
    assert_eq!(snapshot.phase, PhaseLower::AwaitingDecision);
    assert!(snapshot.pending.is_some());
    assert!(snapshot.discard_top.is_none());
    assert_eq!(next(mover).await, MirrorEvent::Turn { player, mine: true });

    mover.send(ClientIntent::Exchange(4)).await.unwrap();
    assert_eq!(next(mover).await, MirrorEvent::State);
    assert!(matches!(
        next(mover).await,
        MirrorEvent::Turn { mine: false, .. }
    ));
    assert!(!mover.mirror().is_my_turn());

    drop(bob);
    loop {
        if next(&mut ada).await == MirrorEvent::Left("bob".to_string()) {
            break;
        }
    }
    assert_eq!(
        next_non_state(&mut ada).await,
        MirrorEvent::Ended(Some(EndReason::InsufficientPlayers))
    );
    assert!(ada.mirror().match_over());
    assert_eq!(ada.mirror().roster().len(), 1);

    let _ = shutdown_tx.send(());
    tokio::time::timeout(Duration::from_secs(2), server)
        .await
        .expect("server did not stop")
        .unwrap();
}
