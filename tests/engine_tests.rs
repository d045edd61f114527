use skyjo::core::composition;
use skyjo::engine::{ErrorKind, Game, GameConfig, GameError, GameEvent};
use skyjo::types::{DrawSource, Intent, Phase, PlayerId, HAND_SIZE};

fn sorted(mut values: Vec<i8>) -> Vec<i8> {
    values.sort_unstable();
    values
}

fn assert_conserved(game: &Game) {
    assert_eq!(sorted(game.card_values()), sorted(composition()));
}

fn new_game(seed: u64, players: u32) -> Game {
    let mut game = Game::new(GameConfig {
        seed: Some(seed),
        ..GameConfig::default()
    });
    for id in 0..players {
        game.add_player(PlayerId(id), &format!("player-{id}")).unwrap();
    }
    game
}

fn reveal_first_two(game: &mut Game, players: u32) {
    for id in 0..players {
        game.apply(PlayerId(id), Intent::Reveal(0)).unwrap();
        game.apply(PlayerId(id), Intent::Reveal(1)).unwrap();
    }
}

/// Draw from the deck, throw it away, and reveal the first face-down slot
fn play_reveal_turn(game: &mut Game) {
    let who = game.current_player().unwrap();
    game.apply(who, Intent::Draw(DrawSource::Deck)).unwrap();
    assert_conserved(game);

    let hand = game.player(who).unwrap().hand();
    match hand.cards().iter().position(|c| !c.is_face_up()) {
        Some(index) => {
            game.apply(who, Intent::Discard).unwrap();
            game.apply(who, Intent::Reveal(index)).unwrap();
        }
        None => {
            game.apply(who, Intent::Exchange(0)).unwrap();
        }
    }
    assert_conserved(game);
}

#[test]
fn two_player_exchange_scenario() {
    let mut game = new_game(2024, 2);
    game.apply(PlayerId(0), Intent::Start).unwrap();
    reveal_first_two(&mut game, 2);

    let mut exchanges = 0;
    for turn in 0..6 {
        let who = game.current_player().unwrap();
        game.apply(who, Intent::Draw(DrawSource::Deck)).unwrap();
        let outcome = game.apply(who, Intent::Exchange(4 + turn / 2)).unwrap();
        exchanges += 1;

        assert!(!outcome
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::ColumnsCleared { .. })));
        assert_conserved(&game);
    }

    assert_eq!(game.deck().discard_len(), exchanges + 1);
    for player in game.players() {
        assert_eq!(player.hand().len(), HAND_SIZE);
    }
    assert!(!game.is_final_round());
}

#[test]
fn exchange_without_pick_leaves_state_unchanged() {
    let mut game = new_game(1, 2);
    game.apply(PlayerId(0), Intent::Start).unwrap();
    reveal_first_two(&mut game, 2);

    let who = game.current_player().unwrap();
    let before = game.snapshot();
    let err = game.apply(who, Intent::Exchange(0)).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::TurnViolation);
    assert_eq!(game.snapshot(), before);
}

#[test]
fn bad_index_leaves_state_unchanged() {
    let mut game = new_game(8, 2);
    game.apply(PlayerId(0), Intent::Start).unwrap();
    reveal_first_two(&mut game, 2);

    let who = game.current_player().unwrap();
    game.apply(who, Intent::Draw(DrawSource::Deck)).unwrap();
    let before = game.snapshot();

    let err = game.apply(who, Intent::Exchange(HAND_SIZE)).unwrap_err();
    assert!(matches!(err, GameError::InvalidIndex { .. }));
    assert_eq!(game.snapshot(), before);
}

#[test]
fn full_match_conserves_cards_and_scores_the_ender() {
    for seed in [3u64, 17, 99] {
        let mut game = new_game(seed, 3);
        let mut rounds = 0;

        while game.phase() != Phase::MatchOver {
            rounds += 1;
            assert!(rounds <= 60, "match did not end");

            let outcome = game.apply(PlayerId(0), Intent::Start).unwrap();
            if outcome.phase == Phase::InitialReveal {
                assert_eq!(rounds, 1);
                reveal_first_two(&mut game, 3);
            }
            assert_conserved(&game);

            let mut turns = 0;
            while game.phase().is_turn_phase() {
                turns += 1;
                assert!(turns <= 200, "round did not end");
                play_reveal_turn(&mut game);
            }

            let result = game.last_result().unwrap();
            assert_eq!(result.round, game.round());
            let ender = result.ender.unwrap();
            let sums: Vec<i32> = result.scores.iter().map(|s| s.hand_sum).collect();
            let min = *sums.iter().min().unwrap();
            let line = result.score_of(ender).unwrap();
            if line.hand_sum > min {
                assert!(line.penalized);
                assert_eq!(line.round_points, line.hand_sum * 2);
            } else {
                assert!(!line.penalized);
                assert_eq!(line.round_points, line.hand_sum);
            }
            assert!(game.players().iter().all(|p| p.hand().all_face_up()));
        }

        assert!(game.players().iter().any(|p| p.score() >= 100));
        assert!(game.apply(PlayerId(0), Intent::Start).is_err());
    }
}

#[test]
fn final_round_lasts_one_turn_per_other_player() {
    let mut game = new_game(55, 3);
    game.apply(PlayerId(0), Intent::Start).unwrap();
    reveal_first_two(&mut game, 3);

    while !game.is_final_round() {
        play_reveal_turn(&mut game);
        assert!(game.phase().is_turn_phase() || game.is_final_round());
    }

    let ender = game.round_ender().unwrap();
    let mut final_turns = 0;
    while game.phase().is_turn_phase() {
        assert_ne!(game.current_player(), Some(ender));
        play_reveal_turn(&mut game);
        final_turns += 1;
    }
    assert_eq!(final_turns, 2);
}

#[test]
fn leaving_mid_turn_hands_turn_on() {
    let mut game = new_game(12, 3);
    game.apply(PlayerId(0), Intent::Start).unwrap();
    reveal_first_two(&mut game, 3);

    let who = game.current_player().unwrap();
    game.apply(who, Intent::Draw(DrawSource::Deck)).unwrap();
    let outcome = game.remove_player(who).unwrap();

    assert!(outcome
        .events
        .iter()
        .any(|e| matches!(e, GameEvent::TurnChanged(_))));
    assert_eq!(game.phase(), Phase::AwaitingDraw);
    assert_eq!(game.players().len(), 2);
    assert_conserved(&game);

    let next = game.current_player().unwrap();
    let outcome = game.remove_player(next).unwrap();
    assert!(outcome.abandoned());
    assert_eq!(game.phase(), Phase::MatchOver);
}
