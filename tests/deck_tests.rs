//! Deck and hand tests - pile recycling and column clearing

use skyjo::core::{composition, Deck, Hand};
use skyjo::types::{Card, CardId, DECK_SIZE, HAND_SIZE};

fn hand_of(values: &[(i8, bool)]) -> Hand {
    Hand::new(
        values
            .iter()
            .enumerate()
            .map(|(i, &(v, up))| {
                let card = Card::new(CardId(i as u32), v);
                if up {
                    card.revealed()
                } else {
                    card
                }
            })
            .collect(),
    )
}

#[test]
fn test_seeded_decks_repeat() {
    let a: Vec<Card> = Deck::build_seeded(77).draw_pile().copied().collect();
    let b: Vec<Card> = Deck::build_seeded(77).draw_pile().copied().collect();
    let c: Vec<Card> = Deck::build_seeded(78).draw_pile().copied().collect();

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(a.len(), DECK_SIZE);
    assert!(a.iter().all(|card| !card.is_face_up()));
}

#[test]
fn test_card_ids_unique_within_deck() {
    let deck = Deck::build_seeded(5);
    let mut ids: Vec<u32> = deck.cards().map(|c| c.id().0).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), DECK_SIZE);
}

#[test]
fn test_recycle_keeps_prior_top() {
    let mut deck = Deck::build_seeded(1);
    while let Some(card) = deck.draw() {
        deck.discard(card);
    }
    let top = *deck.peek_discard().unwrap();
    assert_eq!(deck.draw_len(), 0);

    let drawn = deck.draw_or_recycle().unwrap();
    assert!(!drawn.is_face_up());
    assert_eq!(deck.discard_len(), 1);
    assert_eq!(deck.peek_discard().unwrap().id(), top.id());
    assert!(deck.peek_discard().unwrap().is_face_up());
    assert_eq!(deck.draw_len(), DECK_SIZE - 2);

    let mut values: Vec<i8> = deck.cards().map(|c| c.value()).collect();
    values.push(drawn.value());
    values.sort_unstable();
    let mut expected = composition();
    expected.sort_unstable();
    assert_eq!(values, expected);
}

#[test]
fn test_recycle_needs_two_discards() {
    let mut deck = Deck::from_piles(Vec::new(), vec![Card::new(CardId(0), 4)], 0);
    assert!(!deck.can_draw());
    assert!(deck.draw_or_recycle().is_err());
    assert_eq!(deck.discard_len(), 1);
}

#[test]
fn test_column_clear_compacts_grid() {
    let mut hand = hand_of(&[
        (5, true),
        (1, false),
        (6, true),
        (2, true),
        (5, true),
        (3, true),
        (6, true),
        (2, true),
        (5, true),
        (4, true),
        (6, true),
        (2, true),
    ]);
    let cleared = hand.clear_matching_columns();

    assert_eq!(cleared.columns.as_slice(), &[0, 2, 3][..]);
    assert_eq!(cleared.cards.len(), 9);
    assert_eq!(hand.len(), 3);
    assert_eq!(hand.columns(), 1);
    let left: Vec<i8> = hand.cards().iter().map(|c| c.value()).collect();
    assert_eq!(left, vec![1, 3, 4]);
}

#[test]
fn test_column_clear_is_idempotent() {
    let mut hand = hand_of(&[(7, true); HAND_SIZE]);
    hand.reveal(0);
    let first = hand.clear_matching_columns();
    assert_eq!(first.columns.len(), 4);
    assert!(hand.is_empty());
    assert!(hand.all_face_up());

    let mut hand = hand_of(&[
        (1, true),
        (2, true),
        (3, true),
        (4, true),
        (1, true),
        (2, true),
        (3, true),
        (4, true),
        (1, false),
        (9, true),
        (8, true),
        (4, false),
    ]);
    let before = hand.clone();
    assert!(hand.clear_matching_columns().is_empty());
    assert!(hand.clear_matching_columns().is_empty());
    assert_eq!(hand, before);
}
