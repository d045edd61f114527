//! Deck module - draw pile and discard pile
//!
//! The draw pile is a queue: [`Deck::draw`] takes from the front. The discard
//! pile is a stack whose top is the most recently discarded card, and every
//! card on it is face-up.
//!
//! When the draw pile runs dry, [`Deck::recycle`] keeps the discard top in
//! place and reshuffles everything beneath it into a new draw pile.

use std::collections::VecDeque;

use thiserror::Error;

use crate::rng::{CardIdGen, ShuffleRng};
use crate::types::{Card, CARD_COMPOSITION, DECK_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DeckError {
    #[error("draw pile is empty")]
    DrawEmpty,
    #[error("discard pile is empty")]
    DiscardEmpty,
    #[error("draw pile and discard pile are both exhausted")]
    Exhausted,
}

/// The fixed card values of one deck, in composition order
pub fn composition() -> Vec<i8> {
    let mut values = Vec::with_capacity(DECK_SIZE);
    for &(value, copies) in CARD_COMPOSITION.iter() {
        values.extend(std::iter::repeat(value).take(copies as usize));
    }
    values
}

/// Draw pile, discard pile, and the RNG used to reshuffle them
#[derive(Debug, Clone)]
pub struct Deck {
    draw: VecDeque<Card>,
    discard: Vec<Card>,
    rng: ShuffleRng,
}

impl Deck {
    /// A deck with no cards, used before the first round is dealt
    pub fn empty() -> Self {
        Self {
            draw: VecDeque::new(),
            discard: Vec::new(),
            rng: ShuffleRng::new(0),
        }
    }

    /// Build and shuffle a full deck from OS entropy
    pub fn build() -> Self {
        Self::build_with(ShuffleRng::from_entropy())
    }

    /// Build and shuffle a full deck reproducibly
    pub fn build_seeded(seed: u64) -> Self {
        Self::build_with(ShuffleRng::new(seed))
    }

    fn build_with(mut rng: ShuffleRng) -> Self {
        let mut ids = CardIdGen::new();
        let mut cards: Vec<Card> = composition()
            .into_iter()
            .map(|value| Card::new(ids.next_id(), value))
            .collect();
        rng.shuffle(&mut cards);

        Self {
            draw: cards.into(),
            discard: Vec::with_capacity(DECK_SIZE),
            rng,
        }
    }

    /// Stack a deck with explicit piles (front of `draw` is drawn first,
    /// last of `discard` is the top)
    pub fn from_piles(draw: Vec<Card>, discard: Vec<Card>, seed: u64) -> Self {
        Self {
            draw: draw.into_iter().map(Card::hidden).collect(),
            discard: discard.into_iter().map(Card::revealed).collect(),
            rng: ShuffleRng::new(seed),
        }
    }

    pub fn draw_len(&self) -> usize {
        self.draw.len()
    }

    pub fn discard_len(&self) -> usize {
        self.discard.len()
    }

    pub fn peek_discard(&self) -> Option<&Card> {
        self.discard.last()
    }

    pub fn draw_pile(&self) -> impl Iterator<Item = &Card> {
        self.draw.iter()
    }

    /// Discard pile bottom to top
    pub fn discard_pile(&self) -> &[Card] {
        &self.discard
    }

    /// Every card held by either pile
    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.draw.iter().chain(self.discard.iter())
    }

    /// Whether [`Deck::draw_or_recycle`] would succeed
    pub fn can_draw(&self) -> bool {
        !self.draw.is_empty() || self.discard.len() >= 2
    }

    /// Remove and return the front card of the draw pile
    pub fn draw(&mut self) -> Option<Card> {
        self.draw.pop_front()
    }

    /// Draw, rebuilding the draw pile from the discard pile first if needed
    pub fn draw_or_recycle(&mut self) -> Result<Card, DeckError> {
        if self.draw.is_empty() {
            self.recycle()?;
        }
        self.draw.pop_front().ok_or(DeckError::Exhausted)
    }

    /// Move all but the discard top into a freshly shuffled, face-down draw pile
    ///
    /// The previous top stays as the only card of the discard pile.
    pub fn recycle(&mut self) -> Result<(), DeckError> {
        if self.discard.len() < 2 {
            return Err(DeckError::Exhausted);
        }
        let top = self.discard.pop().ok_or(DeckError::DiscardEmpty)?;

        let mut rest: Vec<Card> = self.discard.drain(..).map(Card::hidden).collect();
        self.rng.shuffle(&mut rest);
        self.draw.extend(rest);
        self.discard.push(top.revealed());
        Ok(())
    }

    /// Remove and return the discard top
    pub fn draw_from_discard(&mut self) -> Result<Card, DeckError> {
        self.discard.pop().ok_or(DeckError::DiscardEmpty)
    }

    /// Push a card onto the discard pile, face-up
    pub fn discard(&mut self, card: Card) {
        self.discard.push(card.revealed());
    }

    /// Slide cards under the discard pile without touching the top
    pub fn tuck_under_discard<I>(&mut self, cards: I)
    where
        I: IntoIterator<Item = Card>,
    {
        let tucked: Vec<Card> = cards.into_iter().map(Card::revealed).collect();
        self.discard.splice(0..0, tucked);
    }

    /// Start the discard pile with the first card of the draw pile
    pub fn flip_initial_discard(&mut self) -> Result<(), DeckError> {
        let card = self.draw.pop_front().ok_or(DeckError::DrawEmpty)?;
        self.discard(card);
        Ok(())
    }
}
