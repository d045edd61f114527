//! Hand module - a player's card grid
//!
//! The grid is 3 rows by `len / 3` columns, stored as a flat row-major vector:
//! index `i` sits at row `i / cols`, column `i % cols`.
//! A column clears when its three cards are face-up and share a value; the
//! survivors are compacted in place so the layout stays row-major.

use arrayvec::ArrayVec;

use crate::types::{Card, GRID_ROWS, HAND_SIZE, MAX_COLUMNS};

/// Columns removed by one clearing pass and the cards they held
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClearedColumns {
    /// Column indices, in pre-clear coordinates, left to right
    pub columns: ArrayVec<usize, MAX_COLUMNS>,
    /// Removed cards, column by column, top to bottom
    pub cards: ArrayVec<Card, HAND_SIZE>,
}

impl ClearedColumns {
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    /// Wrap dealt cards. The length must be a multiple of [`GRID_ROWS`].
    pub fn new(cards: Vec<Card>) -> Self {
        debug_assert_eq!(cards.len() % GRID_ROWS, 0);
        Self { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn columns(&self) -> usize {
        self.cards.len() / GRID_ROWS
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn get(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    /// Flat index of (row, column), if in bounds
    pub fn index(&self, row: usize, column: usize) -> Option<usize> {
        let cols = self.columns();
        if row >= GRID_ROWS || column >= cols {
            return None;
        }
        Some(row * cols + column)
    }

    pub fn face_up_count(&self) -> usize {
        self.cards.iter().filter(|c| c.is_face_up()).count()
    }

    pub fn face_down_count(&self) -> usize {
        self.cards.len() - self.face_up_count()
    }

    /// True when no card is face-down (an empty hand qualifies)
    pub fn all_face_up(&self) -> bool {
        self.cards.iter().all(|c| c.is_face_up())
    }

    /// Sum of face-up values
    pub fn visible_sum(&self) -> i32 {
        self.cards
            .iter()
            .filter(|c| c.is_face_up())
            .map(|c| c.value() as i32)
            .sum()
    }

    /// Sum of all values, face-down included
    pub fn total(&self) -> i32 {
        self.cards.iter().map(|c| c.value() as i32).sum()
    }

    /// Turn a slot face-up. Returns false if out of bounds.
    pub fn reveal(&mut self, index: usize) -> bool {
        match self.cards.get_mut(index) {
            Some(card) => {
                *card = card.revealed();
                true
            }
            None => false,
        }
    }

    pub fn reveal_all(&mut self) {
        for card in &mut self.cards {
            *card = card.revealed();
        }
    }

    /// Put `card` in slot `index` and return the card it displaced
    pub fn replace(&mut self, index: usize, card: Card) -> Option<Card> {
        let slot = self.cards.get_mut(index)?;
        Some(std::mem::replace(slot, card))
    }

    /// Remove every card, leaving an empty grid
    pub fn take_all(&mut self) -> Vec<Card> {
        std::mem::take(&mut self.cards)
    }

    /// Whether column `column` is three face-up cards of one value
    pub fn is_column_clearable(&self, column: usize) -> bool {
        let cols = self.columns();
        if column >= cols {
            return false;
        }
        let first = self.cards[column];
        (0..GRID_ROWS).all(|row| {
            let card = self.cards[row * cols + column];
            card.is_face_up() && card.value() == first.value()
        })
    }

    /// Remove all clearable columns and compact the grid
    ///
    /// Clearable columns are decided up front against the unmodified grid, so
    /// the result does not depend on the order columns are visited in.
    pub fn clear_matching_columns(&mut self) -> ClearedColumns {
        let mut cleared = ClearedColumns::default();
        let cols = self.columns();

        for column in 0..cols {
            if self.is_column_clearable(column) {
                cleared.columns.push(column);
            }
        }
        if cleared.columns.is_empty() {
            return cleared;
        }

        for &column in &cleared.columns {
            for row in 0..GRID_ROWS {
                cleared.cards.push(self.cards[row * cols + column]);
            }
        }

        let mut index = 0usize;
        self.cards.retain(|_| {
            let keep = !cleared.columns.contains(&(index % cols));
            index += 1;
            keep
        });

        cleared
    }
}
