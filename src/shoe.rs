//! The multi-deck shoe cards are dealt from.

use alloc::vec::Vec;

use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use crate::card::{Card, DECK_SIZE, Rank, Suit};
use crate::error::EmptyShoe;

/// A shuffled supply of cards, consumed one card at a time.
///
/// Cards are stored in reverse draw order so dealing is a `pop`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shoe {
    cards: Vec<Card>,
}

impl Shoe {
    /// Builds a shoe of `decks` standard decks and shuffles it.
    ///
    /// Card ids are assigned sequentially starting at `first_id`. The shuffle is
    /// a Fisher–Yates permutation driven by `rng`.
    #[must_use]
    pub fn build(decks: u8, first_id: u32, rng: &mut ChaCha8Rng) -> Self {
        let mut cards = Vec::with_capacity(decks as usize * DECK_SIZE);
        let mut id = first_id;

        for _ in 0..decks {
            for suit in Suit::ALL {
                for rank in Rank::ALL {
                    cards.push(Card::new(suit, rank, id));
                    id = id.wrapping_add(1);
                }
            }
        }

        cards.shuffle(rng);
        Self { cards }
    }

    /// Creates a shoe that deals `draws` in exactly the given order.
    #[must_use]
    pub fn stacked(draws: &[Card]) -> Self {
        let mut cards = draws.to_vec();
        cards.reverse();
        Self { cards }
    }

    /// Removes and returns the next card.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyShoe`] if no cards are left.
    pub fn deal(&mut self) -> Result<Card, EmptyShoe> {
        self.cards.pop().ok_or(EmptyShoe)
    }

    /// Returns the number of cards remaining.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Returns whether the shoe is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Returns whether fewer than `low_water` cards remain.
    #[must_use]
    pub fn needs_reshuffle(&self, low_water: usize) -> bool {
        self.cards.len() < low_water
    }

    /// Returns the highest card id in the shoe, if any.
    #[must_use]
    pub fn max_id(&self) -> Option<u32> {
        self.cards.iter().map(|c| c.id).max()
    }
}
