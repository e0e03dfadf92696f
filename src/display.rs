//! Presentation hints for animating dealt cards.
//!
//! Nothing in the engine reads these values back; scoring and settlement are
//! always committed as soon as a card is dealt.

extern crate alloc;

use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

/// Suggested per-card display delays, in milliseconds from the triggering action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealingSequences {
    /// One delay list per player hand, parallel to the hand's cards.
    pub player: Vec<Vec<u32>>,
    /// Delays parallel to the dealer's cards.
    pub dealer: Vec<u32>,
}

impl DealingSequences {
    /// Delays for the initial two-and-two deal, alternating player and dealer.
    #[must_use]
    pub fn initial(card_delay_ms: u32) -> Self {
        Self {
            player: alloc::vec![alloc::vec![0, card_delay_ms.saturating_mul(2)]],
            dealer: alloc::vec![card_delay_ms, card_delay_ms.saturating_mul(3)],
        }
    }

    /// Records a card dealt to player hand `hand` that should appear at `delay`.
    pub fn push_player(&mut self, hand: usize, delay: u32) {
        if self.player.len() <= hand {
            self.player.resize_with(hand + 1, Vec::new);
        }
        self.player[hand].push(delay);
    }

    /// Inserts the delay list for a new split hand at `hand`.
    pub fn insert_hand(&mut self, hand: usize, delays: Vec<u32>) {
        let at = hand.min(self.player.len());
        self.player.insert(at, delays);
    }

    /// Records a card dealt to the dealer.
    pub fn push_dealer(&mut self, delay: u32) {
        self.dealer.push(delay);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_deal_alternates_player_and_dealer() {
        let seq = DealingSequences::initial(600);
        assert_eq!(seq.player, [[0, 1200]]);
        assert_eq!(seq.dealer, [600, 1800]);
    }

    #[test]
    fn pushing_to_a_missing_hand_grows_the_list() {
        let mut seq = DealingSequences::default();
        seq.push_player(1, 0);
        assert_eq!(seq.player.len(), 2);
        assert!(seq.player[0].is_empty());
        assert_eq!(seq.player[1], [0]);
    }
}
