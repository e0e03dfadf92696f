//! Round result types for settlement.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

/// Result of a single hand after settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandOutcome {
    /// Player wins (dealer busts or player has higher value).
    Win,
    /// Player loses (player busts or dealer has higher value).
    Lose,
    /// Push (tie).
    Push,
    /// Player has a natural blackjack.
    Blackjack,
}

/// Result of the insurance side bet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsuranceResult {
    /// Dealer had blackjack; the side bet paid 2:1.
    Win,
    /// Dealer did not have blackjack; the side bet is lost.
    Lose,
}

/// Result for a single hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandResult {
    /// The hand index (for split hands).
    pub hand_index: usize,
    /// The outcome of the hand.
    pub outcome: HandOutcome,
    /// The bet amount for this hand.
    pub bet: usize,
    /// Amount returned to the bankroll for this hand, stake included.
    pub payout: usize,
    /// The player's hand value.
    pub player_value: u8,
    /// The dealer's hand value.
    pub dealer_value: u8,
    /// Human-readable summary.
    pub message: String,
}

/// Result of the entire round after settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    /// Results for each player hand, in hand order.
    pub hands: Vec<HandResult>,
    /// The dealer's final hand value.
    pub dealer_value: u8,
    /// Whether the dealer busted.
    pub dealer_bust: bool,
    /// Whether the dealer had blackjack.
    pub dealer_blackjack: bool,
    /// Insurance bet amount (0 if no insurance taken).
    pub insurance_bet: usize,
    /// Insurance payout, stake included (0 unless the dealer had blackjack).
    pub insurance_payout: usize,
    /// Everything credited back to the bankroll this round.
    pub total_winnings: usize,
    /// Net result against everything staked (positive = profit).
    pub net: isize,
}

impl RoundResult {
    /// Outcome of the round as a whole: the first hand's outcome, or the only one.
    #[must_use]
    pub fn primary_outcome(&self) -> Option<HandOutcome> {
        self.hands.first().map(|h| h.outcome)
    }

    /// Total staked on the player hands and the insurance side bet.
    #[must_use]
    pub fn total_staked(&self) -> usize {
        self.hands.iter().map(|h| h.bet).sum::<usize>() + self.insurance_bet
    }
}
