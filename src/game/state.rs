//! Round state types.

extern crate alloc;

use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use crate::display::DealingSequences;
use crate::hand::{DealerHand, Hand};
use crate::result::{InsuranceResult, RoundResult};
use crate::score::{self, Score};

/// Round phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Accepting a bet for the next round.
    #[default]
    Betting,
    /// Dealing initial cards.
    Dealing,
    /// Waiting for the insurance decision.
    Insurance,
    /// Waiting for player actions.
    Playing,
    /// Dealer plays out their hand.
    Dealer,
    /// Round has been settled.
    Finished,
}

/// Insurance side-bet state for the current round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InsuranceState {
    /// Insurance was offered this round.
    pub offered: bool,
    /// The player took insurance.
    pub taken: bool,
    /// Amount staked on insurance.
    pub amount: usize,
    /// Resolution once the hole card is known.
    pub result: Option<InsuranceResult>,
}

/// All mutable state of the round in progress.
///
/// The engine is the only writer. Readers get a shared reference through
/// [`crate::Game::state`] and re-read it after every change notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundState {
    pub(crate) phase: Phase,
    pub(crate) player_hands: Vec<Hand>,
    pub(crate) dealer_hand: DealerHand,
    pub(crate) current_hand: usize,
    pub(crate) money: usize,
    pub(crate) insurance: InsuranceState,
    pub(crate) result: Option<RoundResult>,
    pub(crate) hole_card_hidden: bool,
    pub(crate) sequences: DealingSequences,
}

impl RoundState {
    /// A betting-phase round with one empty, unbet hand.
    #[must_use]
    pub fn new(money: usize) -> Self {
        Self {
            phase: Phase::Betting,
            player_hands: alloc::vec![Hand::new(0)],
            dealer_hand: DealerHand::new(),
            current_hand: 0,
            money,
            insurance: InsuranceState::default(),
            result: None,
            hole_card_hidden: true,
            sequences: DealingSequences {
                player: alloc::vec![Vec::new()],
                dealer: Vec::new(),
            },
        }
    }

    /// Returns the current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns the player's hands (more than one only after splitting).
    #[must_use]
    pub fn player_hands(&self) -> &[Hand] {
        &self.player_hands
    }

    /// Returns the dealer's hand.
    #[must_use]
    pub const fn dealer_hand(&self) -> &DealerHand {
        &self.dealer_hand
    }

    /// Index of the hand being acted on.
    #[must_use]
    pub const fn current_hand_index(&self) -> usize {
        self.current_hand
    }

    /// The hand being acted on.
    #[must_use]
    pub fn current_hand(&self) -> Option<&Hand> {
        self.player_hands.get(self.current_hand)
    }

    /// One bet per player hand.
    #[must_use]
    pub fn bets(&self) -> Vec<usize> {
        self.player_hands.iter().map(Hand::bet).collect()
    }

    /// The player's bankroll, excluding anything currently staked.
    #[must_use]
    pub const fn money(&self) -> usize {
        self.money
    }

    /// Insurance side-bet state.
    #[must_use]
    pub const fn insurance(&self) -> &InsuranceState {
        &self.insurance
    }

    /// Settlement, present only once the round is finished.
    #[must_use]
    pub const fn result(&self) -> Option<&RoundResult> {
        self.result.as_ref()
    }

    /// Everything credited back this round, 0 before settlement.
    #[must_use]
    pub fn total_winnings(&self) -> usize {
        self.result.as_ref().map_or(0, |r| r.total_winnings)
    }

    /// Whether the dealer's second card is still face down.
    #[must_use]
    pub const fn is_hole_card_hidden(&self) -> bool {
        self.hole_card_hidden
    }

    /// Display-delay hints for the cards currently on the table.
    #[must_use]
    pub const fn dealing_sequences(&self) -> &DealingSequences {
        &self.sequences
    }

    /// One score per player hand.
    #[must_use]
    pub fn player_scores(&self) -> Vec<Score> {
        self.player_hands.iter().map(Hand::score).collect()
    }

    /// Score of the dealer's full hand, hole card included.
    #[must_use]
    pub fn dealer_score(&self) -> Score {
        self.dealer_hand.score()
    }

    /// Dealer score the player is allowed to see.
    #[must_use]
    pub fn dealer_visible_score(&self) -> Score {
        if self.hole_card_hidden {
            score::up_card_score(self.dealer_hand.cards())
        } else {
            self.dealer_hand.score()
        }
    }

    /// Sum of all outstanding stakes: hand bets plus a taken insurance bet.
    #[must_use]
    pub fn staked(&self) -> usize {
        let insurance = if self.insurance.taken {
            self.insurance.amount
        } else {
            0
        };
        self.player_hands.iter().map(Hand::bet).sum::<usize>() + insurance
    }
}
