//! Player hands (with their stakes) and the dealer hand.

extern crate alloc;

use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use crate::card::Card;
use crate::score::{self, Score};

/// Where a player hand stands in the round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandStatus {
    /// Still taking actions.
    #[default]
    Active,
    /// The player stood.
    Stood,
    /// Doubled down; the single extra card has been dealt.
    Doubled,
    /// Over 21.
    Bust,
}

impl HandStatus {
    /// No further actions are allowed on the hand.
    #[must_use]
    pub const fn is_done(self) -> bool {
        !matches!(self, Self::Active)
    }
}

/// One player hand and the stake riding on it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hand {
    cards: Vec<Card>,
    bet: usize,
    from_split: bool,
    status: HandStatus,
}

impl Hand {
    /// An empty, active hand staking `bet`.
    #[must_use]
    pub const fn new(bet: usize) -> Self {
        Self::from_parts(Vec::new(), bet, false, HandStatus::Active)
    }

    /// The second half of a split pair, holding only `card`.
    #[must_use]
    pub fn from_split(card: Card, bet: usize) -> Self {
        Self::from_parts(alloc::vec![card], bet, true, HandStatus::Active)
    }

    /// Reassembles a hand, e.g. from a snapshot.
    #[must_use]
    pub const fn from_parts(
        cards: Vec<Card>,
        bet: usize,
        from_split: bool,
        status: HandStatus,
    ) -> Self {
        Self {
            cards,
            bet,
            from_split,
            status,
        }
    }

    /// Deals `card` into the hand; going over 21 marks it bust.
    pub fn add_card(&mut self, card: Card) {
        self.cards.push(card);
        if self.is_bust() {
            self.status = HandStatus::Bust;
        }
    }

    /// Cards in dealing order.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Current status.
    #[must_use]
    pub const fn status(&self) -> HandStatus {
        self.status
    }

    /// Overrides the status.
    pub const fn set_status(&mut self, status: HandStatus) {
        self.status = status;
    }

    /// Stake on this hand.
    #[must_use]
    pub const fn bet(&self) -> usize {
        self.bet
    }

    /// Doubles the stake (double down).
    pub const fn double_bet(&mut self) {
        self.bet *= 2;
    }

    /// Whether the hand took part in a split.
    #[must_use]
    pub const fn is_from_split(&self) -> bool {
        self.from_split
    }

    /// Best total and softness.
    #[must_use]
    pub fn score(&self) -> Score {
        score::score(&self.cards)
    }

    /// Best total.
    #[must_use]
    pub fn value(&self) -> u8 {
        self.score().total
    }

    /// A natural: two cards totalling 21 on a hand that was never split.
    #[must_use]
    pub fn is_natural(&self) -> bool {
        !self.from_split && score::is_blackjack(&self.cards)
    }

    /// Total over 21.
    #[must_use]
    pub fn is_bust(&self) -> bool {
        score::is_bust(&self.cards)
    }

    /// Two cards from the same rank group.
    #[must_use]
    pub fn can_split(&self) -> bool {
        score::can_split_cards(&self.cards)
    }

    /// Number of cards held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// No cards dealt yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Splits off the second card of a two-card hand.
    ///
    /// The remaining hand counts as split from here on.
    pub fn take_split_card(&mut self) -> Option<Card> {
        if self.len() != 2 {
            return None;
        }
        self.from_split = true;
        self.cards.pop()
    }
}

/// The dealer's cards; the first is the up card, the second the hole card.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DealerHand {
    cards: Vec<Card>,
}

impl DealerHand {
    /// No cards yet.
    #[must_use]
    pub const fn new() -> Self {
        Self { cards: Vec::new() }
    }

    /// Reassembles the hand, e.g. from a snapshot.
    #[must_use]
    pub const fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    /// Deals `card` to the dealer.
    pub fn add_card(&mut self, card: Card) {
        self.cards.push(card);
    }

    /// Cards in dealing order, hole card included.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// The face-up first card.
    #[must_use]
    pub fn up_card(&self) -> Option<&Card> {
        self.cards.first()
    }

    /// Best total and softness of all cards.
    #[must_use]
    pub fn score(&self) -> Score {
        score::score(&self.cards)
    }

    /// Best total of all cards.
    #[must_use]
    pub fn value(&self) -> u8 {
        self.score().total
    }

    /// Two cards totalling 21.
    #[must_use]
    pub fn is_blackjack(&self) -> bool {
        score::is_blackjack(&self.cards)
    }

    /// Total over 21.
    #[must_use]
    pub fn is_bust(&self) -> bool {
        score::is_bust(&self.cards)
    }

    /// Whether the dealer must draw: under 17, or exactly soft 17 when `hits_soft_17`.
    #[must_use]
    pub fn must_draw(&self, hits_soft_17: bool) -> bool {
        let Score { total, is_soft } = self.score();
        total < 17 || (total == 17 && is_soft && hits_soft_17)
    }

    /// Number of cards held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// No cards dealt yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
