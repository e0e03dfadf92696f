//! Hand scoring.
//!
//! Everything here is a pure function of the cards; order does not matter.

use crate::card::Card;

/// Best total of a hand and whether an ace is still counted as 11.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Score {
    /// Best total not exceeding 21 where possible.
    pub total: u8,
    /// At least one ace is counted as 11.
    pub is_soft: bool,
}

/// Scores a hand.
///
/// Aces start at 11 and are demoted to 1 one at a time while the total is over 21.
#[must_use]
pub fn score(cards: &[Card]) -> Score {
    let mut total: u8 = 0;
    let mut aces: u8 = 0;

    for card in cards {
        if card.is_ace() {
            aces += 1;
        }
        total = total.saturating_add(card.rank.value());
    }

    while total > 21 && aces > 0 {
        total -= 10;
        aces -= 1;
    }

    Score {
        total,
        is_soft: aces > 0,
    }
}

/// Score of the first card alone, as shown while the dealer's hole card is hidden.
#[must_use]
pub fn up_card_score(cards: &[Card]) -> Score {
    score(cards.get(..1).unwrap_or_default())
}

/// Two cards totalling 21.
#[must_use]
pub fn is_blackjack(cards: &[Card]) -> bool {
    cards.len() == 2 && score(cards).total == 21
}

/// Total over 21.
#[must_use]
pub fn is_bust(cards: &[Card]) -> bool {
    score(cards).total > 21
}

/// Exactly two cards of the same rank group.
#[must_use]
pub fn can_split_cards(cards: &[Card]) -> bool {
    match cards {
        [a, b] => a.rank.split_group() == b.rank.split_group(),
        _ => false,
    }
}
