//! Why an engine operation was refused.
//!
//! Player-input mistakes surface here only through the typed `Game` methods;
//! [`crate::Game::apply`] turns every one of them into a no-op.

use thiserror::Error;

/// Dealing from a shoe with no cards left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot deal from an empty shoe")]
pub struct EmptyShoe;

/// A refused [`crate::Game::place_bet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BetError {
    /// Bets are only taken between rounds.
    #[error("bets are only taken in the betting phase")]
    InvalidState,
    /// The stake is zero.
    #[error("stake must be positive")]
    ZeroBet,
    /// The stake exceeds the bankroll.
    #[error("stake exceeds the bankroll")]
    InsufficientFunds,
    /// The shoe cannot cover the initial four cards.
    #[error("shoe cannot cover the initial deal")]
    ShoeExhausted,
}

/// A refused hit, stand, double, split or reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ActionError {
    /// The action does not fit the current phase or hand.
    #[error("action not allowed in the current phase")]
    InvalidState,
    /// Doubling needs exactly two cards.
    #[error("only a two-card hand can double down")]
    CannotDouble,
    /// Splitting needs a two-card pair.
    #[error("only a two-card pair can be split")]
    CannotSplit,
    /// Maximum number of hands reached.
    #[error("maximum number of hands reached")]
    MaxHandsReached,
    /// The bankroll cannot match the hand's stake.
    #[error("bankroll cannot match the stake")]
    InsufficientFunds,
    /// The shoe ran out of cards; the round has to be abandoned.
    #[error("shoe is out of cards")]
    ShoeExhausted,
}

/// A refused insurance decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InsuranceError {
    /// No insurance decision is pending.
    #[error("no insurance decision is pending")]
    InvalidState,
    /// Insurance was not offered this round.
    #[error("insurance was not offered this round")]
    NotOffered,
    /// Player already made an insurance decision.
    #[error("insurance was already decided")]
    AlreadyDecided,
    /// There is no main stake to insure.
    #[error("no main stake to insure")]
    NoBet,
    /// The bankroll cannot cover half the main stake.
    #[error("bankroll cannot cover the insurance stake")]
    InsufficientFunds,
}

/// Errors that can occur while the dealer plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DealerError {
    /// Invalid game state for dealer play.
    #[error("invalid game state for dealer play")]
    InvalidState,
    /// The ticket belongs to an earlier round.
    #[error("dealer ticket belongs to an earlier round")]
    StaleTicket,
    /// No cards left in the shoe while the dealer must draw.
    #[error("no cards left in the shoe")]
    ShoeExhausted,
}

/// Errors that can occur when restoring a snapshot.
#[derive(Debug, Error)]
pub enum RestoreError {
    /// The snapshot could not be decoded.
    #[error("snapshot could not be decoded: {0}")]
    Parse(#[from] serde_json::Error),
    /// The snapshot schema version is not supported.
    #[error("unsupported snapshot version {0}")]
    Version(u32),
    /// The decoded snapshot breaks a round-state invariant.
    #[error("snapshot is inconsistent: {0}")]
    Invariant(&'static str),
}

/// Errors reported by a [`crate::storage::Storage`] backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The save could not be encoded or decoded.
    #[error("save could not be encoded: {0}")]
    Serialize(#[from] serde_json::Error),
    /// The backing store failed.
    #[cfg(feature = "std")]
    #[error("storage i/o failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors returned by [`crate::GameOptions::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OptionsError {
    /// The shoe needs at least one deck.
    #[error("the shoe needs at least one deck")]
    NoDecks,
    /// The hand limit is out of range.
    #[error("maximum hands must be between 1 and 4, got {0}")]
    MaxHands(usize),
    /// The blackjack payout has a zero denominator.
    #[error("payout ratio denominator is zero")]
    ZeroDenominator,
}
