//! A single-player blackjack engine with optional `no_std` support.
//!
//! The crate provides a [`Game`] type that runs the full round flow: betting,
//! the initial deal, insurance, player actions, dealer play, and settlement.
//! Rounds can be captured as a [`Snapshot`] and restored later.
//!
//! # Example
//!
//! ```
//! use bjengine::{Action, Game, GameOptions, Phase};
//!
//! let mut game = Game::new(GameOptions::default(), 42);
//! game.apply(Action::PlaceBet(100));
//! assert_ne!(game.phase(), Phase::Betting);
//! ```
#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(all(not(feature = "std"), not(feature = "alloc")))]
compile_error!(
    "`std` is disabled but `alloc` feature is not enabled. Enable `alloc` or keep `std` enabled."
);

extern crate alloc;

pub mod card;
pub mod display;
pub mod error;
pub mod game;
pub mod hand;
pub mod observer;
pub mod options;
pub mod result;
pub mod score;
pub mod shoe;
pub mod snapshot;
pub mod storage;

// Re-export main types
pub use card::{Card, Color, DECK_SIZE, Rank, Suit};
pub use display::DealingSequences;
pub use error::{
    ActionError, BetError, DealerError, EmptyShoe, InsuranceError, OptionsError, RestoreError,
    StorageError,
};
pub use game::{Action, DealerStep, DealerTicket, Game, InsuranceState, Phase, RoundState};
pub use hand::{DealerHand, Hand, HandStatus};
pub use observer::Observer;
pub use options::{GameOptions, MAX_HANDS, PayoutRatio};
pub use result::{HandOutcome, HandResult, InsuranceResult, RoundResult};
pub use score::Score;
pub use shoe::Shoe;
pub use snapshot::{SNAPSHOT_VERSION, Snapshot};
pub use storage::{GUEST_SAVE_KEY, GuestSlot, MemoryStorage, SAVE_TTL_MS, SavedGame, Storage};
