//! Game engine and state management.

use alloc::boxed::Box;
use alloc::string::{String, ToString};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::card::Card;
use crate::error::{ActionError, EmptyShoe, RestoreError};
use crate::observer::Observer;
use crate::options::GameOptions;
use crate::shoe::Shoe;
use crate::snapshot::Snapshot;

mod actions;
mod bet;
mod dealer;
mod insurance;
mod settle;
pub mod state;

pub use dealer::{DealerStep, DealerTicket};
pub use state::{InsuranceState, Phase, RoundState};

/// A command the presentation layer can send to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Place the opening bet and deal.
    PlaceBet(usize),
    /// Draw a card to the current hand.
    Hit,
    /// Stand on the current hand.
    Stand,
    /// Double the current hand's bet, draw one card, then stand.
    Double,
    /// Split the current pair into two hands.
    Split,
    /// Take the insurance side bet.
    TakeInsurance,
    /// Decline the insurance side bet.
    DeclineInsurance,
    /// Clear a finished round and return to betting.
    ResetForNextRound,
    /// Credit an externally granted bonus to the bankroll.
    AddMoney(usize),
}

/// A single-player blackjack engine.
///
/// The engine owns the shoe across rounds and the state of the round in
/// progress. Every action validates its preconditions first and leaves the
/// state untouched when they fail.
pub struct Game {
    /// Game options.
    ///
    /// Changes made after construction are not re-validated; the hand limit
    /// never exceeds [`crate::MAX_HANDS`] regardless.
    pub options: GameOptions,
    /// Cards in the shoe.
    shoe: Shoe,
    /// The round in progress.
    round: RoundState,
    /// Random number generator.
    rng: ChaCha8Rng,
    /// Id given to the first card of the next shoe.
    next_card_id: u32,
    /// Bumped whenever a round is discarded so stale dealer tickets are refused.
    generation: u64,
    /// Change notification sink.
    observer: Option<Box<dyn Observer>>,
}

impl Game {
    /// Creates a new game with the given seed and the configured starting money.
    ///
    /// # Example
    ///
    /// ```
    /// use bjengine::{Game, GameOptions, Phase};
    ///
    /// let game = Game::new(GameOptions::default(), 42);
    /// assert_eq!(game.state().phase(), Phase::Betting);
    /// assert_eq!(game.state().money(), 1000);
    /// ```
    #[must_use]
    pub fn new(options: GameOptions, seed: u64) -> Self {
        let money = options.starting_money;
        Self::with_money(options, seed, money)
    }

    /// Creates a new game with an explicit bankroll.
    ///
    /// Options that fail [`GameOptions::validate`] are clamped to the nearest
    /// playable values.
    #[must_use]
    pub fn with_money(options: GameOptions, seed: u64, money: usize) -> Self {
        let options = match options.validate() {
            Ok(()) => options,
            Err(err) => {
                log::warn!("clamping unplayable options: {err}");
                options.clamped()
            }
        };
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let shoe = Shoe::build(options.decks, 0, &mut rng);
        let next_card_id = shoe_size(&options);

        Self {
            options,
            shoe,
            round: RoundState::new(money),
            rng,
            next_card_id,
            generation: 0,
            observer: None,
        }
    }

    /// Installs the callback invoked after every state change.
    pub fn set_observer(&mut self, observer: impl Observer + 'static) {
        self.observer = Some(Box::new(observer));
    }

    /// Removes the change callback.
    pub fn clear_observer(&mut self) {
        self.observer = None;
    }

    /// Returns the state of the round in progress.
    #[must_use]
    pub const fn state(&self) -> &RoundState {
        &self.round
    }

    /// Returns the current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.round.phase
    }

    /// Returns the number of cards remaining in the shoe.
    #[must_use]
    pub fn cards_remaining(&self) -> usize {
        self.shoe.len()
    }

    /// Replaces the shoe, returning the old one.
    ///
    /// Meant for replays and tests that need a known card order.
    pub fn replace_shoe(&mut self, shoe: Shoe) -> Shoe {
        if let Some(max) = shoe.max_id() {
            self.next_card_id = self.next_card_id.max(max.wrapping_add(1));
        }
        core::mem::replace(&mut self.shoe, shoe)
    }

    /// Applies a command, ignoring it when its preconditions fail.
    ///
    /// Returns the (possibly unchanged) state.
    pub fn apply(&mut self, action: Action) -> &RoundState {
        let outcome = match action {
            Action::PlaceBet(amount) => self.place_bet(amount).map_err(|e| e.to_string()),
            Action::Hit => self.hit().map(|_| ()).map_err(|e| e.to_string()),
            Action::Stand => self.stand().map_err(|e| e.to_string()),
            Action::Double => self.double_down().map(|_| ()).map_err(|e| e.to_string()),
            Action::Split => self.split().map_err(|e| e.to_string()),
            Action::TakeInsurance => self
                .take_insurance()
                .map(|_| ())
                .map_err(|e| e.to_string()),
            Action::DeclineInsurance => self.decline_insurance().map_err(|e| e.to_string()),
            Action::ResetForNextRound => self.reset_for_next_round().map_err(|e| e.to_string()),
            Action::AddMoney(amount) => self
                .add_money(amount)
                .map(|_| ())
                .ok_or_else(|| String::from("zero amount or bankroll overflow")),
        };

        if let Err(reason) = outcome {
            log::debug!("ignored {action:?}: {reason}");
        }
        &self.round
    }

    /// Clears a finished round and returns to betting.
    ///
    /// Money and the shoe carry over; the shoe is rebuilt first if it has run
    /// below the low-water mark.
    ///
    /// # Errors
    ///
    /// Returns an error if the round is not finished.
    pub fn reset_for_next_round(&mut self) -> Result<(), ActionError> {
        if self.round.phase != Phase::Finished {
            return Err(ActionError::InvalidState);
        }

        self.start_fresh_round(self.round.money);
        self.notify();
        Ok(())
    }

    /// Abandons the round in any phase, refunding everything still staked.
    ///
    /// This is the way out after the shoe runs dry mid-round. Returns the
    /// refunded amount.
    pub fn abandon_round(&mut self) -> usize {
        let refund = match self.round.phase {
            Phase::Betting | Phase::Finished => 0,
            _ => self.round.staked(),
        };
        let money = self.round.money.saturating_add(refund);
        log::info!("round abandoned, refunded {refund}");

        self.start_fresh_round(money);
        self.notify();
        refund
    }

    /// Restarts with the configured starting money and a freshly shuffled shoe.
    pub fn reset_progress(&mut self) {
        self.rebuild_shoe();
        self.start_fresh_round(self.options.starting_money);
        self.notify();
    }

    /// Credits an externally granted amount to the bankroll.
    ///
    /// Returns the new balance, or `None` (leaving the bankroll untouched)
    /// if the amount is zero or the balance would overflow.
    pub fn add_money(&mut self, amount: usize) -> Option<usize> {
        if amount == 0 {
            return None;
        }
        let money = self.round.money.checked_add(amount)?;
        self.round.money = money;
        self.notify();
        Some(money)
    }

    /// Captures the round as a persistable snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.round)
    }

    /// Restores a snapshot into this engine with a freshly shuffled shoe.
    ///
    /// A snapshot that cannot be used leaves the engine on a fresh default
    /// round instead.
    ///
    /// # Errors
    ///
    /// Returns why the snapshot was rejected; the engine is still usable.
    pub fn restore(&mut self, snapshot: Snapshot) -> Result<(), RestoreError> {
        let result = match snapshot.into_state() {
            Ok(round) => {
                let max_id = round
                    .player_hands
                    .iter()
                    .flat_map(|h| h.cards())
                    .chain(round.dealer_hand.cards())
                    .map(|c| c.id)
                    .max();
                if let Some(max) = max_id {
                    self.next_card_id = self.next_card_id.max(max.wrapping_add(1));
                }
                self.rebuild_shoe();
                self.round = round;
                self.generation += 1;
                if self.round.phase == Phase::Dealing {
                    self.finish_deal();
                }
                Ok(())
            }
            Err(err) => {
                self.discard_saved_round(&err);
                Err(err)
            }
        };

        self.notify();
        result
    }

    /// Restores from JSON, falling back to a fresh round on any failure.
    ///
    /// # Errors
    ///
    /// Returns why the input was rejected; the engine is still usable.
    pub fn restore_json(&mut self, json: &str) -> Result<(), RestoreError> {
        match Snapshot::from_json(json) {
            Ok(snapshot) => self.restore(snapshot),
            Err(err) => {
                self.discard_saved_round(&err);
                self.notify();
                Err(err)
            }
        }
    }

    /// Deals the next card, or reports that the shoe ran dry.
    fn draw(&mut self) -> Result<Card, EmptyShoe> {
        self.shoe.deal().inspect_err(|_| {
            log::error!("dealt from an empty shoe; the round must be abandoned");
        })
    }

    fn rebuild_shoe(&mut self) {
        self.shoe = Shoe::build(self.options.decks, self.next_card_id, &mut self.rng);
        self.next_card_id = self.next_card_id.wrapping_add(shoe_size(&self.options));
        log::info!("shoe rebuilt with {} cards", self.shoe.len());
    }

    /// Falls back to a default round on a fresh shoe after a rejected save.
    fn discard_saved_round(&mut self, err: &RestoreError) {
        log::warn!("discarding saved round: {err}");
        self.rebuild_shoe();
        self.start_fresh_round(self.options.starting_money);
    }

    fn start_fresh_round(&mut self, money: usize) {
        if self.shoe.needs_reshuffle(self.options.reshuffle_below) {
            self.rebuild_shoe();
        }
        self.round = RoundState::new(money);
        self.generation += 1;
    }

    fn notify(&mut self) {
        if let Some(observer) = self.observer.as_mut() {
            observer.state_changed();
        }
    }
}

fn shoe_size(options: &GameOptions) -> u32 {
    u32::from(options.decks) * crate::card::DECK_SIZE as u32
}
