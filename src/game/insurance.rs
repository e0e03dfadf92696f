use crate::error::InsuranceError;
use crate::result::InsuranceResult;

use super::{Game, Phase};

impl Game {
    fn check_insurance(&self) -> Result<usize, InsuranceError> {
        if self.round.phase != Phase::Insurance {
            return Err(InsuranceError::InvalidState);
        }

        if !self.round.insurance.offered {
            return Err(InsuranceError::NotOffered);
        }

        if self.round.insurance.taken {
            return Err(InsuranceError::AlreadyDecided);
        }

        let bet = self
            .round
            .player_hands
            .first()
            .map(crate::hand::Hand::bet)
            .filter(|&bet| bet > 0)
            .ok_or(InsuranceError::NoBet)?;

        let amount = bet / 2;
        if amount > self.round.money {
            return Err(InsuranceError::InsufficientFunds);
        }

        Ok(amount)
    }

    /// Returns whether insurance is currently being offered.
    #[must_use]
    pub fn is_insurance_offered(&self) -> bool {
        self.round.phase == Phase::Insurance
    }

    /// Returns whether the player can afford to take insurance right now.
    #[must_use]
    pub fn can_take_insurance(&self) -> bool {
        self.check_insurance().is_ok()
    }

    /// Takes insurance: half the main bet, rounded down, paying 2:1.
    ///
    /// The hole card is checked immediately afterwards, so the round either
    /// settles (dealer or player natural) or moves on to play.
    ///
    /// Returns the insurance amount.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The game is not in the insurance state
    /// - Insurance was not offered this round
    /// - The player already took insurance
    /// - There is no main bet
    /// - The player cannot cover the insurance amount
    pub fn take_insurance(&mut self) -> Result<usize, InsuranceError> {
        let amount = self.check_insurance()?;

        self.round.money -= amount;
        self.round.insurance.taken = true;
        self.round.insurance.amount = amount;
        log::info!("insurance taken for {amount}");

        self.finish_insurance();
        self.notify();
        Ok(amount)
    }

    /// Declines insurance and moves on.
    ///
    /// # Errors
    ///
    /// Returns an error if the game is not in the insurance state.
    pub fn decline_insurance(&mut self) -> Result<(), InsuranceError> {
        if self.round.phase != Phase::Insurance {
            return Err(InsuranceError::InvalidState);
        }

        self.round.insurance.taken = false;
        self.round.insurance.amount = 0;

        self.finish_insurance();
        self.notify();
        Ok(())
    }

    /// Resolves the side bet against the hole card, then checks naturals.
    fn finish_insurance(&mut self) {
        let dealer_blackjack = self.round.dealer_hand.is_blackjack();

        if self.round.insurance.taken {
            self.round.insurance.result = Some(if dealer_blackjack {
                InsuranceResult::Win
            } else {
                InsuranceResult::Lose
            });
        }

        self.resolve_naturals_or_play();
    }
}
