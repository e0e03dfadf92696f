use alloc::vec::Vec;

use crate::card::Card;
use crate::error::DealerError;
use crate::hand::HandStatus;

use super::{Game, Phase};

/// Permission to advance the dealer in one particular round.
///
/// Tickets are refused once the round they were issued for has been reset,
/// abandoned or replaced by a restore, so a scheduled continuation left over
/// from an earlier round cannot touch a later one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DealerTicket {
    generation: u64,
}

/// What a single dealer step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DealerStep {
    /// The dealer drew a card and may need to draw again.
    Drew(Card),
    /// The dealer stood and the round was settled.
    Settled,
}

impl Game {
    /// Reveals the hole card and starts the dealer's turn.
    pub(super) fn enter_dealer(&mut self) {
        self.round.hole_card_hidden = false;
        self.round.phase = Phase::Dealer;

        let all_bust = self
            .round
            .player_hands
            .iter()
            .all(|hand| hand.status() == HandStatus::Bust);

        if all_bust {
            // Nothing left to beat
            self.settle();
        } else if self.options.dealer_autoplay {
            if let Err(err) = self.run_dealer() {
                log::error!("dealer play stopped: {err}");
            }
        }
    }

    /// Returns a ticket for the current round while the dealer is to play.
    #[must_use]
    pub const fn dealer_ticket(&self) -> Option<DealerTicket> {
        match self.round.phase {
            Phase::Dealer => Some(DealerTicket {
                generation: self.generation,
            }),
            _ => None,
        }
    }

    /// Advances the dealer by at most one card.
    ///
    /// Draws while the dealer is under 17 (or on soft 17 when the dealer hits
    /// it); otherwise settles the round. Calling it again after settlement is
    /// refused, so repeated scheduled calls are harmless.
    ///
    /// # Errors
    ///
    /// Returns an error if the ticket is from an earlier round, the game is
    /// not in the dealer phase, or the shoe is empty while the dealer must draw.
    pub fn dealer_step(&mut self, ticket: DealerTicket) -> Result<DealerStep, DealerError> {
        if ticket.generation != self.generation {
            return Err(DealerError::StaleTicket);
        }

        if self.round.phase != Phase::Dealer {
            return Err(DealerError::InvalidState);
        }

        let step = self.step_dealer(0)?;
        self.notify();
        Ok(step)
    }

    /// Plays the dealer hand to completion and settles.
    ///
    /// Returns the cards drawn. Display delays for the drawn cards are spaced
    /// by the configured dealer draw interval.
    ///
    /// # Errors
    ///
    /// Returns an error if the game is not in the dealer phase or the shoe is
    /// empty while the dealer must draw.
    pub fn play_dealer(&mut self) -> Result<Vec<Card>, DealerError> {
        if self.round.phase != Phase::Dealer {
            return Err(DealerError::InvalidState);
        }

        let drawn = self.run_dealer();
        self.notify();
        drawn
    }

    fn run_dealer(&mut self) -> Result<Vec<Card>, DealerError> {
        if self.round.phase != Phase::Dealer {
            return Err(DealerError::InvalidState);
        }

        let mut drawn = Vec::new();
        let mut delay = 0u32;
        loop {
            delay = delay.saturating_add(self.options.dealer_draw_interval_ms);
            match self.step_dealer(delay)? {
                DealerStep::Drew(card) => drawn.push(card),
                DealerStep::Settled => break,
            }
        }

        Ok(drawn)
    }

    fn step_dealer(&mut self, delay: u32) -> Result<DealerStep, DealerError> {
        if !self
            .round
            .dealer_hand
            .must_draw(self.options.dealer_hits_soft_17)
        {
            self.settle();
            return Ok(DealerStep::Settled);
        }

        let card = self.draw().map_err(|_| DealerError::ShoeExhausted)?;
        self.round.dealer_hand.add_card(card);
        self.round.sequences.push_dealer(delay);
        Ok(DealerStep::Drew(card))
    }
}
