use crate::display::DealingSequences;
use crate::error::BetError;
use crate::hand::{DealerHand, Hand};

use super::{Game, Phase};

/// Cards needed for the initial deal.
const INITIAL_CARDS: usize = 4;

impl Game {
    /// Places the opening bet and deals the initial cards.
    ///
    /// On success the round moves through `Dealing` into `Insurance` (dealer
    /// shows an ace), `Playing`, or straight to `Finished` when either side
    /// holds a natural.
    ///
    /// # Errors
    ///
    /// Returns an error if the game is not in betting state, the bet is zero,
    /// the player lacks funds, or the shoe cannot cover the deal.
    pub fn place_bet(&mut self, amount: usize) -> Result<(), BetError> {
        if self.round.phase != Phase::Betting {
            return Err(BetError::InvalidState);
        }

        if amount == 0 {
            return Err(BetError::ZeroBet);
        }

        if amount > self.round.money {
            return Err(BetError::InsufficientFunds);
        }

        if self.shoe.len() < INITIAL_CARDS {
            return Err(BetError::ShoeExhausted);
        }

        self.round.money -= amount;
        self.round.player_hands = alloc::vec![Hand::new(amount)];
        self.round.current_hand = 0;
        self.round.phase = Phase::Dealing;
        log::info!("bet {amount} placed, {} left", self.round.money);

        self.deal_initial()?;
        self.finish_deal();
        self.notify();
        Ok(())
    }

    /// Player, dealer, player, dealer. The hole card starts hidden.
    fn deal_initial(&mut self) -> Result<(), BetError> {
        let mut dealer = DealerHand::new();

        let first = self.draw().map_err(|_| BetError::ShoeExhausted)?;
        self.round.player_hands[0].add_card(first);
        dealer.add_card(self.draw().map_err(|_| BetError::ShoeExhausted)?);
        let second = self.draw().map_err(|_| BetError::ShoeExhausted)?;
        self.round.player_hands[0].add_card(second);
        dealer.add_card(self.draw().map_err(|_| BetError::ShoeExhausted)?);

        self.round.dealer_hand = dealer;
        self.round.hole_card_hidden = true;
        self.round.sequences = DealingSequences::initial(self.options.card_delay_ms);
        Ok(())
    }

    /// Leaves the `Dealing` phase once the initial cards are on the table.
    pub(super) fn finish_deal(&mut self) {
        let dealer_shows_ace = self
            .round
            .dealer_hand
            .up_card()
            .is_some_and(crate::card::Card::is_ace);

        if dealer_shows_ace && self.options.insurance {
            self.round.insurance.offered = true;
            self.round.phase = Phase::Insurance;
        } else {
            self.resolve_naturals_or_play();
        }
    }

    /// Settles at once if either side holds a natural, otherwise starts play.
    pub(super) fn resolve_naturals_or_play(&mut self) {
        let player_natural = self
            .round
            .player_hands
            .first()
            .is_some_and(Hand::is_natural);
        let dealer_blackjack = self.round.dealer_hand.is_blackjack();

        if player_natural || dealer_blackjack {
            self.round.hole_card_hidden = false;
            self.settle();
        } else {
            self.round.current_hand = 0;
            self.round.phase = Phase::Playing;
        }
    }
}
