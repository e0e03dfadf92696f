use crate::card::Card;
use crate::error::ActionError;
use crate::hand::{Hand, HandStatus};
use crate::options::MAX_HANDS;

use super::{Game, Phase};

impl Game {
    fn ensure_playing(&self) -> Result<&Hand, ActionError> {
        if self.round.phase != Phase::Playing {
            return Err(ActionError::InvalidState);
        }

        self.round
            .current_hand()
            .filter(|hand| !hand.status().is_done())
            .ok_or(ActionError::InvalidState)
    }

    fn check_double(&self) -> Result<usize, ActionError> {
        let hand = self.ensure_playing()?;

        // Only on the first two cards
        if hand.len() != 2 {
            return Err(ActionError::CannotDouble);
        }

        if hand.bet() > self.round.money {
            return Err(ActionError::InsufficientFunds);
        }

        if self.shoe.is_empty() {
            return Err(ActionError::ShoeExhausted);
        }

        Ok(hand.bet())
    }

    fn check_split(&self) -> Result<usize, ActionError> {
        let hand = self.ensure_playing()?;

        if !hand.can_split() {
            return Err(ActionError::CannotSplit);
        }

        let limit = self.options.max_hands.min(MAX_HANDS);
        if self.round.player_hands.len() >= limit {
            return Err(ActionError::MaxHandsReached);
        }

        if hand.bet() > self.round.money {
            return Err(ActionError::InsufficientFunds);
        }

        if self.shoe.len() < 2 {
            return Err(ActionError::ShoeExhausted);
        }

        Ok(hand.bet())
    }

    /// Returns whether the current hand may double down right now.
    #[must_use]
    pub fn can_double(&self) -> bool {
        self.check_double().is_ok()
    }

    /// Returns whether the current hand may be split right now.
    #[must_use]
    pub fn can_split(&self) -> bool {
        self.check_split().is_ok()
    }

    /// Player action: Hit (draw a card).
    ///
    /// A bust moves play on to the next hand, or to the dealer.
    ///
    /// # Errors
    ///
    /// Returns an error if the game is not in the playing phase or the shoe
    /// is empty.
    pub fn hit(&mut self) -> Result<Card, ActionError> {
        self.ensure_playing()?;

        let card = self.draw().map_err(|_| ActionError::ShoeExhausted)?;
        let index = self.round.current_hand;
        let hand = &mut self.round.player_hands[index];
        hand.add_card(card);
        let bust = hand.status() == HandStatus::Bust;
        self.round.sequences.push_player(index, 0);

        if bust {
            self.advance_after_hand();
        }

        self.notify();
        Ok(card)
    }

    /// Player action: Stand (keep current hand).
    ///
    /// # Errors
    ///
    /// Returns an error if the game is not in the playing phase.
    pub fn stand(&mut self) -> Result<(), ActionError> {
        self.ensure_playing()?;

        let index = self.round.current_hand;
        self.round.player_hands[index].set_status(HandStatus::Stood);
        self.advance_after_hand();

        self.notify();
        Ok(())
    }

    /// Player action: Double down (double bet, receive one card, then stand).
    ///
    /// # Errors
    ///
    /// Returns an error if the game is not in the playing phase, the hand
    /// does not hold exactly two cards, the player cannot match the bet, or
    /// the shoe is empty.
    pub fn double_down(&mut self) -> Result<Card, ActionError> {
        let bet = self.check_double()?;

        let card = self.draw().map_err(|_| ActionError::ShoeExhausted)?;
        self.round.money -= bet;

        let index = self.round.current_hand;
        let hand = &mut self.round.player_hands[index];
        hand.double_bet();
        hand.add_card(card);

        // If not bust, the hand is finished anyway
        if hand.status() == HandStatus::Active {
            hand.set_status(HandStatus::Doubled);
        }
        self.round.sequences.push_player(index, 0);
        log::debug!("doubled hand {index} to {}", bet * 2);

        self.advance_after_hand();

        self.notify();
        Ok(card)
    }

    /// Player action: Split (split a pair into two hands).
    ///
    /// Ten-valued cards split with each other. Each new hand is dealt one
    /// card straight away and carries the original bet.
    ///
    /// # Errors
    ///
    /// Returns an error if the game is not in the playing phase, the hand is
    /// not a pair, the hand limit is reached, the player cannot match the
    /// bet, or the shoe cannot cover the two new cards.
    #[expect(
        clippy::missing_panics_doc,
        reason = "internal expects are guaranteed to succeed"
    )]
    pub fn split(&mut self) -> Result<(), ActionError> {
        let bet = self.check_split()?;

        let first = self.draw().map_err(|_| ActionError::ShoeExhausted)?;
        let second = self.draw().map_err(|_| ActionError::ShoeExhausted)?;
        self.round.money -= bet;

        let index = self.round.current_hand;
        let hand = &mut self.round.player_hands[index];
        let split_card = hand
            .take_split_card()
            .expect("check_split() verified the hand holds a pair");
        hand.add_card(first);

        let mut new_hand = Hand::from_split(split_card, bet);
        new_hand.add_card(second);
        self.round.player_hands.insert(index + 1, new_hand);

        if let Some(delays) = self.round.sequences.player.get_mut(index) {
            delays.truncate(1);
        }
        self.round.sequences.push_player(index, 0);
        self.round
            .sequences
            .insert_hand(index + 1, alloc::vec![0, 0]);
        log::debug!("split hand {index}, now {} hands", self.round.player_hands.len());

        self.notify();
        Ok(())
    }

    /// Moves to the next unfinished hand, or hands over to the dealer.
    fn advance_after_hand(&mut self) {
        let next = self
            .round
            .player_hands
            .iter()
            .enumerate()
            .skip(self.round.current_hand + 1)
            .find(|(_, hand)| !hand.status().is_done())
            .map(|(index, _)| index);

        match next {
            Some(index) => self.round.current_hand = index,
            None => self.enter_dealer(),
        }
    }
}
