//! Game configuration options.

use crate::error::OptionsError;

/// Most hands a player can hold after splitting (the original hand plus three splits).
pub const MAX_HANDS: usize = 4;

/// Blackjack payout ratio, applied with floor rounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PayoutRatio {
    /// Numerator.
    pub numerator: u16,
    /// Denominator.
    pub denominator: u16,
}

impl PayoutRatio {
    /// The standard 3:2 blackjack payout.
    pub const THREE_TO_TWO: Self = Self {
        numerator: 3,
        denominator: 2,
    };

    /// Winnings (excluding the returned stake) for `bet`, rounded down.
    ///
    /// A zero denominator pays nothing; [`GameOptions::validate`] rejects it.
    #[must_use]
    pub const fn winnings(&self, bet: usize) -> usize {
        match bet
            .saturating_mul(self.numerator as usize)
            .checked_div(self.denominator as usize)
        {
            Some(winnings) => winnings,
            None => 0,
        }
    }
}

/// Configuration options for a blackjack game.
///
/// Use the builder pattern to customize options:
///
/// ```
/// use bjengine::GameOptions;
///
/// let options = GameOptions::default()
///     .with_decks(8)
///     .with_starting_money(500)
///     .with_dealer_hits_soft_17(false);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameOptions {
    /// Number of decks in the shoe.
    pub decks: u8,
    /// The shoe is rebuilt between rounds once fewer cards than this remain.
    pub reshuffle_below: usize,
    /// Bankroll for a fresh engine and after [`crate::Game::reset_progress`].
    pub starting_money: usize,
    /// Whether the dealer draws on soft 17.
    pub dealer_hits_soft_17: bool,
    /// Maximum number of player hands, splits included.
    pub max_hands: usize,
    /// Whether insurance is offered against a dealer ace.
    pub insurance: bool,
    /// Blackjack payout ratio.
    pub blackjack_pays: PayoutRatio,
    /// Display delay between cards of the initial deal, in milliseconds.
    pub card_delay_ms: u32,
    /// Suggested pause between dealer draws, in milliseconds.
    pub dealer_draw_interval_ms: u32,
    /// Play the dealer hand to completion as soon as the player is done.
    ///
    /// When disabled the caller drives the dealer with [`crate::Game::dealer_step`].
    pub dealer_autoplay: bool,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            decks: 6,
            reshuffle_below: 50,
            starting_money: 1000,
            dealer_hits_soft_17: true,
            max_hands: MAX_HANDS,
            insurance: true,
            blackjack_pays: PayoutRatio::THREE_TO_TWO,
            card_delay_ms: 600,
            dealer_draw_interval_ms: 1000,
            dealer_autoplay: true,
        }
    }
}

impl GameOptions {
    /// Checks the options for values the engine cannot play with.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no decks, the hand limit is outside
    /// `1..=MAX_HANDS`, or the payout ratio has a zero denominator.
    pub const fn validate(&self) -> Result<(), OptionsError> {
        if self.decks == 0 {
            return Err(OptionsError::NoDecks);
        }
        if self.max_hands == 0 || self.max_hands > MAX_HANDS {
            return Err(OptionsError::MaxHands(self.max_hands));
        }
        if self.blackjack_pays.denominator == 0 {
            return Err(OptionsError::ZeroDenominator);
        }
        Ok(())
    }

    /// Returns the options with every unplayable value pulled into range.
    ///
    /// Zero decks become one, the hand limit is clamped to `1..=MAX_HANDS`
    /// and a zero-denominator payout falls back to 3:2.
    #[must_use]
    pub fn clamped(mut self) -> Self {
        self.decks = self.decks.max(1);
        self.max_hands = self.max_hands.clamp(1, MAX_HANDS);
        if self.blackjack_pays.denominator == 0 {
            self.blackjack_pays = PayoutRatio::THREE_TO_TWO;
        }
        self
    }

    /// Sets the number of decks.
    ///
    /// # Example
    ///
    /// ```
    /// use bjengine::GameOptions;
    ///
    /// let options = GameOptions::default().with_decks(2);
    /// assert_eq!(options.decks, 2);
    /// ```
    #[must_use]
    pub const fn with_decks(mut self, decks: u8) -> Self {
        self.decks = decks;
        self
    }

    /// Sets the reshuffle low-water mark.
    #[must_use]
    pub const fn with_reshuffle_below(mut self, cards: usize) -> Self {
        self.reshuffle_below = cards;
        self
    }

    /// Sets the starting bankroll.
    ///
    /// # Example
    ///
    /// ```
    /// use bjengine::GameOptions;
    ///
    /// let options = GameOptions::default().with_starting_money(250);
    /// assert_eq!(options.starting_money, 250);
    /// ```
    #[must_use]
    pub const fn with_starting_money(mut self, money: usize) -> Self {
        self.starting_money = money;
        self
    }

    /// Sets whether the dealer hits soft 17.
    #[must_use]
    pub const fn with_dealer_hits_soft_17(mut self, hits: bool) -> Self {
        self.dealer_hits_soft_17 = hits;
        self
    }

    /// Sets the maximum number of player hands.
    ///
    /// Values outside `1..=MAX_HANDS` fail [`GameOptions::validate`] and are
    /// clamped when the game is created.
    #[must_use]
    pub const fn with_max_hands(mut self, hands: usize) -> Self {
        self.max_hands = hands;
        self
    }

    /// Sets whether insurance is offered.
    #[must_use]
    pub const fn with_insurance(mut self, offered: bool) -> Self {
        self.insurance = offered;
        self
    }

    /// Sets the blackjack payout ratio.
    #[must_use]
    pub const fn with_blackjack_pays(mut self, ratio: PayoutRatio) -> Self {
        self.blackjack_pays = ratio;
        self
    }

    /// Sets the initial-deal display delay.
    #[must_use]
    pub const fn with_card_delay_ms(mut self, delay: u32) -> Self {
        self.card_delay_ms = delay;
        self
    }

    /// Sets the suggested pause between dealer draws.
    #[must_use]
    pub const fn with_dealer_draw_interval_ms(mut self, interval: u32) -> Self {
        self.dealer_draw_interval_ms = interval;
        self
    }

    /// Sets whether the dealer plays automatically.
    ///
    /// # Example
    ///
    /// ```
    /// use bjengine::GameOptions;
    ///
    /// let options = GameOptions::default().with_dealer_autoplay(false);
    /// assert!(!options.dealer_autoplay);
    /// ```
    #[must_use]
    pub const fn with_dealer_autoplay(mut self, autoplay: bool) -> Self {
        self.dealer_autoplay = autoplay;
        self
    }
}
