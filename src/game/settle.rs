use alloc::string::String;
use alloc::vec::Vec;

use crate::hand::{Hand, HandStatus};
use crate::result::{HandOutcome, HandResult, RoundResult};

use super::{Game, Phase};

impl Game {
    /// Pays out every hand and the insurance side bet, then finishes the round.
    ///
    /// Stakes were taken from the bankroll when they were placed, so a payout
    /// here always includes the returned stake.
    pub(super) fn settle(&mut self) {
        let dealer = &self.round.dealer_hand;
        let dealer_value = dealer.value();
        let dealer_bust = dealer.is_bust();
        let dealer_blackjack = dealer.is_blackjack();
        let insured = self.round.insurance.taken;

        let hands: Vec<HandResult> = self
            .round
            .player_hands
            .iter()
            .enumerate()
            .map(|(hand_index, hand)| {
                let (outcome, payout, message) =
                    self.settle_hand(hand, dealer_value, dealer_bust, dealer_blackjack);
                HandResult {
                    hand_index,
                    outcome,
                    bet: hand.bet(),
                    payout,
                    player_value: hand.value(),
                    dealer_value,
                    message: String::from(message),
                }
            })
            .collect();

        let insurance_bet = if insured {
            self.round.insurance.amount
        } else {
            0
        };
        let insurance_payout = if dealer_blackjack {
            // Stake plus 2:1
            insurance_bet.saturating_mul(3)
        } else {
            0
        };

        let total_winnings = hands
            .iter()
            .map(|h| h.payout)
            .fold(insurance_payout, usize::saturating_add);

        let staked = hands
            .iter()
            .map(|h| h.bet)
            .fold(insurance_bet, usize::saturating_add);
        #[expect(clippy::cast_possible_wrap, reason = "payout values fit in isize")]
        let net = total_winnings as isize - staked as isize;

        let result = RoundResult {
            hands,
            dealer_value,
            dealer_bust,
            dealer_blackjack,
            insurance_bet,
            insurance_payout,
            total_winnings,
            net,
        };

        self.round.money = self.round.money.saturating_add(total_winnings);
        self.round.hole_card_hidden = false;
        self.round.phase = Phase::Finished;
        log::info!(
            "round settled: dealer {dealer_value}, paid {total_winnings}, net {}, bankroll {}",
            result.net,
            self.round.money
        );
        self.round.result = Some(result);
    }

    fn settle_hand(
        &self,
        hand: &Hand,
        dealer_value: u8,
        dealer_bust: bool,
        dealer_blackjack: bool,
    ) -> (HandOutcome, usize, &'static str) {
        let bet = hand.bet();
        let player_value = hand.value();

        if hand.status() == HandStatus::Bust {
            return (HandOutcome::Lose, 0, "Bust! You lose.");
        }

        if hand.is_natural() {
            return if dealer_blackjack {
                (HandOutcome::Push, bet, "Both have blackjack - Push!")
            } else {
                let winnings = self.options.blackjack_pays.winnings(bet);
                (
                    HandOutcome::Blackjack,
                    bet.saturating_add(winnings),
                    "Blackjack! You win!",
                )
            };
        }

        if dealer_blackjack {
            let message = if self.round.insurance.taken {
                "Dealer has blackjack! Insurance pays 2:1."
            } else {
                "Dealer has blackjack!"
            };
            return (HandOutcome::Lose, 0, message);
        }

        if dealer_bust {
            (HandOutcome::Win, bet.saturating_mul(2), "Dealer busts! You win!")
        } else if player_value > dealer_value {
            (HandOutcome::Win, bet.saturating_mul(2), "You win!")
        } else if player_value < dealer_value {
            (HandOutcome::Lose, 0, "Dealer wins.")
        } else {
            (HandOutcome::Push, bet, "Push!")
        }
    }
}
