//! Game integration tests.

use std::cell::Cell;
use std::rc::Rc;

use bjengine::{
    Action, ActionError, BetError, Card, DealerError, DealerStep, Game, GameOptions, Hand,
    HandOutcome, HandStatus, InsuranceError, InsuranceResult, MAX_HANDS, Phase, Rank, Shoe, Suit,
};

/// Builds cards in draw order, giving each a distinct id.
fn cards(ranks: &[Rank]) -> Vec<Card> {
    ranks
        .iter()
        .enumerate()
        .map(|(i, &rank)| Card::new(Suit::ALL[i % 4], rank, 10_000 + i as u32))
        .collect()
}

fn stacked_game(options: GameOptions, money: usize, draws: &[Rank]) -> Game {
    let mut game = Game::with_money(options, 1, money);
    game.replace_shoe(Shoe::stacked(&cards(draws)));
    game
}

#[test]
fn hand_bust_and_split_behavior() {
    let mut hand = Hand::new(10);
    for card in cards(&[Rank::Ace, Rank::King]) {
        hand.add_card(card);
    }
    assert_eq!(hand.value(), 21);
    assert!(hand.score().is_soft);
    assert!(hand.is_natural());
    assert_eq!(hand.status(), HandStatus::Active);

    let split = cards(&[Rank::Ace, Rank::King]);
    let mut split_hand = Hand::from_split(split[0], 10);
    split_hand.add_card(split[1]);
    assert_eq!(split_hand.value(), 21);
    assert!(!split_hand.is_natural());

    let mut bust_hand = Hand::new(5);
    for card in cards(&[Rank::Ten, Rank::Ten, Rank::Two]) {
        bust_hand.add_card(card);
    }
    assert_eq!(bust_hand.status(), HandStatus::Bust);
}

#[test]
fn options_builder_sets_fields() {
    let options = GameOptions::default()
        .with_decks(4)
        .with_reshuffle_below(20)
        .with_starting_money(500)
        .with_dealer_hits_soft_17(false)
        .with_max_hands(2)
        .with_insurance(false)
        .with_dealer_autoplay(false);

    assert_eq!(options.decks, 4);
    assert_eq!(options.reshuffle_below, 20);
    assert_eq!(options.starting_money, 500);
    assert!(!options.dealer_hits_soft_17);
    assert_eq!(options.max_hands, 2);
    assert!(!options.insurance);
    assert!(!options.dealer_autoplay);
    assert!(options.validate().is_ok());
    assert!(GameOptions::default().with_decks(0).validate().is_err());
}

#[test]
fn fresh_game_has_full_shoe() {
    let game = Game::new(GameOptions::default(), 7);
    assert_eq!(game.cards_remaining(), 312);
    assert_eq!(game.phase(), Phase::Betting);
    assert_eq!(game.state().money(), 1000);
    assert_eq!(game.state().bets(), vec![0]);
}

#[test]
fn bet_errors() {
    let mut game = stacked_game(GameOptions::default(), 1000, &[Rank::Ten, Rank::Six]);

    assert_eq!(game.place_bet(0).unwrap_err(), BetError::ZeroBet);
    assert_eq!(game.place_bet(2000).unwrap_err(), BetError::InsufficientFunds);
    assert_eq!(game.place_bet(100).unwrap_err(), BetError::ShoeExhausted);
    assert_eq!(game.state().money(), 1000);
    assert_eq!(game.phase(), Phase::Betting);
}

#[test]
fn oversized_bet_command_is_ignored() {
    let mut game = Game::new(GameOptions::default(), 3);
    let before = game.state().clone();

    game.apply(Action::PlaceBet(2000));
    assert_eq!(game.state(), &before);

    game.apply(Action::Hit);
    assert_eq!(game.state(), &before);
}

#[test]
fn losing_round_end_to_end() {
    let mut game = stacked_game(
        GameOptions::default(),
        1000,
        &[Rank::Ten, Rank::Six, Rank::Nine, Rank::Ten, Rank::Five],
    );

    game.apply(Action::PlaceBet(100));
    assert_eq!(game.phase(), Phase::Playing);
    assert_eq!(game.state().money(), 900);
    assert!(game.state().is_hole_card_hidden());
    assert_eq!(game.state().dealer_visible_score().total, 6);

    game.apply(Action::Stand);
    assert_eq!(game.phase(), Phase::Finished);
    assert_eq!(game.state().dealer_hand().value(), 21);

    let result = game.state().result().unwrap();
    assert_eq!(result.primary_outcome(), Some(HandOutcome::Lose));
    assert_eq!(result.net, -100);
    assert_eq!(game.state().money(), 900);
}

#[test]
fn player_natural_pays_three_to_two() {
    let mut game = stacked_game(
        GameOptions::default(),
        1000,
        &[Rank::Ace, Rank::Ten, Rank::King, Rank::Seven],
    );

    game.place_bet(100).unwrap();
    assert_eq!(game.phase(), Phase::Finished);
    assert!(!game.state().is_hole_card_hidden());

    let result = game.state().result().unwrap();
    assert_eq!(result.hands[0].outcome, HandOutcome::Blackjack);
    assert_eq!(result.hands[0].payout, 250);
    assert_eq!(game.state().money(), 1150);
}

#[test]
fn odd_blackjack_payout_rounds_down() {
    let mut game = stacked_game(
        GameOptions::default(),
        1000,
        &[Rank::Ace, Rank::Ten, Rank::Queen, Rank::Eight],
    );

    game.place_bet(5).unwrap();
    assert_eq!(game.state().result().unwrap().hands[0].payout, 12);
    assert_eq!(game.state().money(), 1007);
}

#[test]
fn double_down_doubles_bet_and_advances() {
    let options = GameOptions::default().with_dealer_autoplay(false);
    let mut game = stacked_game(
        options,
        500,
        &[Rank::Ten, Rank::Nine, Rank::Seven, Rank::Eight, Rank::Two],
    );

    game.place_bet(50).unwrap();
    assert!(game.can_double());

    let card = game.double_down().unwrap();
    assert_eq!(card.rank, Rank::Two);

    let hand = &game.state().player_hands()[0];
    assert_eq!(hand.bet(), 100);
    assert_eq!(hand.len(), 3);
    assert_eq!(hand.status(), HandStatus::Doubled);
    assert_eq!(game.state().money(), 400);
    assert_eq!(game.phase(), Phase::Dealer);
    assert!(!game.state().is_hole_card_hidden());

    // Dealer stands on hard 17, player 19 wins
    game.play_dealer().unwrap();
    assert_eq!(game.state().money(), 600);
}

#[test]
fn double_requires_two_cards_and_funds() {
    let mut game = stacked_game(
        GameOptions::default(),
        100,
        &[Rank::Five, Rank::Nine, Rank::Four, Rank::Eight, Rank::Two],
    );

    game.place_bet(60).unwrap();
    assert_eq!(game.double_down().unwrap_err(), ActionError::InsufficientFunds);

    game.hit().unwrap();
    assert_eq!(game.double_down().unwrap_err(), ActionError::CannotDouble);
    assert_eq!(game.state().money(), 40);
}

#[test]
fn split_creates_two_hands() {
    let mut game = stacked_game(
        GameOptions::default(),
        1000,
        &[
            Rank::Eight,
            Rank::Ten,
            Rank::Eight,
            Rank::Seven,
            Rank::Three,
            Rank::Five,
        ],
    );

    game.place_bet(100).unwrap();
    assert!(game.can_split());
    game.split().unwrap();

    let hands = game.state().player_hands();
    assert_eq!(hands.len(), 2);
    assert!(hands.iter().all(|h| h.len() == 2 && h.bet() == 100));
    assert!(hands.iter().all(Hand::is_from_split));
    assert_eq!(hands[0].value(), 11);
    assert_eq!(hands[1].value(), 13);
    assert_eq!(game.state().money(), 800);
    assert_eq!(game.state().current_hand_index(), 0);
    assert_eq!(game.state().dealing_sequences().player.len(), 2);
}

#[test]
fn ten_valued_cards_split_together() {
    let mut game = stacked_game(
        GameOptions::default(),
        1000,
        &[Rank::King, Rank::Nine, Rank::Queen, Rank::Seven, Rank::Two, Rank::Three],
    );

    game.place_bet(10).unwrap();
    assert!(game.can_split());
    game.split().unwrap();
    assert_eq!(game.state().player_hands().len(), 2);
}

#[test]
fn split_limit_is_enforced() {
    let options = GameOptions::default().with_max_hands(1);
    let mut game = stacked_game(
        options,
        1000,
        &[Rank::Eight, Rank::Ten, Rank::Eight, Rank::Seven, Rank::Three],
    );

    game.place_bet(100).unwrap();
    assert_eq!(game.split().unwrap_err(), ActionError::MaxHandsReached);
}

/// Eights on every split draw for the first hand, so it can be split again.
const RESPLIT_EIGHTS: &[Rank] = &[
    Rank::Eight,
    Rank::Ten,
    Rank::Eight,
    Rank::Seven,
    Rank::Eight,
    Rank::Three,
    Rank::Eight,
    Rank::Four,
    Rank::Eight,
    Rank::Five,
    Rank::Eight,
    Rank::Six,
];

#[test]
fn resplitting_stops_at_four_hands() {
    let mut game = stacked_game(GameOptions::default(), 1000, RESPLIT_EIGHTS);

    game.place_bet(100).unwrap();
    for _ in 0..3 {
        game.split().unwrap();
    }
    assert_eq!(game.state().player_hands().len(), MAX_HANDS);
    assert!(game.state().player_hands()[0].can_split());
    assert_eq!(game.state().money(), 600);

    let before = game.state().clone();
    assert!(!game.can_split());
    assert_eq!(game.split().unwrap_err(), ActionError::MaxHandsReached);
    assert_eq!(game.state(), &before);
    assert_eq!(game.cards_remaining(), 2);
}

#[test]
fn oversized_hand_limit_is_clamped() {
    let options = GameOptions::default().with_max_hands(8);
    assert!(options.validate().is_err());

    let mut game = stacked_game(options, 1000, RESPLIT_EIGHTS);
    assert_eq!(game.options.max_hands, MAX_HANDS);

    // Raising the limit after construction still cannot exceed four hands
    game.options.max_hands = 8;
    game.place_bet(100).unwrap();
    for _ in 0..3 {
        game.split().unwrap();
    }
    assert_eq!(game.split().unwrap_err(), ActionError::MaxHandsReached);
    assert_eq!(game.state().player_hands().len(), MAX_HANDS);
    assert_eq!(game.state().money(), 600);

    let mut restored = Game::new(GameOptions::default(), 2);
    restored.restore(game.snapshot()).unwrap();
    assert_eq!(restored.state(), game.state());
}

#[test]
fn split_hands_play_in_order() {
    let options = GameOptions::default().with_dealer_autoplay(false);
    let mut game = stacked_game(
        options,
        1000,
        &[
            Rank::Eight,
            Rank::Ten,
            Rank::Eight,
            Rank::Seven,
            Rank::Ten,
            Rank::Nine,
        ],
    );

    game.place_bet(100).unwrap();
    game.split().unwrap();
    game.stand().unwrap();
    assert_eq!(game.state().current_hand_index(), 1);
    assert_eq!(game.phase(), Phase::Playing);

    game.stand().unwrap();
    assert_eq!(game.phase(), Phase::Dealer);

    game.play_dealer().unwrap();
    let result = game.state().result().unwrap();
    assert_eq!(result.hands.len(), 2);
    assert_eq!(result.hands[0].outcome, HandOutcome::Win);
    assert_eq!(result.hands[1].outcome, HandOutcome::Push);
    assert_eq!(result.total_staked(), 200);
    assert_eq!(game.state().money(), 800 + 200 + 100);
}

#[test]
fn all_hands_bust_skips_dealer_draw() {
    let mut game = stacked_game(
        GameOptions::default(),
        1000,
        &[Rank::Ten, Rank::Nine, Rank::Six, Rank::Seven, Rank::King, Rank::Two],
    );

    game.place_bet(100).unwrap();
    game.hit().unwrap();

    assert_eq!(game.phase(), Phase::Finished);
    assert_eq!(game.state().dealer_hand().len(), 2);
    assert_eq!(game.cards_remaining(), 1);
    assert_eq!(game.state().money(), 900);
}

#[test]
fn twenty_one_after_hit_waits_for_stand() {
    let mut game = stacked_game(
        GameOptions::default(),
        1000,
        &[Rank::Five, Rank::Nine, Rank::Six, Rank::Eight, Rank::Ten],
    );

    game.place_bet(10).unwrap();
    game.hit().unwrap();
    assert_eq!(game.state().player_hands()[0].value(), 21);
    assert_eq!(game.phase(), Phase::Playing);
}

#[test]
fn insurance_pays_against_dealer_blackjack() {
    let mut game = stacked_game(
        GameOptions::default(),
        1000,
        &[Rank::Ten, Rank::Ace, Rank::Nine, Rank::King],
    );

    game.place_bet(100).unwrap();
    assert_eq!(game.phase(), Phase::Insurance);
    assert!(game.is_insurance_offered());
    assert_eq!(game.state().money(), 900);

    assert_eq!(game.take_insurance().unwrap(), 50);
    assert_eq!(game.phase(), Phase::Finished);

    let insurance = game.state().insurance();
    assert!(insurance.taken);
    assert_eq!(insurance.result, Some(InsuranceResult::Win));

    let result = game.state().result().unwrap();
    assert_eq!(result.insurance_payout, 150);
    assert_eq!(result.primary_outcome(), Some(HandOutcome::Lose));
    assert_eq!(game.state().money(), 1000);
}

#[test]
fn lost_insurance_continues_play() {
    let mut game = stacked_game(
        GameOptions::default(),
        1000,
        &[Rank::Ten, Rank::Ace, Rank::Nine, Rank::Nine],
    );

    game.place_bet(100).unwrap();
    game.take_insurance().unwrap();

    assert_eq!(game.phase(), Phase::Playing);
    assert_eq!(game.state().insurance().result, Some(InsuranceResult::Lose));
    assert_eq!(game.state().money(), 850);
    assert_eq!(game.take_insurance().unwrap_err(), InsuranceError::InvalidState);
}

#[test]
fn declined_insurance_against_blackjack_loses() {
    let mut game = stacked_game(
        GameOptions::default(),
        1000,
        &[Rank::Ten, Rank::Ace, Rank::Nine, Rank::Queen],
    );

    game.place_bet(100).unwrap();
    game.decline_insurance().unwrap();

    assert_eq!(game.phase(), Phase::Finished);
    assert!(!game.state().insurance().taken);
    assert_eq!(game.state().money(), 900);
}

#[test]
fn blackjack_against_blackjack_with_insurance() {
    let mut game = stacked_game(
        GameOptions::default(),
        1000,
        &[Rank::Ace, Rank::Ace, Rank::King, Rank::Jack],
    );

    game.place_bet(100).unwrap();
    game.take_insurance().unwrap();

    let result = game.state().result().unwrap();
    assert_eq!(result.hands[0].outcome, HandOutcome::Push);
    assert_eq!(game.state().money(), 850 + 100 + 150);
}

#[test]
fn insurance_can_be_disabled() {
    let options = GameOptions::default().with_insurance(false);
    let mut game = stacked_game(
        options,
        1000,
        &[Rank::Ten, Rank::Ace, Rank::Nine, Rank::Six],
    );

    game.place_bet(100).unwrap();
    assert_eq!(game.phase(), Phase::Playing);
    assert!(!game.state().insurance().offered);
}

#[test]
fn insurance_needs_funds() {
    let mut game = stacked_game(
        GameOptions::default(),
        100,
        &[Rank::Ten, Rank::Ace, Rank::Nine, Rank::Six],
    );

    game.place_bet(100).unwrap();
    assert!(!game.can_take_insurance());
    assert_eq!(
        game.take_insurance().unwrap_err(),
        InsuranceError::InsufficientFunds
    );
    assert_eq!(game.phase(), Phase::Insurance);
}

#[test]
fn dealer_steps_one_card_at_a_time() {
    let options = GameOptions::default().with_dealer_autoplay(false);
    let mut game = stacked_game(
        options,
        1000,
        &[Rank::Ten, Rank::Ten, Rank::Eight, Rank::Four, Rank::Two, Rank::Five],
    );

    game.place_bet(100).unwrap();
    game.stand().unwrap();
    let ticket = game.dealer_ticket().unwrap();

    assert!(matches!(game.dealer_step(ticket), Ok(DealerStep::Drew(_))));
    assert!(matches!(game.dealer_step(ticket), Ok(DealerStep::Drew(_))));
    assert_eq!(game.dealer_step(ticket).unwrap(), DealerStep::Settled);
    assert_eq!(game.state().dealer_hand().value(), 21);
    assert_eq!(game.dealer_step(ticket).unwrap_err(), DealerError::InvalidState);
}

#[test]
fn dealer_hits_soft_seventeen_when_configured() {
    let draws = [Rank::Ten, Rank::Ace, Rank::Eight, Rank::Six, Rank::Two];

    let mut hits = stacked_game(
        GameOptions::default().with_insurance(false),
        1000,
        &draws,
    );
    hits.place_bet(10).unwrap();
    hits.stand().unwrap();
    assert_eq!(hits.state().dealer_hand().len(), 3);

    let mut stands = stacked_game(
        GameOptions::default()
            .with_insurance(false)
            .with_dealer_hits_soft_17(false),
        1000,
        &draws,
    );
    stands.place_bet(10).unwrap();
    stands.stand().unwrap();
    assert_eq!(stands.state().dealer_hand().len(), 2);
}

#[test]
fn stale_dealer_ticket_is_refused() {
    let options = GameOptions::default().with_dealer_autoplay(false);
    let mut game = stacked_game(
        options,
        1000,
        &[Rank::Ten, Rank::Ten, Rank::Eight, Rank::Six, Rank::Five],
    );

    game.place_bet(100).unwrap();
    game.stand().unwrap();
    let ticket = game.dealer_ticket().unwrap();

    assert_eq!(game.abandon_round(), 100);
    assert_eq!(game.state().money(), 1000);
    assert_eq!(game.dealer_step(ticket).unwrap_err(), DealerError::StaleTicket);
    assert_eq!(game.phase(), Phase::Betting);
}

#[test]
fn reset_only_after_finish() {
    let mut game = stacked_game(
        GameOptions::default(),
        1000,
        &[Rank::Ten, Rank::Six, Rank::Nine, Rank::Ten, Rank::Five],
    );

    assert_eq!(
        game.reset_for_next_round().unwrap_err(),
        ActionError::InvalidState
    );

    game.place_bet(100).unwrap();
    game.stand().unwrap();
    game.reset_for_next_round().unwrap();

    assert_eq!(game.phase(), Phase::Betting);
    assert_eq!(game.state().money(), 900);
    assert_eq!(game.state().bets(), vec![0]);
    assert!(game.state().result().is_none());
    assert!(game.state().dealer_hand().is_empty());
}

#[test]
fn low_shoe_is_rebuilt_between_rounds() {
    let mut game = stacked_game(
        GameOptions::default(),
        1000,
        &[Rank::Ten, Rank::Six, Rank::Nine, Rank::Ten, Rank::Five, Rank::Two],
    );

    game.place_bet(100).unwrap();
    game.stand().unwrap();
    assert_eq!(game.cards_remaining(), 1);

    game.reset_for_next_round().unwrap();
    assert_eq!(game.cards_remaining(), 312);
}

#[test]
fn exhausted_shoe_leaves_state_untouched() {
    let mut game = stacked_game(
        GameOptions::default(),
        1000,
        &[Rank::Ten, Rank::Six, Rank::Four, Rank::Ten],
    );

    game.place_bet(100).unwrap();
    let before = game.state().clone();

    assert_eq!(game.hit().unwrap_err(), ActionError::ShoeExhausted);
    assert_eq!(game.state(), &before);

    assert_eq!(game.abandon_round(), 100);
    assert_eq!(game.state().money(), 1000);
    assert_eq!(game.cards_remaining(), 312);
}

#[test]
fn add_money_credits_bankroll() {
    let mut game = Game::new(GameOptions::default(), 1);

    assert_eq!(game.add_money(500), Some(1500));
    assert_eq!(game.add_money(0), None);
    game.apply(Action::AddMoney(usize::MAX));
    assert_eq!(game.state().money(), 1500);
}

#[test]
fn reset_progress_restores_starting_money() {
    let mut game = Game::with_money(GameOptions::default(), 1, 20);
    game.reset_progress();
    assert_eq!(game.state().money(), 1000);
    assert_eq!(game.cards_remaining(), 312);
}

#[test]
fn observer_is_notified_on_changes_only() {
    let count = Rc::new(Cell::new(0));
    let mut game = stacked_game(
        GameOptions::default(),
        1000,
        &[Rank::Ten, Rank::Six, Rank::Nine, Rank::Ten, Rank::Five],
    );
    let seen = Rc::clone(&count);
    game.set_observer(move || seen.set(seen.get() + 1));

    game.apply(Action::PlaceBet(5000));
    assert_eq!(count.get(), 0);

    game.apply(Action::PlaceBet(100));
    assert_eq!(count.get(), 1);

    game.apply(Action::Stand);
    assert_eq!(count.get(), 2);
    assert_eq!(game.phase(), Phase::Finished);
}

#[test]
fn same_seed_same_shoe() {
    let mut a = Game::new(GameOptions::default(), 99);
    let mut b = Game::new(GameOptions::default(), 99);

    a.place_bet(10).unwrap();
    b.place_bet(10).unwrap();
    assert_eq!(a.state(), b.state());
}
