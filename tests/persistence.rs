//! Snapshot and save-slot integration tests.

use bjengine::{
    Card, Game, GameOptions, GuestSlot, HandStatus, InsuranceState, MemoryStorage, Phase, Rank,
    RestoreError, SAVE_TTL_MS, SNAPSHOT_VERSION, Shoe, Snapshot, Suit,
};

fn cards(ranks: &[Rank]) -> Vec<Card> {
    ranks
        .iter()
        .enumerate()
        .map(|(i, &rank)| Card::new(Suit::ALL[i % 4], rank, 20_000 + i as u32))
        .collect()
}

fn stacked_game(options: GameOptions, draws: &[Rank]) -> Game {
    let mut game = Game::new(options, 5);
    game.replace_shoe(Shoe::stacked(&cards(draws)));
    game
}

const LEGACY_SAVE: &str = r#"{
    "money": 900,
    "playerHands": [[
        {"suit": "hearts", "rank": "10", "id": 1},
        {"suit": "spades", "rank": "7", "id": 3}
    ]],
    "dealerHand": [
        {"suit": "clubs", "rank": "9", "id": 2},
        {"suit": "diamonds", "rank": "8", "id": 4}
    ],
    "currentHandIndex": 0,
    "bets": [100],
    "phase": "playing"
}"#;

#[test]
fn snapshot_uses_camel_case_keys() {
    let game = Game::new(GameOptions::default(), 1);
    let json = game.snapshot().to_json().unwrap();

    assert!(json.contains("\"playerHands\""));
    assert!(json.contains("\"isDealerSecondCardHidden\":true"));
    assert!(json.contains("\"phase\":\"betting\""));
    assert!(json.contains(&format!("\"version\":{SNAPSHOT_VERSION}")));
}

#[test]
fn mid_round_snapshot_restores_identically() {
    let mut game = stacked_game(
        GameOptions::default(),
        &[Rank::Eight, Rank::Ten, Rank::Eight, Rank::Seven, Rank::Three, Rank::Five],
    );
    game.place_bet(100).unwrap();
    game.split().unwrap();

    let json = game.snapshot().to_json().unwrap();
    let mut restored = Game::new(GameOptions::default(), 77);
    restored.restore_json(&json).unwrap();

    assert_eq!(restored.state(), game.state());
    assert_eq!(restored.phase(), Phase::Playing);
    assert!(restored.state().player_hands()[1].is_from_split());

    // Play continues on the restored engine with a fresh shoe
    restored.stand().unwrap();
    assert_eq!(restored.state().current_hand_index(), 1);
}

#[test]
fn insurance_offer_survives_restore() {
    let mut game = stacked_game(
        GameOptions::default(),
        &[Rank::Ten, Rank::Ace, Rank::Nine, Rank::King],
    );
    game.place_bet(100).unwrap();
    assert_eq!(game.phase(), Phase::Insurance);

    let snapshot = game.snapshot();
    let mut restored = Game::new(GameOptions::default(), 2);
    restored.restore(snapshot).unwrap();

    assert_eq!(restored.phase(), Phase::Insurance);
    assert!(restored.state().insurance().offered);
    assert_eq!(restored.take_insurance().unwrap(), 50);
    assert_eq!(restored.phase(), Phase::Finished);
    assert_eq!(restored.state().money(), 1000);
}

#[test]
fn finished_round_round_trips_results() {
    let mut game = stacked_game(
        GameOptions::default(),
        &[Rank::Ace, Rank::Ten, Rank::King, Rank::Seven],
    );
    game.place_bet(100).unwrap();

    let snapshot = Snapshot::from_json(&game.snapshot().to_json().unwrap()).unwrap();
    assert_eq!(snapshot.messages.len(), 1);
    assert_eq!(snapshot.total_winnings, 250);

    let mut restored = Game::new(GameOptions::default(), 3);
    restored.restore(snapshot).unwrap();
    assert_eq!(restored.state().result(), game.state().result());
    restored.reset_for_next_round().unwrap();
    assert_eq!(restored.state().money(), 1150);
}

#[test]
fn legacy_save_without_insurance_restores() {
    let mut game = Game::new(GameOptions::default(), 4);
    game.restore_json(LEGACY_SAVE).unwrap();

    let state = game.state();
    assert_eq!(state.phase(), Phase::Playing);
    assert_eq!(state.insurance(), &InsuranceState::default());
    assert_eq!(state.player_hands()[0].status(), HandStatus::Active);
    assert!(!state.player_hands()[0].is_from_split());
    assert!(state.is_hole_card_hidden());

    // Restored card ids stay unique against the new shoe
    game.stand().unwrap();
    assert_eq!(game.phase(), Phase::Finished);
    assert_eq!(game.state().money(), 1000);
}

#[test]
fn malformed_insurance_block_falls_back_to_default() {
    let json = LEGACY_SAVE.replacen(
        "\"phase\": \"playing\"",
        "\"phase\": \"playing\", \"version\": 2, \"insurance\": \"yes\"",
        1,
    );
    let snapshot = Snapshot::from_json(&json).unwrap();
    assert_eq!(snapshot.insurance, InsuranceState::default());
}

#[test]
fn corrupt_save_starts_fresh_round() {
    let mut game = Game::with_money(GameOptions::default(), 1, 50);

    let err = game.restore_json("{\"money\": ").unwrap_err();
    assert!(matches!(err, RestoreError::Parse(_)));
    assert_eq!(game.phase(), Phase::Betting);
    assert_eq!(game.state().money(), 1000);
}

#[test]
fn inconsistent_snapshot_is_rejected() {
    let json = LEGACY_SAVE.replacen("\"bets\": [100]", "\"bets\": [100, 100]", 1);
    let mut game = Game::new(GameOptions::default(), 1);

    let err = game.restore_json(&json).unwrap_err();
    assert!(matches!(err, RestoreError::Invariant(_)));
    assert_eq!(game.phase(), Phase::Betting);
}

#[test]
fn four_hand_round_survives_save_and_restore() {
    let mut game = stacked_game(
        GameOptions::default(),
        &[
            Rank::Nine,
            Rank::Ten,
            Rank::Nine,
            Rank::Seven,
            Rank::Nine,
            Rank::Two,
            Rank::Nine,
            Rank::Three,
            Rank::Nine,
            Rank::Four,
        ],
    );
    game.place_bet(50).unwrap();
    for _ in 0..3 {
        game.split().unwrap();
    }
    assert_eq!(game.state().player_hands().len(), 4);

    let json = game.snapshot().to_json().unwrap();
    let mut restored = Game::new(GameOptions::default(), 31);
    restored.restore_json(&json).unwrap();

    assert_eq!(restored.state(), game.state());
    assert_eq!(restored.state().money(), 800);
    assert_eq!(restored.state().staked(), 200);
}

#[test]
fn betting_snapshot_with_stake_is_rejected() {
    let mut snapshot = Game::new(GameOptions::default(), 1).snapshot();
    snapshot.bets = vec![100];

    let mut game = Game::with_money(GameOptions::default(), 1, 400);
    let err = game.restore(snapshot).unwrap_err();
    assert!(matches!(err, RestoreError::Invariant(_)));
    assert_eq!(game.state().money(), 1000);
    assert_eq!(game.state().bets(), vec![0]);
}

#[test]
fn rejected_json_rebuilds_the_shoe() {
    let mut game = stacked_game(GameOptions::default(), &[Rank::Ten, Rank::Six]);
    assert_eq!(game.cards_remaining(), 2);

    assert!(game.restore_json("not json").is_err());
    assert_eq!(game.cards_remaining(), 312);

    let mut other = stacked_game(GameOptions::default(), &[Rank::Ten, Rank::Six]);
    let mut snapshot = other.snapshot();
    snapshot.current_hand_index = 3;
    assert!(other.restore(snapshot).is_err());
    assert_eq!(other.cards_remaining(), 312);
}

#[test]
fn legacy_save_awaiting_insurance_keeps_the_offer() {
    let json = LEGACY_SAVE
        .replacen("\"rank\": \"9\"", "\"rank\": \"A\"", 1)
        .replacen("\"phase\": \"playing\"", "\"phase\": \"insurance\"", 1);
    let mut game = Game::new(GameOptions::default(), 4);
    game.restore_json(&json).unwrap();

    assert_eq!(game.phase(), Phase::Insurance);
    assert!(game.state().insurance().offered);
    assert_eq!(game.take_insurance().unwrap(), 50);
    assert_eq!(game.state().money(), 850);
}

#[test]
fn newer_version_is_rejected() {
    let json = LEGACY_SAVE.replacen("\"money\": 900", "\"money\": 900, \"version\": 99", 1);
    assert!(matches!(
        Snapshot::from_json(&json),
        Err(RestoreError::Version(99))
    ));
}

#[test]
fn interrupted_deal_resumes_on_restore() {
    let mut game = stacked_game(
        GameOptions::default(),
        &[Rank::Ten, Rank::Six, Rank::Nine, Rank::Ten],
    );
    game.place_bet(100).unwrap();

    let mut snapshot = game.snapshot();
    snapshot.phase = Phase::Dealing;

    let mut restored = Game::new(GameOptions::default(), 9);
    restored.restore(snapshot).unwrap();
    assert_eq!(restored.phase(), Phase::Playing);
}

#[test]
fn guest_slot_round_trip_and_expiry() {
    let mut game = stacked_game(
        GameOptions::default(),
        &[Rank::Ten, Rank::Six, Rank::Nine, Rank::Ten],
    );
    game.place_bet(100).unwrap();

    let mut slot = GuestSlot::new(MemoryStorage::new());
    slot.save(&game.snapshot(), 0).unwrap();
    assert!(slot.has_progress(SAVE_TTL_MS));

    let saved = slot.load(1).unwrap();
    let mut restored = Game::new(GameOptions::default(), 6);
    restored.restore(saved.snapshot).unwrap();
    assert_eq!(restored.state(), game.state());

    assert!(slot.load(SAVE_TTL_MS + 1).is_none());
    assert!(!slot.has_progress(0));
}
