//! Versioned, serializable snapshot of a round.
//!
//! Every optional field's default is declared here once, through serde
//! attributes and [`Snapshot::migrate`]. Derived values (scores) are written
//! for the benefit of readers but recomputed on restore.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use serde::{Deserialize, Deserializer, Serialize};

use crate::card::{Card, Rank};
use crate::display::DealingSequences;
use crate::error::RestoreError;
use crate::game::{InsuranceState, Phase, RoundState};
use crate::hand::{DealerHand, Hand, HandStatus};
use crate::options::MAX_HANDS;
use crate::result::RoundResult;

/// Schema version written by this crate.
pub const SNAPSHOT_VERSION: u32 = 2;

/// Per-hand flags that cannot be derived from the cards alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandFlags {
    /// Hand status.
    pub status: HandStatus,
    /// The hand came out of a split.
    pub from_split: bool,
}

/// A persisted round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Schema version; snapshots written before versioning count as 1.
    #[serde(default = "legacy_version")]
    pub version: u32,
    /// Bankroll, excluding stakes.
    pub money: usize,
    /// Cards of every player hand.
    pub player_hands: Vec<Vec<Card>>,
    /// Dealer cards, hole card included.
    pub dealer_hand: Vec<Card>,
    /// Index of the hand being acted on.
    #[serde(default)]
    pub current_hand_index: usize,
    /// Score of every player hand.
    #[serde(default)]
    pub player_scores: Vec<u8>,
    /// Score of the full dealer hand.
    #[serde(default)]
    pub dealer_score: u8,
    /// Dealer score shown to the player.
    #[serde(default)]
    pub dealer_visible_score: u8,
    /// Bet on every player hand.
    pub bets: Vec<usize>,
    /// Round phase.
    pub phase: Phase,
    /// Status and split flag of every player hand.
    #[serde(default)]
    pub hand_flags: Vec<HandFlags>,
    /// Settlement, once finished.
    #[serde(default)]
    pub results: Option<RoundResult>,
    /// Per-hand result messages, once finished.
    #[serde(default)]
    pub messages: Vec<String>,
    /// Everything credited back this round.
    #[serde(default)]
    pub total_winnings: usize,
    /// Whether the dealer's second card is face down.
    #[serde(default = "hidden_by_default")]
    pub is_dealer_second_card_hidden: bool,
    /// Display-delay hints.
    #[serde(default)]
    pub dealing_sequences: DealingSequences,
    /// Insurance sub-state. Missing or malformed blocks decode as "not offered".
    #[serde(default, deserialize_with = "lenient_insurance")]
    pub insurance: InsuranceState,
}

const fn legacy_version() -> u32 {
    1
}

const fn hidden_by_default() -> bool {
    true
}

fn lenient_insurance<'de, D>(deserializer: D) -> Result<InsuranceState, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_else(|err| {
        log::warn!("ignoring malformed insurance state: {err}");
        InsuranceState::default()
    }))
}

impl Snapshot {
    /// Captures the state of a round.
    #[must_use]
    pub fn capture(round: &RoundState) -> Self {
        let result = round.result().cloned();
        let messages = result
            .as_ref()
            .map(|r| r.hands.iter().map(|h| h.message.clone()).collect())
            .unwrap_or_default();

        Self {
            version: SNAPSHOT_VERSION,
            money: round.money(),
            player_hands: round
                .player_hands()
                .iter()
                .map(|h| h.cards().to_vec())
                .collect(),
            dealer_hand: round.dealer_hand().cards().to_vec(),
            current_hand_index: round.current_hand_index(),
            player_scores: round.player_scores().iter().map(|s| s.total).collect(),
            dealer_score: round.dealer_score().total,
            dealer_visible_score: round.dealer_visible_score().total,
            bets: round.bets(),
            phase: round.phase(),
            hand_flags: round
                .player_hands()
                .iter()
                .map(|h| HandFlags {
                    status: h.status(),
                    from_split: h.is_from_split(),
                })
                .collect(),
            total_winnings: round.total_winnings(),
            results: result,
            messages,
            is_dealer_second_card_hidden: round.is_hole_card_hidden(),
            dealing_sequences: round.dealing_sequences().clone(),
            insurance: *round.insurance(),
        }
    }

    /// Decodes and migrates a snapshot from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not match the schema or comes from a
    /// newer schema version.
    pub fn from_json(json: &str) -> Result<Self, RestoreError> {
        serde_json::from_str::<Self>(json)?.migrate()
    }

    /// Encodes the snapshot as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Upgrades an older snapshot to the current schema.
    ///
    /// Version 1 predates insurance and per-hand flags; both are filled with
    /// their declared defaults, except that a round saved while awaiting the
    /// insurance decision keeps its offer open.
    ///
    /// # Errors
    ///
    /// Returns an error for versions newer than [`SNAPSHOT_VERSION`].
    pub fn migrate(mut self) -> Result<Self, RestoreError> {
        match self.version {
            1 => {
                // A pending insurance decision was only ever saved against an ace
                let pending = self.phase == Phase::Insurance
                    && self.dealer_hand.first().is_some_and(|c| c.rank == Rank::Ace);
                self.insurance = InsuranceState {
                    offered: pending,
                    ..InsuranceState::default()
                };
                self.hand_flags.clear();
                self.version = SNAPSHOT_VERSION;
                Ok(self)
            }
            SNAPSHOT_VERSION => Ok(self),
            other => Err(RestoreError::Version(other)),
        }
    }

    /// Validates the snapshot and turns it into live round state.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot breaks a round-state invariant.
    pub fn into_state(self) -> Result<RoundState, RestoreError> {
        let snapshot = self.migrate()?;
        let hand_count = snapshot.player_hands.len();

        if hand_count == 0 || hand_count > MAX_HANDS {
            return Err(RestoreError::Invariant("player hand count out of range"));
        }
        if snapshot.bets.len() != hand_count {
            return Err(RestoreError::Invariant("one bet per hand required"));
        }
        if snapshot.current_hand_index >= hand_count {
            return Err(RestoreError::Invariant("current hand index out of range"));
        }
        if !snapshot.hand_flags.is_empty() && snapshot.hand_flags.len() != hand_count {
            return Err(RestoreError::Invariant("one flag set per hand required"));
        }

        let staked = snapshot
            .bets
            .iter()
            .try_fold(snapshot.insurance.amount, |acc, &bet| acc.checked_add(bet));
        if staked.and_then(|s| s.checked_add(snapshot.money)).is_none() {
            return Err(RestoreError::Invariant("monetary values overflow"));
        }

        let phase = snapshot.phase;
        let in_round = !matches!(phase, Phase::Betting);
        if in_round && (snapshot.dealer_hand.len() < 2 || snapshot.bets[0] == 0) {
            return Err(RestoreError::Invariant("round in progress without a deal"));
        }
        if !in_round && snapshot.bets.iter().any(|&bet| bet != 0) {
            return Err(RestoreError::Invariant("stake recorded before any bet"));
        }
        if phase == Phase::Finished && snapshot.results.is_none() {
            return Err(RestoreError::Invariant("finished round without results"));
        }

        let player_hands = snapshot
            .player_hands
            .into_iter()
            .zip(&snapshot.bets)
            .enumerate()
            .map(|(index, (cards, &bet))| {
                let flags = snapshot.hand_flags.get(index).copied().unwrap_or_else(|| {
                    default_flags(&cards, index, snapshot.current_hand_index, phase, hand_count)
                });
                Hand::from_parts(cards, bet, flags.from_split, flags.status)
            })
            .collect::<Vec<_>>();

        if phase == Phase::Playing
            && player_hands[snapshot.current_hand_index].status() != HandStatus::Active
        {
            return Err(RestoreError::Invariant("current hand is already finished"));
        }

        let mut insurance = snapshot.insurance;
        if !insurance_is_consistent(&insurance, snapshot.bets[0], phase) {
            log::warn!("resetting inconsistent insurance state");
            insurance = InsuranceState::default();
        }

        let mut sequences = snapshot.dealing_sequences;
        sequences.player.resize_with(hand_count, Vec::new);

        let mut round = RoundState::new(snapshot.money);
        round.phase = phase;
        round.player_hands = player_hands;
        round.dealer_hand = DealerHand::from_cards(snapshot.dealer_hand);
        round.current_hand = snapshot.current_hand_index;
        round.insurance = insurance;
        round.result = snapshot.results;
        round.hole_card_hidden = snapshot.is_dealer_second_card_hidden;
        round.sequences = sequences;
        Ok(round)
    }
}

/// Flags for hands saved before flags were persisted.
fn default_flags(
    cards: &[Card],
    index: usize,
    current: usize,
    phase: Phase,
    hand_count: usize,
) -> HandFlags {
    let status = if crate::score::is_bust(cards) {
        HandStatus::Bust
    } else if index < current || matches!(phase, Phase::Dealer | Phase::Finished) {
        HandStatus::Stood
    } else {
        HandStatus::Active
    };

    HandFlags {
        status,
        from_split: hand_count > 1,
    }
}

fn insurance_is_consistent(insurance: &InsuranceState, bet: usize, phase: Phase) -> bool {
    if insurance.taken && !insurance.offered {
        return false;
    }
    if insurance.taken && insurance.amount != bet / 2 {
        return false;
    }
    if !insurance.taken && (insurance.amount != 0 || insurance.result.is_some()) {
        return false;
    }
    // A pending decision cannot have been made yet
    !(phase == Phase::Insurance && insurance.taken)
}
