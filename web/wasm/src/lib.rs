use bjengine::{
    Action, DealerStep, DealerTicket, GUEST_SAVE_KEY, Game, GameOptions, GuestSlot, MemoryStorage,
    Storage,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct WasmGame {
    game: Game,
}

/// Handle for advancing the dealer from a scheduled callback.
#[wasm_bindgen]
pub struct JsDealerTicket(DealerTicket);

#[wasm_bindgen]
impl WasmGame {
    /// With `autoplay` off, the page drives the dealer through `dealer_step`.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u32, autoplay: bool) -> Self {
        let options = GameOptions::default().with_dealer_autoplay(autoplay);
        Self {
            game: Game::new(options, u64::from(seed)),
        }
    }

    pub fn place_bet(&mut self, amount: u32) -> Result<(), JsValue> {
        self.game.place_bet(amount as usize).map_err(js_err)
    }

    pub fn hit(&mut self) -> Result<(), JsValue> {
        self.game.hit().map(|_| ()).map_err(js_err)
    }

    pub fn stand(&mut self) -> Result<(), JsValue> {
        self.game.stand().map_err(js_err)
    }

    pub fn double_down(&mut self) -> Result<(), JsValue> {
        self.game.double_down().map(|_| ()).map_err(js_err)
    }

    pub fn split(&mut self) -> Result<(), JsValue> {
        self.game.split().map_err(js_err)
    }

    pub fn take_insurance(&mut self) -> Result<u32, JsValue> {
        self.game
            .take_insurance()
            .map(|amount| amount as u32)
            .map_err(js_err)
    }

    pub fn decline_insurance(&mut self) -> Result<(), JsValue> {
        self.game.decline_insurance().map_err(js_err)
    }

    pub fn reset_for_next_round(&mut self) {
        self.game.apply(Action::ResetForNextRound);
    }

    pub fn abandon_round(&mut self) -> u32 {
        self.game.abandon_round() as u32
    }

    pub fn reset_progress(&mut self) {
        self.game.reset_progress();
    }

    pub fn add_money(&mut self, amount: u32) -> Option<u32> {
        self.game
            .add_money(amount as usize)
            .map(|money| money as u32)
    }

    pub fn can_double(&self) -> bool {
        self.game.can_double()
    }

    pub fn can_split(&self) -> bool {
        self.game.can_split()
    }

    pub fn can_take_insurance(&self) -> bool {
        self.game.can_take_insurance()
    }

    pub fn cards_remaining(&self) -> u32 {
        self.game.cards_remaining() as u32
    }

    pub fn dealer_ticket(&self) -> Option<JsDealerTicket> {
        self.game.dealer_ticket().map(JsDealerTicket)
    }

    /// Returns `true` while the dealer may need another step.
    pub fn dealer_step(&mut self, ticket: &JsDealerTicket) -> Result<bool, JsValue> {
        match self.game.dealer_step(ticket.0).map_err(js_err)? {
            DealerStep::Drew(_) => Ok(true),
            DealerStep::Settled => Ok(false),
        }
    }

    pub fn play_dealer(&mut self) -> Result<u32, JsValue> {
        self.game
            .play_dealer()
            .map(|drawn| drawn.len() as u32)
            .map_err(js_err)
    }

    /// The full round state, in the persisted snapshot shape.
    pub fn state(&self) -> Result<JsValue, JsValue> {
        to_js_value(&self.game.snapshot())
    }

    pub fn status(&self) -> Result<JsValue, JsValue> {
        let status = Status {
            can_double: self.game.can_double(),
            can_split: self.game.can_split(),
            can_take_insurance: self.game.can_take_insurance(),
            insurance_offered: self.game.is_insurance_offered(),
            cards_remaining: self.game.cards_remaining() as u32,
        };
        to_js_value(&status)
    }

    /// Encodes the round as a timestamped save for `localStorage`.
    pub fn save(&self, now_ms: f64) -> Result<String, JsValue> {
        let mut slot = GuestSlot::new(MemoryStorage::new());
        slot.save(&self.game.snapshot(), now_ms as u64)
            .map_err(js_err)?;
        slot.storage()
            .read(GUEST_SAVE_KEY)
            .map_err(js_err)?
            .ok_or_else(|| JsValue::from_str("save was not written"))
    }

    /// Restores a save written by [`WasmGame::save`].
    ///
    /// Returns `false` and keeps a fresh round when the save is missing,
    /// expired or unusable.
    pub fn load(&mut self, json: &str, now_ms: f64) -> bool {
        let mut storage = MemoryStorage::new();
        if storage.write(GUEST_SAVE_KEY, json).is_err() {
            return false;
        }

        let mut slot = GuestSlot::new(storage);
        match slot.load(now_ms as u64) {
            Some(saved) => self.game.restore(saved.snapshot).is_ok(),
            None => false,
        }
    }
}

#[derive(Serialize)]
struct Status {
    can_double: bool,
    can_split: bool,
    can_take_insurance: bool,
    insurance_offered: bool,
    cards_remaining: u32,
}

fn js_err<E: core::fmt::Display>(err: E) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn to_js_value<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|err| JsValue::from_str(&err.to_string()))
}
