use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::config::RuleSet;
use crate::game::GameInstance;
use crate::logging;
use crate::types::{DropEvent, MoveOutcome, Piece, Position};

/// Installs the console logger and panic hook. `level` is a `log` level name.
#[wasm_bindgen]
pub fn init_logging(level: Option<String>) {
    logging::init(level.as_deref());
}

/// A game handle owned by the UI. All coordinates are `(row, col)` in 0..8;
/// anything else is rejected as an illegal move rather than thrown.
#[wasm_bindgen]
pub struct CheckersGame {
    inner: GameInstance,
}

#[wasm_bindgen]
impl CheckersGame {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            inner: GameInstance::default(),
        }
    }

    /// `rules` is a partial `RuleSet` object; `undefined` means defaults.
    pub fn with_rules(rules: JsValue) -> Result<CheckersGame, JsValue> {
        let rules = if rules.is_undefined() || rules.is_null() {
            RuleSet::default()
        } else {
            serde_wasm_bindgen::from_value::<RuleSet>(rules)?
        };
        Ok(Self {
            inner: GameInstance::new(rules),
        })
    }

    pub fn attempt_move(
        &mut self,
        from_row: u8,
        from_col: u8,
        to_row: u8,
        to_col: u8,
    ) -> Result<JsValue, JsValue> {
        let outcome = self.inner.attempt_move(
            Position::new(from_row, from_col),
            Position::new(to_row, to_col),
        );
        to_js(&outcome)
    }

    /// Like `attempt_move`, but also checks that `piece_code` (see the
    /// `board` cell codes in `state()`) is still the piece on the source square.
    pub fn drop_piece(
        &mut self,
        from_row: u8,
        from_col: u8,
        to_row: u8,
        to_col: u8,
        piece_code: u8,
    ) -> Result<JsValue, JsValue> {
        let outcome = match Piece::from_code(piece_code) {
            Ok(piece) => self.inner.handle_drop(DropEvent {
                from: Position::new(from_row, from_col),
                to: Position::new(to_row, to_col),
                piece,
            }),
            Err(reason) => MoveOutcome::RejectedIllegal { reason },
        };
        to_js(&outcome)
    }

    pub fn legal_jumps_from(&self, row: u8, col: u8) -> Result<JsValue, JsValue> {
        let targets = match Position::try_new(row, col) {
            Ok(pos) => self.inner.legal_jumps_from(pos),
            Err(_) => Vec::new(),
        };
        to_js(&targets)
    }

    /// Squares of the side to move that have a capture available.
    pub fn capture_sources(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.capture_sources())
    }

    pub fn state(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.to_game_state())
    }

    pub fn result(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.to_game_result())
    }

    pub fn reset(&mut self) {
        self.inner.reset();
    }
}

impl Default for CheckersGame {
    fn default() -> Self {
        Self::new()
    }
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(JsValue::from)
}
