use wasm_bindgen::prelude::*;

pub mod bindings;
pub mod board;
pub mod config;
pub mod error;
pub mod game;
pub mod logging;
pub mod types;

pub use bindings::CheckersGame;
pub use board::Board;
pub use config::RuleSet;
pub use error::MoveError;
pub use game::GameInstance;
pub use types::{
    DropEvent, GameResult, GameState, Move, MoveEffect, MoveKind, MoveOutcome, Piece, Position,
    Rank, Side,
};

#[wasm_bindgen]
pub fn wasm_ready() -> bool {
    true
}
