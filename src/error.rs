use serde::Serialize;
use thiserror::Error;

use crate::types::{Position, Side};

/// Why a move was not applied.
///
/// None of these are fatal: the engine reports them through
/// [`MoveOutcome`](crate::types::MoveOutcome) and leaves the board untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum MoveError {
    #[error("square ({row}, {col}) is off the board")]
    OffBoard { row: u8, col: u8 },
    #[error("no piece at {at}")]
    EmptySource { at: Position },
    #[error("unknown piece code {piece_code}")]
    UnknownPiece { piece_code: u8 },
    #[error("dragged piece does not match the piece at {at}")]
    PieceMismatch { at: Position },
    #[error("it is not {side}'s turn")]
    WrongTurn { side: Side },
    #[error("move is not diagonal")]
    NotDiagonal,
    #[error("move is longer than a jump")]
    TooFar,
    #[error("piece did not move")]
    Stationary,
    #[error("destination {at} is occupied")]
    Occupied { at: Position },
    #[error("nothing to capture at {at}")]
    NothingToCapture { at: Position },
    #[error("cannot capture own piece at {at}")]
    OwnPiece { at: Position },
    #[error("move is not a jump")]
    NotAJump,
    #[error("men may only move forward")]
    Backward,
    #[error("a capture is available from {from}")]
    MustJump {
        from: Position,
        targets: Vec<Position>,
    },
}
