use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::MoveError;

pub const BOARD_WIDTH: u8 = 8;

/// One of the two players.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Starts on rows 5..=7 and moves first.
    #[default]
    Light,
    /// Starts on rows 0..=2.
    Dark,
}

impl Side {
    pub const fn opponent(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Row on which a man of this side is crowned.
    pub const fn promotion_row(self) -> u8 {
        match self {
            Self::Light => 0,
            Self::Dark => BOARD_WIDTH - 1,
        }
    }

    /// Row delta of a forward move.
    pub const fn forward(self) -> i8 {
        match self {
            Self::Light => -1,
            Self::Dark => 1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Light => f.write_str("light"),
            Self::Dark => f.write_str("dark"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rank {
    Man,
    King,
}

/// A checkers piece. Pieces are values: promotion yields a new piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub side: Side,
    pub rank: Rank,
}

impl Piece {
    pub const fn man(side: Side) -> Self {
        Self {
            side,
            rank: Rank::Man,
        }
    }

    pub const fn king(side: Side) -> Self {
        Self {
            side,
            rank: Rank::King,
        }
    }

    pub const fn is_king(self) -> bool {
        matches!(self.rank, Rank::King)
    }

    pub const fn crowned(self) -> Self {
        Self::king(self.side)
    }

    /// Cell code used by the renderer:
    /// 1=light man, 2=light king, 3=dark man, 4=dark king.
    pub const fn code(self) -> u8 {
        match (self.side, self.rank) {
            (Side::Light, Rank::Man) => 1,
            (Side::Light, Rank::King) => 2,
            (Side::Dark, Rank::Man) => 3,
            (Side::Dark, Rank::King) => 4,
        }
    }

    pub fn from_code(code: u8) -> Result<Self, MoveError> {
        match code {
            1 => Ok(Self::man(Side::Light)),
            2 => Ok(Self::king(Side::Light)),
            3 => Ok(Self::man(Side::Dark)),
            4 => Ok(Self::king(Side::Dark)),
            _ => Err(MoveError::UnknownPiece { piece_code: code }),
        }
    }
}

/// A board coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    /// Builds a position without range checks. Intended for literals.
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    pub fn try_new(row: u8, col: u8) -> Result<Self, MoveError> {
        if row >= BOARD_WIDTH || col >= BOARD_WIDTH {
            return Err(MoveError::OffBoard { row, col });
        }
        Ok(Self { row, col })
    }

    pub const fn from_index(idx: usize) -> Self {
        Self {
            row: (idx / BOARD_WIDTH as usize) as u8,
            col: (idx % BOARD_WIDTH as usize) as u8,
        }
    }

    pub const fn index(self) -> usize {
        self.row as usize * BOARD_WIDTH as usize + self.col as usize
    }

    pub const fn is_on_board(self) -> bool {
        self.row < BOARD_WIDTH && self.col < BOARD_WIDTH
    }

    /// Returns the square `(dr, dc)` away, or `None` when it falls off the board.
    pub fn offset(self, dr: i8, dc: i8) -> Option<Self> {
        let row = i16::from(self.row) + i16::from(dr);
        let col = i16::from(self.col) + i16::from(dc);
        let width = i16::from(BOARD_WIDTH);
        if (0..width).contains(&row) && (0..width).contains(&col) {
            Some(Self::new(row as u8, col as u8))
        } else {
            None
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveKind {
    Step,
    Jump,
}

/// A from/to pair. Its geometry is not validated on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub from: Position,
    pub to: Position,
}

impl Move {
    pub const fn new(from: Position, to: Position) -> Self {
        Self { from, to }
    }

    /// Row and column deltas. Wide enough for any pair of `u8` coordinates.
    pub fn delta(self) -> (i16, i16) {
        (
            i16::from(self.to.row) - i16::from(self.from.row),
            i16::from(self.to.col) - i16::from(self.from.col),
        )
    }

    /// `Some` only for diagonal moves of distance one or two.
    pub fn kind(self) -> Option<MoveKind> {
        let (dr, dc) = self.delta();
        if dr.abs() != dc.abs() {
            return None;
        }
        match dr.abs() {
            1 => Some(MoveKind::Step),
            2 => Some(MoveKind::Jump),
            _ => None,
        }
    }

    /// Square jumped over. Only meaningful for a two-square diagonal.
    pub fn midpoint(self) -> Position {
        Position::new(
            ((u16::from(self.from.row) + u16::from(self.to.row)) / 2) as u8,
            ((u16::from(self.from.col) + u16::from(self.to.col)) / 2) as u8,
        )
    }
}

/// What `Board::apply_move` changed besides moving the piece.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MoveEffect {
    pub captured: Option<Position>,
    pub promoted: bool,
}

/// Input from the UI when a dragged piece is released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropEvent {
    pub from: Position,
    pub to: Position,
    /// The piece the UI believes it is dragging.
    pub piece: Piece,
}

/// Result of a move attempt. Rejections never change the board or the turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MoveOutcome {
    Applied {
        captured: Option<Position>,
        promoted: bool,
    },
    /// A capture was available and the drop ignored it.
    /// `positions` holds the source followed by every jump destination.
    RejectedMustJump { positions: Vec<Position> },
    RejectedIllegal { reason: MoveError },
}

impl MoveOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// Public game state returned from WASM APIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameState {
    /// 64 cell codes, row-major. See [`Piece::code`]; 0 is empty.
    pub board: Vec<u8>,
    pub current_turn: Side,
    pub light_count: u8,
    pub dark_count: u8,
    /// Contract:
    /// - Set by a must-jump rejection.
    /// - Cleared by the next applied move or reset.
    pub highlights: Vec<Position>,
    pub last_move: Option<Move>,
    /// Contract:
    /// - Describe `last_move`; `None`/`false` when no move was applied yet.
    pub captured: Option<Position>,
    pub promoted: bool,
    pub ply: u32,
    pub winner: Option<Side>,
}

/// Piece tally and winner, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameResult {
    pub winner: Option<Side>,
    pub light_count: u8,
    pub dark_count: u8,
}
