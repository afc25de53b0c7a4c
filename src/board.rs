use crate::error::MoveError;
use crate::types::{Move, MoveEffect, MoveKind, Piece, Position, Rank, Side};

const BOARD_SIZE: usize = 8;
const NUM_SQUARES: usize = BOARD_SIZE * BOARD_SIZE;
const STARTING_ROWS: usize = 3;
const JUMP_DIRECTIONS: [(i8, i8); 4] = [(2, 2), (2, -2), (-2, 2), (-2, -2)];

/// Checkers board represented by three bitboards.
///
/// `light` and `dark` never overlap, and `kings` is a subset of their union.
/// The board is a value: every update returns a new board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    light: u64,
    dark: u64,
    kings: u64,
}

impl Board {
    /// Creates the initial board:
    /// twelve men per side on the squares where `row + col` is odd,
    /// dark on rows 0..=2 and light on rows 5..=7.
    pub fn new() -> Self {
        let mut light = 0u64;
        let mut dark = 0u64;

        for pos in 0..NUM_SQUARES {
            let (row, col) = (pos / BOARD_SIZE, pos % BOARD_SIZE);
            if (row + col) % 2 == 0 {
                continue;
            }
            if row < STARTING_ROWS {
                dark |= bit(pos);
            } else if row >= BOARD_SIZE - STARTING_ROWS {
                light |= bit(pos);
            }
        }

        Self {
            light,
            dark,
            kings: 0,
        }
    }

    pub const fn empty() -> Self {
        Self {
            light: 0,
            dark: 0,
            kings: 0,
        }
    }

    /// Builds a custom position on an otherwise empty board.
    pub fn from_pieces(pieces: &[(Position, Piece)]) -> Self {
        pieces
            .iter()
            .fold(Self::empty(), |board, &(pos, piece)| {
                board.with_piece(pos, Some(piece))
            })
    }

    pub fn piece_at(&self, pos: Position) -> Option<Piece> {
        if !pos.is_on_board() {
            return None;
        }

        let square = bit(pos.index());
        let side = if (self.light & square) != 0 {
            Side::Light
        } else if (self.dark & square) != 0 {
            Side::Dark
        } else {
            return None;
        };
        let rank = if (self.kings & square) != 0 {
            Rank::King
        } else {
            Rank::Man
        };

        Some(Piece { side, rank })
    }

    /// Returns a copy with `pos` set to `piece` (or cleared on `None`).
    /// Off-board positions leave the board unchanged.
    pub fn with_piece(self, pos: Position, piece: Option<Piece>) -> Self {
        if !pos.is_on_board() {
            return self;
        }

        let square = bit(pos.index());
        let mut next = Self {
            light: self.light & !square,
            dark: self.dark & !square,
            kings: self.kings & !square,
        };

        if let Some(piece) = piece {
            match piece.side {
                Side::Light => next.light |= square,
                Side::Dark => next.dark |= square,
            }
            if piece.is_king() {
                next.kings |= square;
            }
        }

        next
    }

    /// Destinations reachable from `from` with a single capture.
    ///
    /// Empty when `from` holds no piece. A jump counts only when the landing
    /// square is on the board and empty and the midpoint holds an opponent.
    pub fn legal_jumps_from(&self, from: Position) -> Vec<Position> {
        let Some(piece) = self.piece_at(from) else {
            return Vec::new();
        };

        JUMP_DIRECTIONS
            .iter()
            .filter_map(|&(dr, dc)| from.offset(dr, dc))
            .filter(|&to| self.check_jump(from, to, piece).is_ok())
            .collect()
    }

    /// Broad move check: a diagonal step, or a diagonal jump over an opponent.
    pub fn is_legal_step(&self, from: Position, to: Position, piece: Piece) -> bool {
        self.check_move(from, to, piece).is_ok()
    }

    /// Strict jump check: exactly two squares diagonally over an opponent.
    pub fn is_legal_jump(&self, from: Position, to: Position, piece: Piece) -> bool {
        self.check_jump(from, to, piece).is_ok()
    }

    pub fn check_move(
        &self,
        from: Position,
        to: Position,
        piece: Piece,
    ) -> Result<MoveKind, MoveError> {
        check_on_board(from)?;
        check_on_board(to)?;
        let mv = Move::new(from, to);
        let (dr, dc) = mv.delta();

        if dr == 0 && dc == 0 {
            return Err(MoveError::Stationary);
        }
        if dr.abs() != dc.abs() {
            return Err(MoveError::NotDiagonal);
        }
        if dr.abs() > 2 {
            return Err(MoveError::TooFar);
        }

        self.check_landing(to)?;
        if dr.abs() == 2 {
            self.check_capture(mv.midpoint(), piece)?;
            return Ok(MoveKind::Jump);
        }

        Ok(MoveKind::Step)
    }

    /// Returns the captured square when the jump is legal.
    pub fn check_jump(
        &self,
        from: Position,
        to: Position,
        piece: Piece,
    ) -> Result<Position, MoveError> {
        check_on_board(from)?;
        check_on_board(to)?;
        let mv = Move::new(from, to);
        let (dr, dc) = mv.delta();

        if dr.abs() != 2 || dc.abs() != 2 {
            return Err(MoveError::NotAJump);
        }

        self.check_landing(to)?;
        let captured = mv.midpoint();
        self.check_capture(captured, piece)?;

        Ok(captured)
    }

    /// Moves the piece on `from` to `to`, removes a jumped piece and crowns
    /// a man that reaches its promotion row.
    ///
    /// Caller contract: the move has already been validated. Only a missing
    /// source piece or an off-board square is reported here.
    pub fn apply_move(
        &self,
        from: Position,
        to: Position,
    ) -> Result<(Self, MoveEffect), MoveError> {
        check_on_board(from)?;
        check_on_board(to)?;
        let piece = self
            .piece_at(from)
            .ok_or(MoveError::EmptySource { at: from })?;

        let mv = Move::new(from, to);
        let mut next = self.with_piece(from, None);
        let mut effect = MoveEffect::default();

        if mv.kind() == Some(MoveKind::Jump) {
            let mid = mv.midpoint();
            if next.piece_at(mid).is_some() {
                next = next.with_piece(mid, None);
                effect.captured = Some(mid);
            }
        }

        let landed = if !piece.is_king() && to.row == piece.side.promotion_row() {
            effect.promoted = true;
            piece.crowned()
        } else {
            piece
        };

        Ok((next.with_piece(to, Some(landed)), effect))
    }

    /// Squares holding a piece of `side`, in index order.
    pub fn pieces(&self, side: Side) -> impl Iterator<Item = Position> {
        let mut bits = self.side_mask(side);
        std::iter::from_fn(move || {
            if bits == 0 {
                return None;
            }
            let idx = bits.trailing_zeros() as usize;
            bits &= bits - 1;
            Some(Position::from_index(idx))
        })
    }

    /// Pieces of `side` that have at least one capture available.
    pub fn jump_sources(&self, side: Side) -> Vec<Position> {
        self.pieces(side)
            .filter(|&pos| !self.legal_jumps_from(pos).is_empty())
            .collect()
    }

    /// Returns `(light_count, dark_count)`.
    pub fn count(&self) -> (u8, u8) {
        (self.light.count_ones() as u8, self.dark.count_ones() as u8)
    }

    /// Converts board to `[u8; 64]` of cell codes, 0 for empty.
    pub fn to_array(&self) -> [u8; NUM_SQUARES] {
        let mut board = [0u8; NUM_SQUARES];
        for (pos, cell) in board.iter_mut().enumerate() {
            *cell = self
                .piece_at(Position::from_index(pos))
                .map_or(0, Piece::code);
        }
        board
    }

    fn side_mask(&self, side: Side) -> u64 {
        match side {
            Side::Light => self.light,
            Side::Dark => self.dark,
        }
    }

    fn check_landing(&self, to: Position) -> Result<(), MoveError> {
        check_on_board(to)?;
        if self.piece_at(to).is_some() {
            return Err(MoveError::Occupied { at: to });
        }
        Ok(())
    }

    fn check_capture(&self, mid: Position, piece: Piece) -> Result<(), MoveError> {
        match self.piece_at(mid) {
            None => Err(MoveError::NothingToCapture { at: mid }),
            Some(victim) if victim.side == piece.side => Err(MoveError::OwnPiece { at: mid }),
            Some(_) => Ok(()),
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

fn bit(pos: usize) -> u64 {
    if pos < NUM_SQUARES { 1u64 << pos } else { 0 }
}

fn check_on_board(pos: Position) -> Result<(), MoveError> {
    Position::try_new(pos.row, pos.col).map(|_| ())
}
