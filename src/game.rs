use log::{debug, info};

use crate::board::Board;
use crate::config::RuleSet;
use crate::error::MoveError;
use crate::types::{
    DropEvent, GameResult, GameState, Move, MoveEffect, MoveOutcome, Piece, Position, Side,
};

/// The rules engine: owns the board, the side to move and the
/// must-jump feedback shown to the player.
#[derive(Debug, Clone)]
pub struct GameInstance {
    board: Board,
    current_turn: Side,
    highlights: Vec<Position>,
    last_move: Option<Move>,
    last_effect: MoveEffect,
    ply: u32,
    rules: RuleSet,
}

impl GameInstance {
    pub fn new(rules: RuleSet) -> Self {
        Self::with_position(Board::new(), Side::Light, rules)
    }

    /// Starts from a custom position.
    pub fn with_position(board: Board, current_turn: Side, rules: RuleSet) -> Self {
        Self {
            board,
            current_turn,
            highlights: Vec::new(),
            last_move: None,
            last_effect: MoveEffect::default(),
            ply: 0,
            rules,
        }
    }

    pub fn board(&self) -> Board {
        self.board
    }

    pub fn current_turn(&self) -> Side {
        self.current_turn
    }

    pub fn highlights(&self) -> &[Position] {
        &self.highlights
    }

    pub fn rules(&self) -> RuleSet {
        self.rules
    }

    /// Moves the piece currently on `from`.
    pub fn attempt_move(&mut self, from: Position, to: Position) -> MoveOutcome {
        let piece = Position::try_new(from.row, from.col).and_then(|from| {
            self.board
                .piece_at(from)
                .ok_or(MoveError::EmptySource { at: from })
        });

        match piece {
            Ok(piece) => self.handle_drop(DropEvent { from, to, piece }),
            Err(reason) => self.reject(from, to, reason),
        }
    }

    /// Runs one drop through the turn protocol. Either the move is applied
    /// and the turn passes, or nothing but the highlights changes.
    pub fn handle_drop(&mut self, event: DropEvent) -> MoveOutcome {
        match self.try_drop(event) {
            Ok(effect) => MoveOutcome::Applied {
                captured: effect.captured,
                promoted: effect.promoted,
            },
            Err(reason) => self.reject(event.from, event.to, reason),
        }
    }

    /// Jump destinations for the piece on `pos` under the active rules.
    pub fn legal_jumps_from(&self, pos: Position) -> Vec<Position> {
        match self.board.piece_at(pos) {
            Some(piece) => self.jump_targets(pos, piece),
            None => Vec::new(),
        }
    }

    /// Pieces of the side to move with a jump available under the active rules.
    pub fn capture_sources(&self) -> Vec<Position> {
        self.board
            .jump_sources(self.current_turn)
            .into_iter()
            .filter(|&pos| !self.legal_jumps_from(pos).is_empty())
            .collect()
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.rules);
        info!("board reset, {} to move", self.current_turn);
    }

    /// The side whose opponent has no pieces left.
    pub fn winner(&self) -> Option<Side> {
        match self.board.count() {
            (0, 0) => None,
            (_, 0) => Some(Side::Light),
            (0, _) => Some(Side::Dark),
            _ => None,
        }
    }

    pub fn to_game_state(&self) -> GameState {
        let (light_count, dark_count) = self.board.count();
        GameState {
            board: self.board.to_array().to_vec(),
            current_turn: self.current_turn,
            light_count,
            dark_count,
            highlights: self.highlights.clone(),
            last_move: self.last_move,
            captured: self.last_effect.captured,
            promoted: self.last_effect.promoted,
            ply: self.ply,
            winner: self.winner(),
        }
    }

    pub fn to_game_result(&self) -> GameResult {
        let (light_count, dark_count) = self.board.count();
        GameResult {
            winner: self.winner(),
            light_count,
            dark_count,
        }
    }

    fn try_drop(&mut self, event: DropEvent) -> Result<MoveEffect, MoveError> {
        let mv = self.validate(event)?;
        let (board, effect) = self.board.apply_move(mv.from, mv.to)?;
        let mover = self.current_turn;

        self.board = board;
        self.current_turn = mover.opponent();
        self.highlights.clear();
        self.last_move = Some(mv);
        self.last_effect = effect;
        self.ply += 1;

        info!("{mover} moved {} -> {}", mv.from, mv.to);
        if let Some(captured) = effect.captured {
            info!("{mover} captured {captured}");
        }
        if effect.promoted {
            info!("{mover} crowned at {}", mv.to);
        }
        if let Some(winner) = self.winner() {
            info!("{winner} wins after {} plies", self.ply);
        }

        Ok(effect)
    }

    fn validate(&self, event: DropEvent) -> Result<Move, MoveError> {
        let DropEvent { from, to, piece } = event;
        Position::try_new(from.row, from.col)?;
        Position::try_new(to.row, to.col)?;

        let on_board = self
            .board
            .piece_at(from)
            .ok_or(MoveError::EmptySource { at: from })?;
        if on_board != piece {
            return Err(MoveError::PieceMismatch { at: from });
        }
        if piece.side != self.current_turn {
            return Err(MoveError::WrongTurn { side: piece.side });
        }

        if self.rules.mandatory_capture {
            let targets = self.jump_targets(from, piece);
            if !targets.is_empty() {
                // Every target already passed `Board::check_jump`.
                if targets.contains(&to) {
                    return Ok(Move::new(from, to));
                }
                return Err(MoveError::MustJump { from, targets });
            }
        }

        self.board.check_move(from, to, piece)?;
        self.check_direction(from, to, piece)?;

        Ok(Move::new(from, to))
    }

    fn jump_targets(&self, from: Position, piece: Piece) -> Vec<Position> {
        let mut targets = self.board.legal_jumps_from(from);
        targets.retain(|&to| self.check_direction(from, to, piece).is_ok());
        targets
    }

    fn check_direction(&self, from: Position, to: Position, piece: Piece) -> Result<(), MoveError> {
        if !self.rules.men_move_forward_only || piece.is_king() {
            return Ok(());
        }

        let (dr, _) = Move::new(from, to).delta();
        if dr.signum() != i16::from(piece.side.forward()) {
            return Err(MoveError::Backward);
        }
        Ok(())
    }

    fn reject(&mut self, from: Position, to: Position, reason: MoveError) -> MoveOutcome {
        debug!("rejected {from} -> {to}: {reason}");

        match reason {
            MoveError::MustJump { from, targets } => {
                let mut positions = Vec::with_capacity(targets.len() + 1);
                positions.push(from);
                positions.extend(targets);
                self.highlights = positions.clone();
                MoveOutcome::RejectedMustJump { positions }
            }
            reason => MoveOutcome::RejectedIllegal { reason },
        }
    }
}

impl Default for GameInstance {
    fn default() -> Self {
        Self::new(RuleSet::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIGHT: Piece = Piece::man(Side::Light);
    const DARK: Piece = Piece::man(Side::Dark);

    fn at(row: u8, col: u8) -> Position {
        Position::new(row, col)
    }

    fn game_with(pieces: &[(Position, Piece)], turn: Side) -> GameInstance {
        GameInstance::with_position(Board::from_pieces(pieces), turn, RuleSet::default())
    }

    #[test]
    fn initial_state_is_correct() {
        let game = GameInstance::default();
        let state = game.to_game_state();

        assert_eq!(state.current_turn, Side::Light);
        assert_eq!(state.light_count, 12);
        assert_eq!(state.dark_count, 12);
        assert!(state.highlights.is_empty());
        assert_eq!(state.last_move, None);
        assert_eq!(state.ply, 0);
        assert_eq!(state.winner, None);
        assert_eq!(state.board.len(), 64);
    }

    #[test]
    fn opening_step_switches_turn() {
        let mut game = GameInstance::default();

        let outcome = game.attempt_move(at(5, 0), at(4, 1));

        assert_eq!(
            outcome,
            MoveOutcome::Applied {
                captured: None,
                promoted: false,
            }
        );
        assert_eq!(game.current_turn(), Side::Dark);
        assert_eq!(game.board().piece_at(at(5, 0)), None);
        assert_eq!(game.board().piece_at(at(4, 1)), Some(LIGHT));
        assert_eq!(
            game.to_game_state().last_move,
            Some(Move::new(at(5, 0), at(4, 1)))
        );
    }

    #[test]
    fn moving_out_of_turn_is_ignored() {
        let mut game = GameInstance::default();
        let before = game.board();

        let outcome = game.attempt_move(at(2, 1), at(3, 2));

        assert_eq!(
            outcome,
            MoveOutcome::RejectedIllegal {
                reason: MoveError::WrongTurn { side: Side::Dark },
            }
        );
        assert_eq!(game.board(), before);
        assert_eq!(game.current_turn(), Side::Light);
    }

    #[test]
    fn stale_dragged_piece_is_ignored() {
        let mut game = GameInstance::default();

        let outcome = game.handle_drop(DropEvent {
            from: at(5, 0),
            to: at(4, 1),
            piece: Piece::king(Side::Light),
        });

        assert_eq!(
            outcome,
            MoveOutcome::RejectedIllegal {
                reason: MoveError::PieceMismatch { at: at(5, 0) },
            }
        );
        assert_eq!(game.current_turn(), Side::Light);
    }

    #[test]
    fn off_board_drop_is_ignored() {
        let mut game = GameInstance::default();

        let outcome = game.attempt_move(at(5, 0), at(9, 1));

        assert_eq!(
            outcome,
            MoveOutcome::RejectedIllegal {
                reason: MoveError::OffBoard { row: 9, col: 1 },
            }
        );
        assert_eq!(game.board(), Board::new());
    }

    #[test]
    fn skipping_a_capture_highlights_jumps_until_next_move() {
        let mut game = game_with(
            &[(at(5, 2), LIGHT), (at(4, 3), DARK), (at(0, 1), DARK)],
            Side::Light,
        );
        let before = game.board();

        let outcome = game.attempt_move(at(5, 2), at(4, 1));

        assert_eq!(
            outcome,
            MoveOutcome::RejectedMustJump {
                positions: vec![at(5, 2), at(3, 4)],
            }
        );
        assert_eq!(game.board(), before);
        assert_eq!(game.current_turn(), Side::Light);
        assert_eq!(game.highlights(), &[at(5, 2), at(3, 4)]);

        let outcome = game.attempt_move(at(5, 2), at(3, 4));

        assert_eq!(
            outcome,
            MoveOutcome::Applied {
                captured: Some(at(4, 3)),
                promoted: false,
            }
        );
        assert!(game.highlights().is_empty());
        assert_eq!(game.current_turn(), Side::Dark);
    }

    #[test]
    fn illegal_drop_keeps_existing_highlights() {
        let mut game = game_with(&[(at(5, 2), LIGHT), (at(4, 3), DARK)], Side::Light);
        game.attempt_move(at(5, 2), at(4, 1));

        let outcome = game.attempt_move(at(4, 3), at(5, 4));

        assert!(!outcome.is_applied());
        assert_eq!(game.highlights(), &[at(5, 2), at(3, 4)]);
    }

    #[test]
    fn optional_capture_allows_steps() {
        let rules = RuleSet {
            mandatory_capture: false,
            ..RuleSet::default()
        };
        let board = Board::from_pieces(&[(at(5, 2), LIGHT), (at(4, 3), DARK)]);
        let mut game = GameInstance::with_position(board, Side::Light, rules);

        assert!(game.attempt_move(at(5, 2), at(4, 1)).is_applied());
        assert!(game.highlights().is_empty());
    }

    #[test]
    fn forward_only_rules_restrict_men_not_kings() {
        let rules = RuleSet {
            men_move_forward_only: true,
            ..RuleSet::default()
        };
        let board = Board::from_pieces(&[
            (at(4, 1), LIGHT),
            (at(4, 5), Piece::king(Side::Light)),
            (at(0, 7), DARK),
        ]);
        let mut game = GameInstance::with_position(board, Side::Light, rules);

        assert_eq!(
            game.attempt_move(at(4, 1), at(5, 2)),
            MoveOutcome::RejectedIllegal {
                reason: MoveError::Backward,
            }
        );
        assert!(game.attempt_move(at(4, 5), at(5, 6)).is_applied());
    }

    #[test]
    fn forward_only_rules_ignore_backward_jumps() {
        let rules = RuleSet {
            men_move_forward_only: true,
            ..RuleSet::default()
        };
        let board = Board::from_pieces(&[(at(3, 2), LIGHT), (at(4, 3), DARK)]);
        let mut game = GameInstance::with_position(board, Side::Light, rules);

        assert!(game.legal_jumps_from(at(3, 2)).is_empty());
        assert!(game.attempt_move(at(3, 2), at(2, 1)).is_applied());
    }

    #[test]
    fn capture_sources_follow_turn_and_direction_rules() {
        let pieces = [
            (at(5, 2), LIGHT),
            (at(4, 3), DARK),
            (at(3, 6), LIGHT),
            (at(4, 5), DARK),
        ];
        let game = game_with(&pieces, Side::Light);
        assert_eq!(game.capture_sources(), vec![at(3, 6), at(5, 2)]);

        let rules = RuleSet {
            men_move_forward_only: true,
            ..RuleSet::default()
        };
        let board = Board::from_pieces(&pieces);
        let game = GameInstance::with_position(board, Side::Light, rules);
        assert_eq!(game.capture_sources(), vec![at(5, 2)]);

        let game = game_with(&pieces, Side::Dark);
        assert_eq!(game.capture_sources(), vec![at(4, 3), at(4, 5)]);
    }

    #[test]
    fn capturing_last_piece_decides_game() {
        let mut game = game_with(&[(at(5, 2), LIGHT), (at(4, 3), DARK)], Side::Light);

        game.attempt_move(at(5, 2), at(3, 4));
        let result = game.to_game_result();

        assert_eq!(result.winner, Some(Side::Light));
        assert_eq!((result.light_count, result.dark_count), (1, 0));
        assert_eq!(game.to_game_state().winner, Some(Side::Light));
    }

    #[test]
    fn reset_restores_start_and_keeps_rules() {
        let rules = RuleSet {
            men_move_forward_only: true,
            ..RuleSet::default()
        };
        let mut game = GameInstance::new(rules);
        game.attempt_move(at(5, 0), at(4, 1));
        game.attempt_move(at(2, 3), at(3, 2));

        game.reset();

        assert_eq!(game.board(), Board::new());
        assert_eq!(game.current_turn(), Side::Light);
        assert_eq!(game.rules(), rules);
        assert_eq!(game.to_game_state().ply, 0);
    }
}
