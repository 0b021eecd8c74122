//! Engine facade.
//!
//! `Engine` wires together the move generator, the evaluator and the
//! transposition table, and exposes the small surface a front end needs:
//! query legal moves, apply and take back moves, ask about game-ending
//! conditions, and search a position under a depth/time budget.
//!
//! The engine is synchronous and single-threaded; `search` runs on the
//! calling thread against a clone of the caller's position. A caller that
//! needs responsiveness runs `search` on its own background thread and may
//! flip the `SearchLimits` stop flag to end it early; a stopped search
//! still returns the best move of the last completed depth.

use crate::board::{Board, Undo};
use crate::error::EngineError;
use crate::eval::Evaluator;
use crate::move_generation::MoveGen;
use crate::move_types::Move;
use crate::search::iterative_deepening::{
    iterative_deepening_search, SearchLimits, SearchResult,
};
use crate::boardstack::BoardStack;
use crate::transposition::TranspositionTable;

pub struct Engine {
    move_gen: MoveGen,
    evaluator: Evaluator,
    tt: TranspositionTable,
    verbose: bool,
}

impl Engine {
    /// Engine with the default 64 MiB transposition table.
    pub fn new() -> Engine {
        Engine {
            move_gen: MoveGen::new(),
            evaluator: Evaluator::new(),
            tt: TranspositionTable::new(),
            verbose: false,
        }
    }

    /// Engine with a custom transposition-table budget.
    pub fn with_tt_size_mb(mb: usize) -> Engine {
        Engine {
            move_gen: MoveGen::new(),
            evaluator: Evaluator::new(),
            tt: TranspositionTable::with_capacity_mb(mb),
            verbose: false,
        }
    }

    /// Print per-depth search info lines to stdout.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// All legal moves in `board`.
    pub fn legal_moves(&self, board: &Board) -> Vec<Move> {
        self.move_gen.gen_legal_moves(board)
    }

    /// Apply `m` if it is legal. On error the position is untouched.
    pub fn try_move(&self, board: &mut Board, m: Move) -> Result<Undo, EngineError> {
        if !self.legal_moves(board).contains(&m) {
            return Err(EngineError::IllegalMove { uci: m.to_uci() });
        }
        board
            .make_move(m)
            .ok_or_else(|| EngineError::IllegalMove { uci: m.to_uci() })
    }

    /// Take back a move applied with `try_move`.
    pub fn undo_move(&self, board: &mut Board, undo: &Undo) {
        board.undo_move(undo);
    }

    /// Resolve a UCI move string ("e2e4", "e7e8q") against the position's
    /// legal moves. A promotion without a suffix defaults to the queen.
    pub fn move_from_uci(&self, board: &Board, uci: &str) -> Result<Move, EngineError> {
        let illegal = || EngineError::IllegalMove {
            uci: uci.to_string(),
        };
        let (from, to, promo) = Move::parse_uci(uci).ok_or_else(illegal)?;
        let legal = self.legal_moves(board);
        legal
            .iter()
            .find(|m| {
                m.from == from
                    && m.to == to
                    && match promo {
                        Some(p) => m.promotion == Some(p),
                        None => {
                            m.promotion.is_none()
                                || m.promotion == Some(crate::piece_types::PieceType::Queen)
                        }
                    }
            })
            .copied()
            .ok_or_else(illegal)
    }

    /// No legal moves and the mover is in check.
    pub fn is_checkmate(&self, board: &Board) -> bool {
        let (checkmate, _) = self.is_checkmate_or_stalemate(board);
        checkmate
    }

    /// No legal moves and the mover is not in check.
    pub fn is_stalemate(&self, board: &Board) -> bool {
        let (_, stalemate) = self.is_checkmate_or_stalemate(board);
        stalemate
    }

    /// Both game-over conditions in one legality pass.
    pub fn is_checkmate_or_stalemate(&self, board: &Board) -> (bool, bool) {
        if !self.legal_moves(board).is_empty() {
            return (false, false);
        }
        let in_check = board.in_check(board.side_to_move);
        (in_check, !in_check)
    }

    /// Static evaluation of `board` from the side to move's perspective.
    pub fn evaluate(&self, board: &Board) -> i32 {
        self.evaluator.eval(board, &self.move_gen)
    }

    /// Search `board` under `limits`. The caller's position is cloned; on a
    /// terminal position the result carries the null move as a sentinel (use
    /// [`Engine::is_checkmate`] / [`Engine::is_stalemate`] to tell which).
    pub fn search(&mut self, board: &Board, limits: &SearchLimits) -> SearchResult {
        let mut stack = BoardStack::with_board(board.clone());
        iterative_deepening_search(
            &mut stack,
            &self.move_gen,
            &self.evaluator,
            &mut self.tt,
            limits,
            self.verbose,
        )
    }

    /// Wipe the transposition table, e.g. between games.
    pub fn clear_tables(&mut self) {
        self.tt.clear();
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_move_rejects_illegal() {
        let engine = Engine::with_tt_size_mb(1);
        let mut board = Board::start_position();
        let before = board.clone();
        let err = engine.try_move(&mut board, Move::quiet(12, 36)); // e2e5
        assert!(matches!(err, Err(EngineError::IllegalMove { .. })));
        assert_eq!(board, before);
    }

    #[test]
    fn test_try_move_then_undo() {
        let engine = Engine::with_tt_size_mb(1);
        let mut board = Board::start_position();
        let before = board.clone();
        let undo = engine
            .try_move(&mut board, Move::quiet(12, 28))
            .expect("e2e4 is legal");
        engine.undo_move(&mut board, &undo);
        assert_eq!(board, before);
    }

    #[test]
    fn test_move_from_uci_defaults_to_queen() {
        let engine = Engine::with_tt_size_mb(1);
        let board = Board::from_fen("8/P7/8/8/8/8/8/k6K w - - 0 1").unwrap();
        let m = engine.move_from_uci(&board, "a7a8").unwrap();
        assert_eq!(m.promotion, Some(crate::piece_types::PieceType::Queen));
        let rook = engine.move_from_uci(&board, "a7a8r").unwrap();
        assert_eq!(rook.promotion, Some(crate::piece_types::PieceType::Rook));
    }
}
