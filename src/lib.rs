//! Kestrel: a classical alpha-beta chess engine core.
//!
//! The crate provides the four subsystems of a classical engine behind a
//! small [`Engine`] facade: a mailbox position with incremental Zobrist
//! hashing, a fully legal move generator, a material/piece-square evaluator,
//! and an iterative-deepening negamax search with a transposition table.
//! Rendering, input handling and protocol plumbing are left to callers.
//!
//! ```no_run
//! use kestrel::{Board, Engine, SearchLimits};
//!
//! let mut engine = Engine::new();
//! let board = Board::start_position();
//! let result = engine.search(&board, &SearchLimits::new(6, 1000));
//! println!("best move: {}", result.best_move);
//! ```

pub mod board;
pub mod board_utils;
pub mod boardstack;
pub mod engine;
pub mod error;
pub mod eval;
pub mod eval_constants;
pub mod move_generation;
pub mod move_types;
pub mod piece_types;
pub mod search;
pub mod transposition;
pub mod zobrist;

pub use board::{Board, Undo, CASTLE_ALL, CASTLE_BK, CASTLE_BQ, CASTLE_WK, CASTLE_WQ};
pub use boardstack::BoardStack;
pub use engine::Engine;
pub use error::EngineError;
pub use eval::Evaluator;
pub use move_generation::{perft, MoveGen};
pub use move_types::{Move, NULL_MOVE};
pub use piece_types::{Color, Piece, PieceType};
pub use search::{SearchLimits, SearchResult, INF, MATE};
pub use transposition::{Bound, TranspositionTable};
pub use zobrist::ZobristTable;
