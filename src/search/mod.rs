//! Search: iterative-deepening negamax with alpha-beta pruning, quiescence,
//! a transposition table and killer/history move ordering.

pub mod alpha_beta;
pub mod history;
pub mod iterative_deepening;
pub mod quiescence;

pub use alpha_beta::SearchContext;
pub use history::{HistoryTable, HISTORY_MAX};
pub use iterative_deepening::{iterative_deepening_search, SearchLimits, SearchResult};

/// Killer-move table depth; searches never exceed this many plies.
pub const MAX_PLY: usize = 128;

/// Score infinity (outside any reachable evaluation).
pub const INF: i32 = 100_000_000;

/// Base score of a checkmate. Mate scores shrink by one per ply from the
/// root, so shorter mates score higher.
pub const MATE: i32 = 1_000_000;
