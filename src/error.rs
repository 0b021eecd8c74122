//! Engine error types.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A move was submitted that is not legal in the current position. The
    /// position is left untouched.
    #[error("illegal move: {uci}")]
    IllegalMove { uci: String },

    /// A FEN string could not be parsed.
    #[error("invalid FEN \"{fen}\": {reason}")]
    InvalidFen { fen: String, reason: String },
}
