//! Shared test utilities.

#![allow(dead_code)] // not every test crate uses every helper

use kestrel::board::Board;
use kestrel::move_generation::MoveGen;
use kestrel::move_types::Move;
use std::collections::HashSet;

/// Initialize a board from FEN, panicking on malformed test input.
pub fn board_from_fen(fen: &str) -> Board {
    Board::from_fen(fen).expect("test FEN should parse")
}

/// All legal moves as a HashSet for easy membership checks.
pub fn legal_moves_set(board: &Board, move_gen: &MoveGen) -> HashSet<Move> {
    move_gen.gen_legal_moves(board).into_iter().collect()
}

/// All legal moves rendered as UCI strings.
pub fn legal_uci_set(board: &Board, move_gen: &MoveGen) -> HashSet<String> {
    move_gen
        .gen_legal_moves(board)
        .into_iter()
        .map(|m| m.to_uci())
        .collect()
}

/// Standard test positions with known properties.
pub mod positions {
    pub const STARTING: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
    pub const MATE_IN_1_WHITE: &str = "6k1/5ppp/8/8/8/8/8/4R1K1 w - - 0 1"; // Re8#
    pub const MATE_IN_1_BLACK: &str = "4r1k1/8/8/8/8/8/5PPP/6K1 b - - 0 1"; // Re1#
    pub const MATE_IN_2_WHITE: &str = "6k1/8/8/8/8/8/RR6/6K1 w - - 0 1"; // rank cut, then mate
    pub const STALEMATE: &str = "k7/1R6/K7/8/8/8/8/8 b - - 0 1"; // Black stalemated
    pub const EN_PASSANT: &str = "rnbqkbnr/ppppp2p/5p2/6pP/8/8/PPPPPPP1/RNBQKBNR w KQkq g6 0 3";
    pub const CASTLING_BOTH: &str = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1";
    pub const PROMOTION: &str = "8/P7/8/8/8/8/8/k6K w - - 0 1";
    pub const LONE_PAWN: &str = "4k3/8/8/8/8/8/4P3/4K3 w - - 0 1";
    pub const ROOK_ENDGAME: &str = "6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1";
    /// White queen can mate (Qc8#) or stalemate (Qc7) in one move.
    pub const STALEMATE_TRAP: &str = "k7/8/1K6/2Q5/8/8/8/8 w - - 0 1";
}
