//! Tests for board representation, FEN parsing and game-ending conditions.

mod common;

use common::{board_from_fen, positions};
use kestrel::board::{Board, CASTLE_ALL};
use kestrel::engine::Engine;
use kestrel::piece_types::{Color, Piece, PieceType};

#[test]
fn test_starting_position_parsing() {
    let board = board_from_fen(positions::STARTING);

    assert_eq!(board.side_to_move, Color::White);
    assert_eq!(board.castling_rights, CASTLE_ALL);
    assert_eq!(board.en_passant, None);
    assert_eq!(board.halfmove_clock, 0);

    let white_pawns = (0..64u8)
        .filter(|&sq| {
            board.piece_at(sq) == Some(Piece::new(PieceType::Pawn, Color::White))
        })
        .count();
    assert_eq!(white_pawns, 8);
    assert_eq!(board.king_square(Color::White), Some(4));
    assert_eq!(board.king_square(Color::Black), Some(60));
}

#[test]
fn test_fen_roundtrip() {
    let test_fens = [
        positions::STARTING,
        positions::EN_PASSANT,
        positions::CASTLING_BOTH,
        "r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4",
    ];

    for fen in test_fens {
        let board = board_from_fen(fen);
        assert_eq!(board.to_fen(), fen, "FEN roundtrip failed");
    }
}

#[test]
fn test_en_passant_square_parsing() {
    let board = board_from_fen(positions::EN_PASSANT);
    assert_eq!(board.en_passant, Some(46)); // g6
}

#[test]
fn test_start_position_matches_startpos_fen() {
    assert_eq!(Board::start_position(), board_from_fen(positions::STARTING));
}

#[test]
fn test_checkmate_detection() {
    let engine = Engine::with_tt_size_mb(1);
    let mated = board_from_fen("k7/1Q6/1K6/8/8/8/8/8 b - - 0 1"); // Qb7#

    let (is_checkmate, is_stalemate) = engine.is_checkmate_or_stalemate(&mated);
    assert!(is_checkmate, "position should be checkmate");
    assert!(!is_stalemate);
}

#[test]
fn test_stalemate_detection() {
    let engine = Engine::with_tt_size_mb(1);
    let stalemate = board_from_fen(positions::STALEMATE);

    let (is_checkmate, is_stalemate) = engine.is_checkmate_or_stalemate(&stalemate);
    assert!(!is_checkmate, "position should not be checkmate");
    assert!(is_stalemate, "position should be stalemate");
}

#[test]
fn test_in_check() {
    let board = board_from_fen("4k3/8/8/8/8/8/4r3/4K3 w - - 0 1");
    assert!(board.in_check(Color::White));
    assert!(!board.in_check(Color::Black));
}

#[test]
fn test_insufficient_material() {
    // Bare kings.
    assert!(board_from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").is_insufficient_material());
    // King + minor vs king.
    assert!(board_from_fen("4k3/8/8/8/8/8/8/2B1K3 w - - 0 1").is_insufficient_material());
    assert!(board_from_fen("4k3/8/8/8/8/8/8/2N1K3 w - - 0 1").is_insufficient_material());
    // Bishop vs bishop, any square colors.
    assert!(board_from_fen("2b1k3/8/8/8/8/8/8/2B1K3 w - - 0 1").is_insufficient_material());
    // A single pawn re-enables play.
    assert!(!board_from_fen("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1").is_insufficient_material());
    // Rooks and queens too.
    assert!(!board_from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").is_insufficient_material());
    // Two minors on one side is not covered by the rule.
    assert!(!board_from_fen("4k3/8/8/8/8/8/8/1NN1K3 w - - 0 1").is_insufficient_material());
    // Bishop vs knight is not covered either.
    assert!(!board_from_fen("2n1k3/8/8/8/8/8/8/2B1K3 w - - 0 1").is_insufficient_material());
}

#[test]
fn test_halfmove_clock_parsing() {
    let board = board_from_fen("4k3/8/8/8/8/8/8/4K3 w - - 37 85");
    assert_eq!(board.halfmove_clock, 37);
}
