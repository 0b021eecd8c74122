//! Tests for make/undo: board mutation, special moves, castling rights and
//! the halfmove clock.

mod common;

use common::{board_from_fen, positions};
use kestrel::board::{Board, CASTLE_BK, CASTLE_BQ, CASTLE_WK, CASTLE_WQ};
use kestrel::move_types::Move;
use kestrel::piece_types::{Color, Piece, PieceType};

#[test]
fn test_standard_pawn_push() {
    let mut board = Board::start_position();
    let undo = board.make_move(Move::quiet(12, 20)).expect("e2e3 is legal");

    assert_eq!(
        board.piece_at(20),
        Some(Piece::new(PieceType::Pawn, Color::White)),
        "pawn should be on e3"
    );
    assert_eq!(board.piece_at(12), None, "e2 should be empty");
    assert_eq!(board.side_to_move, Color::Black);
    assert_eq!(board.en_passant, None, "single push sets no en passant");
    assert_eq!(board.halfmove_clock, 0, "pawn move resets the clock");

    board.undo_move(&undo);
    assert_eq!(board, Board::start_position());
}

#[test]
fn test_double_pawn_push_sets_en_passant() {
    let mut board = board_from_fen(positions::LONE_PAWN);
    board.make_move(Move::quiet(12, 28)).expect("e2e4 is legal");

    assert_eq!(
        board.piece_at(28),
        Some(Piece::new(PieceType::Pawn, Color::White))
    );
    assert_eq!(board.en_passant, Some(20), "en passant square should be e3");
}

#[test]
fn test_en_passant_capture_removes_pawn() {
    let mut board = board_from_fen(positions::EN_PASSANT);
    let m = Move::en_passant(39, 46); // h5xg6 e.p.
    let undo = board.make_move(m).expect("en passant should be legal");

    assert_eq!(
        board.piece_at(46),
        Some(Piece::new(PieceType::Pawn, Color::White)),
        "white pawn should land on g6"
    );
    assert_eq!(board.piece_at(39), None, "h5 should be empty");
    assert_eq!(board.piece_at(38), None, "captured pawn on g5 should be gone");

    board.undo_move(&undo);
    assert_eq!(
        board.piece_at(38),
        Some(Piece::new(PieceType::Pawn, Color::Black)),
        "undo should restore the g5 pawn"
    );
}

#[test]
fn test_kingside_castling() {
    let mut board = board_from_fen(positions::CASTLING_BOTH);
    board.make_move(Move::castle(4, 6)).expect("e1g1 is legal");

    assert_eq!(
        board.piece_at(6),
        Some(Piece::new(PieceType::King, Color::White))
    );
    assert_eq!(
        board.piece_at(5),
        Some(Piece::new(PieceType::Rook, Color::White)),
        "rook should relocate to f1"
    );
    assert_eq!(board.piece_at(4), None);
    assert_eq!(board.piece_at(7), None);
    assert_eq!(board.castling_rights & (CASTLE_WK | CASTLE_WQ), 0);
    assert_ne!(board.castling_rights & CASTLE_BK, 0, "black rights survive");
}

#[test]
fn test_queenside_castling() {
    let mut board = board_from_fen(positions::CASTLING_BOTH);
    let undo = board.make_move(Move::castle(4, 2)).expect("e1c1 is legal");

    assert_eq!(
        board.piece_at(2),
        Some(Piece::new(PieceType::King, Color::White))
    );
    assert_eq!(
        board.piece_at(3),
        Some(Piece::new(PieceType::Rook, Color::White)),
        "rook should relocate to d1"
    );
    assert_eq!(board.piece_at(0), None);

    board.undo_move(&undo);
    assert_eq!(board, board_from_fen(positions::CASTLING_BOTH));
}

#[test]
fn test_black_castling_squares() {
    let mut board = board_from_fen("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1");
    board.make_move(Move::castle(60, 58)).expect("e8c8 is legal");
    assert_eq!(
        board.piece_at(59),
        Some(Piece::new(PieceType::Rook, Color::Black)),
        "rook should relocate to d8"
    );
    assert_eq!(board.castling_rights & (CASTLE_BK | CASTLE_BQ), 0);
}

#[test]
fn test_pawn_promotion() {
    let mut board = board_from_fen(positions::PROMOTION);
    let undo = board
        .make_move(Move::promotion(48, 56, PieceType::Queen, false))
        .expect("a7a8q is legal");

    assert_eq!(
        board.piece_at(56),
        Some(Piece::new(PieceType::Queen, Color::White)),
        "queen should stand on a8"
    );
    assert_eq!(board.piece_at(48), None);

    board.undo_move(&undo);
    assert_eq!(
        board.piece_at(48),
        Some(Piece::new(PieceType::Pawn, Color::White)),
        "undo should demote back to a pawn"
    );
    assert_eq!(board.piece_at(56), None);
}

#[test]
fn test_rook_move_clears_castling_right() {
    let mut board = board_from_fen(positions::CASTLING_BOTH);
    board.make_move(Move::quiet(7, 15)).expect("h1h2 is legal");
    assert_eq!(board.castling_rights & CASTLE_WK, 0);
    assert_ne!(board.castling_rights & CASTLE_WQ, 0);
}

#[test]
fn test_rook_capture_clears_victims_castling_right() {
    // White rook takes the rook on h8; Black loses kingside castling.
    let mut board = board_from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
    board.make_move(Move::capture(7, 63)).expect("h1xh8 is legal");
    assert_eq!(board.castling_rights & CASTLE_BK, 0);
    assert_ne!(board.castling_rights & CASTLE_BQ, 0);
    assert_eq!(board.castling_rights & CASTLE_WK, 0, "the moving rook too");
}

#[test]
fn test_halfmove_clock_increments_and_resets() {
    let mut board = Board::start_position();
    board.make_move(Move::quiet(6, 21)).unwrap(); // Ng1f3
    assert_eq!(board.halfmove_clock, 1);
    board.make_move(Move::quiet(57, 42)).unwrap(); // Nb8c6
    assert_eq!(board.halfmove_clock, 2);
    board.make_move(Move::quiet(12, 28)).unwrap(); // e2e4
    assert_eq!(board.halfmove_clock, 0, "pawn move resets");
}

#[test]
fn test_illegal_move_restores_state() {
    // The knight on e2 is pinned by the rook on e8.
    let mut board = board_from_fen("4r1k1/8/8/8/8/8/4N3/4K3 w - - 0 1");
    let before = board.clone();
    assert!(board.make_move(Move::quiet(12, 27)).is_none()); // Ne2-d4
    assert_eq!(board, before, "failed make must not mutate the position");
}

#[test]
fn test_move_sequence_undo_restores_start() {
    let mut board = Board::start_position();
    let start = board.clone();

    let moves = [
        Move::quiet(12, 28),   // e2e4
        Move::quiet(52, 36),   // e7e5
        Move::quiet(6, 21),    // Ng1f3
        Move::quiet(57, 42),   // Nb8c6
        Move::quiet(5, 26),    // Bf1c4
    ];
    let mut undos = Vec::new();
    for m in moves {
        undos.push(board.make_move(m).expect("scripted move should be legal"));
    }
    for undo in undos.iter().rev() {
        board.undo_move(undo);
    }
    assert_eq!(board, start);
}
