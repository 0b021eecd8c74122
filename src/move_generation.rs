//! Move generation.
//!
//! `MoveGen` precomputes the knight and king target squares for every origin
//! once at construction and is then shared immutably by searches, the
//! evaluator (mobility) and the engine facade. Generation is pseudo-legal:
//! moves may leave the mover's king in check and are filtered by
//! make-then-check. Castling is the exception: it is only emitted when it is
//! fully legal, including the transit squares being unattacked.

use crate::board::{Board, CASTLE_BK, CASTLE_BQ, CASTLE_WK, CASTLE_WQ};
use crate::board_utils::{sq_from_file_rank, sq_to_file, sq_to_rank};
use crate::move_types::Move;
use crate::piece_types::{Color, PieceType};

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (-1, 2),
    (-2, 1),
    (1, -2),
    (2, -1),
    (-1, -2),
    (-2, -1),
];

const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

const BISHOP_DIRS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const ROOK_DIRS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

const PROMOTION_PIECES: [PieceType; 4] = [
    PieceType::Queen,
    PieceType::Rook,
    PieceType::Bishop,
    PieceType::Knight,
];

/// Upper bound on pseudo-legal moves in any reachable position.
const MAX_MOVES: usize = 256;

/// Move generator with precomputed leaper tables.
pub struct MoveGen {
    knight_targets: Vec<Vec<u8>>,
    king_targets: Vec<Vec<u8>>,
}

impl MoveGen {
    pub fn new() -> MoveGen {
        let build = |offsets: &[(i8, i8)]| -> Vec<Vec<u8>> {
            (0..64u8)
                .map(|sq| {
                    let file = sq_to_file(sq) as i8;
                    let rank = sq_to_rank(sq) as i8;
                    offsets
                        .iter()
                        .filter_map(|&(df, dr)| {
                            let (nf, nr) = (file + df, rank + dr);
                            if (0..8).contains(&nf) && (0..8).contains(&nr) {
                                Some(sq_from_file_rank(nf as u8, nr as u8))
                            } else {
                                None
                            }
                        })
                        .collect()
                })
                .collect()
        };

        MoveGen {
            knight_targets: build(&KNIGHT_OFFSETS),
            king_targets: build(&KING_OFFSETS),
        }
    }

    /// All pseudo-legal moves for the side to move. Self-check is not
    /// filtered here (castling excepted, which is generated fully legal).
    pub fn gen_pseudo_legal_moves(&self, board: &Board) -> Vec<Move> {
        let mut moves = Vec::with_capacity(MAX_MOVES / 4);
        let us = board.side_to_move;

        for from in 0..64u8 {
            let Some(piece) = board.piece_at(from) else {
                continue;
            };
            if piece.color != us {
                continue;
            }

            match piece.piece_type {
                PieceType::Pawn => self.gen_pawn_moves(board, from, us, &mut moves),
                PieceType::Knight => {
                    self.gen_leaper_moves(board, from, us, &self.knight_targets, &mut moves)
                }
                PieceType::King => {
                    self.gen_leaper_moves(board, from, us, &self.king_targets, &mut moves);
                    self.gen_castling_moves(board, from, us, &mut moves);
                }
                PieceType::Bishop => self.gen_slider_moves(board, from, us, &BISHOP_DIRS, &mut moves),
                PieceType::Rook => self.gen_slider_moves(board, from, us, &ROOK_DIRS, &mut moves),
                PieceType::Queen => {
                    self.gen_slider_moves(board, from, us, &BISHOP_DIRS, &mut moves);
                    self.gen_slider_moves(board, from, us, &ROOK_DIRS, &mut moves);
                }
            }
        }

        moves
    }

    /// Fully legal moves: pseudo-legal moves that survive make-then-check on
    /// a scratch copy of the position. This is the canonical legality oracle.
    pub fn gen_legal_moves(&self, board: &Board) -> Vec<Move> {
        let mut scratch = board.clone();
        self.gen_pseudo_legal_moves(board)
            .into_iter()
            .filter(|&m| match scratch.make_move(m) {
                Some(undo) => {
                    scratch.undo_move(&undo);
                    true
                }
                None => false,
            })
            .collect()
    }

    fn gen_pawn_moves(&self, board: &Board, from: u8, us: Color, moves: &mut Vec<Move>) {
        let rank = sq_to_rank(from) as i8;
        let file = sq_to_file(from) as i8;
        let dir: i8 = if us == Color::White { 1 } else { -1 };
        let start_rank: i8 = if us == Color::White { 1 } else { 6 };
        let promo_rank: i8 = if us == Color::White { 7 } else { 0 };

        let push_rank = rank + dir;
        if (0..8).contains(&push_rank) {
            let one = sq_from_file_rank(file as u8, push_rank as u8);
            if board.piece_at(one).is_none() {
                if push_rank == promo_rank {
                    for promo in PROMOTION_PIECES {
                        moves.push(Move::promotion(from, one, promo, false));
                    }
                } else {
                    moves.push(Move::quiet(from, one));
                    if rank == start_rank {
                        let two = sq_from_file_rank(file as u8, (rank + 2 * dir) as u8);
                        if board.piece_at(two).is_none() {
                            moves.push(Move::quiet(from, two));
                        }
                    }
                }
            }
        }

        for df in [-1i8, 1] {
            let (nf, nr) = (file + df, rank + dir);
            if !(0..8).contains(&nf) || !(0..8).contains(&nr) {
                continue;
            }
            let to = sq_from_file_rank(nf as u8, nr as u8);

            if let Some(target) = board.piece_at(to) {
                if target.color != us {
                    if nr == promo_rank {
                        for promo in PROMOTION_PIECES {
                            moves.push(Move::promotion(from, to, promo, true));
                        }
                    } else {
                        moves.push(Move::capture(from, to));
                    }
                }
            }

            if board.en_passant == Some(to) {
                // The enemy pawn to be captured sits beside us on our rank.
                let adj = sq_from_file_rank(nf as u8, rank as u8);
                if matches!(
                    board.piece_at(adj),
                    Some(p) if p.piece_type == PieceType::Pawn && p.color != us
                ) {
                    moves.push(Move::en_passant(from, to));
                }
            }
        }
    }

    fn gen_leaper_moves(
        &self,
        board: &Board,
        from: u8,
        us: Color,
        targets: &[Vec<u8>],
        moves: &mut Vec<Move>,
    ) {
        for &to in &targets[from as usize] {
            match board.piece_at(to) {
                None => moves.push(Move::quiet(from, to)),
                Some(p) if p.color != us => moves.push(Move::capture(from, to)),
                Some(_) => {}
            }
        }
    }

    fn gen_slider_moves(
        &self,
        board: &Board,
        from: u8,
        us: Color,
        dirs: &[(i8, i8)],
        moves: &mut Vec<Move>,
    ) {
        let file = sq_to_file(from) as i8;
        let rank = sq_to_rank(from) as i8;
        for &(df, dr) in dirs {
            let (mut nf, mut nr) = (file + df, rank + dr);
            while (0..8).contains(&nf) && (0..8).contains(&nr) {
                let to = sq_from_file_rank(nf as u8, nr as u8);
                match board.piece_at(to) {
                    None => moves.push(Move::quiet(from, to)),
                    Some(p) => {
                        if p.color != us {
                            moves.push(Move::capture(from, to));
                        }
                        break;
                    }
                }
                nf += df;
                nr += dr;
            }
        }
    }

    /// Castling, generated only when fully legal: the rights bit is set, the
    /// squares between king and rook are empty, the rook is home, the king is
    /// not in check, and neither the transit nor the landing square is
    /// attacked.
    fn gen_castling_moves(&self, board: &Board, from: u8, us: Color, moves: &mut Vec<Move>) {
        let rook_home = |sq: u8| {
            matches!(
                board.piece_at(sq),
                Some(p) if p.piece_type == PieceType::Rook && p.color == us
            )
        };
        let empty = |squares: &[u8]| squares.iter().all(|&sq| board.piece_at(sq).is_none());
        let safe = |squares: &[u8]| {
            squares
                .iter()
                .all(|&sq| !board.is_square_attacked(sq, us.opposite()))
        };

        match us {
            Color::White if from == 4 => {
                if board.castling_rights & CASTLE_WK != 0
                    && empty(&[5, 6])
                    && rook_home(7)
                    && !board.in_check(us)
                    && safe(&[5, 6])
                {
                    moves.push(Move::castle(4, 6));
                }
                if board.castling_rights & CASTLE_WQ != 0
                    && empty(&[3, 2, 1])
                    && rook_home(0)
                    && !board.in_check(us)
                    && safe(&[3, 2])
                {
                    moves.push(Move::castle(4, 2));
                }
            }
            Color::Black if from == 60 => {
                if board.castling_rights & CASTLE_BK != 0
                    && empty(&[61, 62])
                    && rook_home(63)
                    && !board.in_check(us)
                    && safe(&[61, 62])
                {
                    moves.push(Move::castle(60, 62));
                }
                if board.castling_rights & CASTLE_BQ != 0
                    && empty(&[59, 58, 57])
                    && rook_home(56)
                    && !board.in_check(us)
                    && safe(&[59, 58])
                {
                    moves.push(Move::castle(60, 58));
                }
            }
            _ => {}
        }
    }
}

impl Default for MoveGen {
    fn default() -> Self {
        MoveGen::new()
    }
}

/// Count leaf nodes of the legal move tree to `depth`. The standard movegen
/// correctness benchmark.
pub fn perft(board: &mut Board, move_gen: &MoveGen, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let mut nodes = 0;
    for m in move_gen.gen_pseudo_legal_moves(board) {
        if let Some(undo) = board.make_move(m) {
            nodes += perft(board, move_gen, depth - 1);
            board.undo_move(&undo);
        }
    }
    nodes
}
