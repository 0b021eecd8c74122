//! Static evaluation.
//!
//! Returns a centipawn score from the side to move's perspective: material,
//! piece-square tables (with a separate endgame king table), bishop pair,
//! doubled/isolated pawns, a light mobility term and a middlegame king-safety
//! term. The per-color tables bake the material value into the square bonus
//! at construction, so the hot loop is a single table read per piece.

use crate::board::{Board, CASTLE_BK, CASTLE_BQ, CASTLE_WK, CASTLE_WQ};
use crate::board_utils::{flip_sq_vertically, sq_to_file, sq_to_rank};
use crate::eval_constants::{
    BISHOP_PAIR_BONUS, DOUBLED_PAWN_PENALTY, ENDGAME_PHASE, GAMEPHASE_INC, ISOLATED_PAWN_PENALTY,
    KING_CENTER_PENALTY, LOST_CASTLING_PENALTY, MAX_PHASE, MOBILITY_WEIGHT, PST_BISHOP,
    PST_KING_EG, PST_KING_MG, PST_KNIGHT, PST_PAWN, PST_QUEEN, PST_ROOK,
};
use crate::move_generation::MoveGen;
use crate::piece_types::{Color, PieceType};

const WHITE: usize = 0;
const BLACK: usize = 1;

fn pst_for(piece_type: PieceType, endgame: bool) -> &'static [i32; 64] {
    match piece_type {
        PieceType::Pawn => &PST_PAWN,
        PieceType::Knight => &PST_KNIGHT,
        PieceType::Bishop => &PST_BISHOP,
        PieceType::Rook => &PST_ROOK,
        PieceType::Queen => &PST_QUEEN,
        PieceType::King => {
            if endgame {
                &PST_KING_EG
            } else {
                &PST_KING_MG
            }
        }
    }
}

/// Static evaluator with per-color value+PST tables baked at construction.
pub struct Evaluator {
    /// `mg_table[color][piece_type][square]`, material value included.
    mg_table: [[[i32; 64]; 6]; 2],
    eg_table: [[[i32; 64]; 6]; 2],
}

impl Evaluator {
    pub fn new() -> Evaluator {
        let mut mg_table = [[[0; 64]; 6]; 2];
        let mut eg_table = [[[0; 64]; 6]; 2];

        for piece_type in [
            PieceType::Pawn,
            PieceType::Knight,
            PieceType::Bishop,
            PieceType::Rook,
            PieceType::Queen,
            PieceType::King,
        ] {
            let p = piece_type.index();
            let value = piece_type.value();
            for sq in 0..64usize {
                let mirrored = flip_sq_vertically(sq as u8) as usize;
                mg_table[WHITE][p][sq] = value + pst_for(piece_type, false)[sq];
                eg_table[WHITE][p][sq] = value + pst_for(piece_type, true)[sq];
                mg_table[BLACK][p][sq] = value + pst_for(piece_type, false)[mirrored];
                eg_table[BLACK][p][sq] = value + pst_for(piece_type, true)[mirrored];
            }
        }

        Evaluator { mg_table, eg_table }
    }

    /// Game phase in [0, 24]: minor pieces count 1, rooks 2, queens 4.
    pub fn game_phase(&self, board: &Board) -> i32 {
        let mut phase = 0;
        for sq in 0..64u8 {
            if let Some(piece) = board.piece_at(sq) {
                phase += GAMEPHASE_INC[piece.piece_type.index()];
            }
        }
        phase.clamp(0, MAX_PHASE)
    }

    /// Evaluate `board` in centipawns from the side to move's perspective.
    pub fn eval(&self, board: &Board, move_gen: &MoveGen) -> i32 {
        let phase = self.game_phase(board);
        let endgame = phase <= ENDGAME_PHASE;

        let mut score = 0; // from White's point of view
        let mut bishops = [0i32; 2];
        let mut pawn_files = [[0i32; 8]; 2];

        for sq in 0..64u8 {
            let Some(piece) = board.piece_at(sq) else {
                continue;
            };
            let c = piece.color.index();
            let p = piece.piece_type.index();
            let table = if endgame {
                &self.eg_table
            } else {
                &self.mg_table
            };
            let entry = table[c][p][sq as usize];
            score += if piece.color == Color::White {
                entry
            } else {
                -entry
            };

            match piece.piece_type {
                PieceType::Bishop => bishops[c] += 1,
                PieceType::Pawn => pawn_files[c][sq_to_file(sq) as usize] += 1,
                _ => {}
            }
        }

        if bishops[WHITE] >= 2 {
            score += BISHOP_PAIR_BONUS;
        }
        if bishops[BLACK] >= 2 {
            score -= BISHOP_PAIR_BONUS;
        }

        score += pawn_structure(&pawn_files[WHITE]) - pawn_structure(&pawn_files[BLACK]);
        score += mobility(board, move_gen);

        if !endgame {
            score -= king_center_penalty(board, Color::White);
            score += king_center_penalty(board, Color::Black);

            if board.castling_rights & (CASTLE_WK | CASTLE_WQ) == 0 {
                score -= LOST_CASTLING_PENALTY;
            }
            if board.castling_rights & (CASTLE_BK | CASTLE_BQ) == 0 {
                score += LOST_CASTLING_PENALTY;
            }
        }

        match board.side_to_move {
            Color::White => score,
            Color::Black => -score,
        }
    }
}

/// Doubled and isolated pawn penalties for one side (negative is bad for
/// that side; the caller applies the sign).
fn pawn_structure(files: &[i32; 8]) -> i32 {
    let mut score = 0;
    for f in 0..8 {
        if files[f] >= 2 {
            score -= DOUBLED_PAWN_PENALTY * (files[f] - 1);
        }
        if files[f] > 0 {
            let left = f > 0 && files[f - 1] > 0;
            let right = f < 7 && files[f + 1] > 0;
            if !left && !right {
                score -= ISOLATED_PAWN_PENALTY;
            }
        }
    }
    score
}

/// Pseudo-move count difference, White minus Black, lightly weighted. Runs
/// the generator twice on a scratch copy with the side to move overridden;
/// legality is too expensive at evaluation nodes.
fn mobility(board: &Board, move_gen: &MoveGen) -> i32 {
    let mut scratch = board.clone();
    scratch.side_to_move = Color::White;
    let white = move_gen.gen_pseudo_legal_moves(&scratch).len() as i32;
    scratch.side_to_move = Color::Black;
    let black = move_gen.gen_pseudo_legal_moves(&scratch).len() as i32;
    (white - black) * MOBILITY_WEIGHT
}

/// Penalty for a king sitting on the d/e/f files near its own back rank
/// without having castled away.
fn king_center_penalty(board: &Board, color: Color) -> i32 {
    let Some(king_sq) = board.king_square(color) else {
        return 0;
    };
    let file = sq_to_file(king_sq) as i32;
    if (file - 4).abs() > 1 {
        return 0;
    }
    let rank = sq_to_rank(king_sq) as i32;
    let home = if color == Color::White { 0 } else { 7 };
    match (rank - home).abs() {
        0 => KING_CENTER_PENALTY[0],
        1 => KING_CENTER_PENALTY[1],
        2 => KING_CENTER_PENALTY[2],
        _ => 0,
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Evaluator::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startpos_is_balanced() {
        let board = Board::start_position();
        let evaluator = Evaluator::new();
        let move_gen = MoveGen::new();
        assert_eq!(evaluator.eval(&board, &move_gen), 0);
    }

    #[test]
    fn test_eval_is_antisymmetric_in_side_to_move() {
        let evaluator = Evaluator::new();
        let move_gen = MoveGen::new();
        let white = Board::from_fen("4k3/8/8/3q4/8/8/8/4K3 w - - 0 1").unwrap();
        let black = Board::from_fen("4k3/8/8/3q4/8/8/8/4K3 b - - 0 1").unwrap();
        assert_eq!(
            evaluator.eval(&white, &move_gen),
            -evaluator.eval(&black, &move_gen)
        );
    }

    #[test]
    fn test_material_advantage_dominates() {
        let evaluator = Evaluator::new();
        let move_gen = MoveGen::new();
        // White up a queen, White to move: clearly positive.
        let board = Board::from_fen("4k3/8/8/3Q4/8/8/8/4K3 w - - 0 1").unwrap();
        assert!(evaluator.eval(&board, &move_gen) > 500);
    }

    #[test]
    fn test_phase_counts_material() {
        let evaluator = Evaluator::new();
        assert_eq!(evaluator.game_phase(&Board::start_position()), 24);
        let endgame = Board::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(evaluator.game_phase(&endgame), 0);
    }
}
