//! Quiescence search.
//!
//! Past nominal depth the search keeps resolving captures, en-passant
//! captures and promotions so that a leaf evaluation never lands in the
//! middle of an exchange (the horizon effect). Stand-pat: the static
//! evaluation bounds the score immediately, since the side to move can
//! usually decline all captures.

use crate::boardstack::BoardStack;
use crate::eval::Evaluator;
use crate::move_generation::MoveGen;
use crate::search::alpha_beta::{mvv_lva_score, SearchContext};

/// Search noisy moves only, returning a score within `[alpha, beta]`.
pub fn quiescence(
    board: &mut BoardStack,
    move_gen: &MoveGen,
    evaluator: &Evaluator,
    ctx: &mut SearchContext,
    mut alpha: i32,
    beta: i32,
) -> i32 {
    if ctx.time_up() {
        return 0;
    }
    ctx.qnodes += 1;

    let stand_pat = evaluator.eval(board.current_state(), move_gen);
    if stand_pat >= beta {
        return beta;
    }
    if stand_pat > alpha {
        alpha = stand_pat;
    }

    // Noisy pseudo-moves, legality-checked by make/undo.
    let mut moves: Vec<_> = move_gen
        .gen_pseudo_legal_moves(board.current_state())
        .into_iter()
        .filter(|m| m.is_capture || m.is_en_passant || m.promotion.is_some())
        .filter(|&m| {
            if board.make_move(m) {
                board.undo_move();
                true
            } else {
                false
            }
        })
        .collect();

    moves.sort_by_key(|m| -mvv_lva_score(board.current_state(), m));

    for m in moves {
        if !board.make_move(m) {
            continue;
        }
        let score = -quiescence(board, move_gen, evaluator, ctx, -beta, -alpha);
        board.undo_move();

        if score >= beta {
            return beta;
        }
        if score > alpha {
            alpha = score;
        }
    }

    alpha
}
