//! Negamax alpha-beta search.
//!
//! One `SearchContext` belongs to one search: it owns the killer and history
//! tables, the node counters and the time-control latch. The search walks a
//! single mutable `BoardStack` down and back up via make/undo; draws by
//! repetition, the fifty-move rule and insufficient material are scored 0 at
//! interior nodes.

use crate::board::Board;
use crate::boardstack::BoardStack;
use crate::eval::Evaluator;
use crate::move_generation::MoveGen;
use crate::move_types::{Move, NULL_MOVE};
use crate::piece_types::PieceType;
use crate::search::history::HistoryTable;
use crate::search::quiescence::quiescence;
use crate::search::{INF, MATE, MAX_PLY};
use crate::transposition::{Bound, TranspositionTable};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Ordering score for the transposition-table move.
const TT_MOVE_SCORE: i32 = 1_000_000;
/// Base ordering score for captures; MVV-LVA is added on top.
const CAPTURE_SCORE: i32 = 100_000;
/// Ordering scores for the two killer slots.
const KILLER_SCORES: [i32; 2] = [90_000, 80_000];

/// Mutable state owned by one search.
pub struct SearchContext {
    pub killers: [[Move; 2]; MAX_PLY],
    pub history: HistoryTable,
    pub nodes: u64,
    pub qnodes: u64,
    start: Instant,
    time_limit: Duration,
    stop: bool,
    external_stop: Option<Arc<AtomicBool>>,
}

impl SearchContext {
    pub fn new(time_limit: Duration, external_stop: Option<Arc<AtomicBool>>) -> SearchContext {
        SearchContext {
            killers: [[NULL_MOVE; 2]; MAX_PLY],
            history: HistoryTable::new(),
            nodes: 0,
            qnodes: 0,
            start: Instant::now(),
            time_limit,
            stop: false,
            external_stop,
        }
    }

    /// Milliseconds since the search started.
    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    /// Check the clock and the caller's stop flag. Once this returns true it
    /// latches and every later call returns true immediately.
    pub fn time_up(&mut self) -> bool {
        if self.stop {
            return true;
        }
        if let Some(flag) = &self.external_stop {
            if flag.load(Ordering::Relaxed) {
                self.stop = true;
                return true;
            }
        }
        if self.start.elapsed() >= self.time_limit {
            self.stop = true;
            return true;
        }
        false
    }

    /// Has the stop latch fired?
    #[inline]
    pub fn stopped(&self) -> bool {
        self.stop
    }
}

/// Victim-times-ten minus attacker, in centipawns. En passant's victim is a
/// pawn even though the target square is empty.
pub fn mvv_lva_score(board: &Board, m: &Move) -> i32 {
    let attacker = board
        .piece_at(m.from)
        .map_or(0, |p| p.piece_type.value());
    let victim = if m.is_en_passant {
        PieceType::Pawn.value()
    } else if m.is_capture {
        board.piece_at(m.to).map_or(0, |p| p.piece_type.value())
    } else {
        0
    };
    victim * 10 - attacker
}

/// Move-ordering score; higher is searched first.
pub fn score_move(
    board: &Board,
    ctx: &SearchContext,
    m: &Move,
    tt_move: &Move,
    ply: usize,
) -> i32 {
    if tt_move.from == m.from && tt_move.to == m.to && tt_move.promotion == m.promotion {
        return TT_MOVE_SCORE;
    }

    if m.is_capture || m.is_en_passant {
        return CAPTURE_SCORE + mvv_lva_score(board, m);
    }

    if ply < MAX_PLY {
        if ctx.killers[ply][0] == *m {
            return KILLER_SCORES[0];
        }
        if ctx.killers[ply][1] == *m {
            return KILLER_SCORES[1];
        }
    }

    ctx.history.score(board.side_to_move, m)
}

/// Negamax with alpha-beta pruning and late-move reductions. Returns the
/// score from the side to move's perspective; returns 0 immediately once the
/// stop latch has fired (the iterative-deepening driver discards interrupted
/// iterations, so the bogus 0 never reaches a final result).
#[allow(clippy::too_many_arguments)]
pub fn negamax(
    board: &mut BoardStack,
    move_gen: &MoveGen,
    evaluator: &Evaluator,
    tt: &mut TranspositionTable,
    ctx: &mut SearchContext,
    depth: i32,
    mut alpha: i32,
    mut beta: i32,
    ply: i32,
) -> i32 {
    if ctx.time_up() {
        return 0;
    }
    ctx.nodes += 1;

    let state = board.current_state();
    if state.is_insufficient_material() {
        return 0;
    }
    if state.halfmove_clock >= 100 {
        return 0;
    }
    if board.repetition_count() >= 2 {
        return 0;
    }

    let hash = board.current_state().hash;
    let mut tt_move = NULL_MOVE;
    if let Some(entry) = tt.probe(hash) {
        tt_move = entry.best;
        if entry.depth >= depth {
            let score = entry.score;
            match entry.bound {
                Bound::Exact => return score,
                Bound::Lower => alpha = alpha.max(score),
                Bound::Upper => beta = beta.min(score),
            }
            if alpha >= beta {
                return score;
            }
        }
    }

    let mut moves = move_gen.gen_legal_moves(board.current_state());

    if depth == 0 {
        return quiescence(board, move_gen, evaluator, ctx, alpha, beta);
    }

    if moves.is_empty() {
        if board.current_state().in_check(board.current_state().side_to_move) {
            return -MATE + ply;
        }
        return 0;
    }

    moves.sort_by_key(|m| {
        -score_move(board.current_state(), ctx, m, &tt_move, ply as usize)
    });

    let original_alpha = alpha;
    let mut best = -INF;
    let mut best_move = NULL_MOVE;

    for (i, &m) in moves.iter().enumerate() {
        if !board.make_move(m) {
            continue;
        }

        let new_depth = depth - 1;
        let gives_check = board
            .current_state()
            .in_check(board.current_state().side_to_move);

        // Late-move reduction: late quiet moves that do not give check get a
        // reduced null-window probe first, with a full re-search on fail-high.
        let score = if new_depth >= 3 && i >= 4 && m.is_quiet() && !gives_check {
            let reduced = -negamax(
                board,
                move_gen,
                evaluator,
                tt,
                ctx,
                new_depth - 1,
                -alpha - 1,
                -alpha,
                ply + 1,
            );
            if reduced > alpha {
                -negamax(
                    board, move_gen, evaluator, tt, ctx, new_depth, -beta, -alpha, ply + 1,
                )
            } else {
                reduced
            }
        } else {
            -negamax(
                board, move_gen, evaluator, tt, ctx, new_depth, -beta, -alpha, ply + 1,
            )
        };

        board.undo_move();

        if ctx.stopped() {
            return 0;
        }

        if score > best {
            best = score;
            best_move = m;
        }

        alpha = alpha.max(score);
        if alpha >= beta {
            if m.is_quiet() && (ply as usize) < MAX_PLY {
                let ply = ply as usize;
                if ctx.killers[ply][0] != m {
                    ctx.killers[ply][1] = ctx.killers[ply][0];
                    ctx.killers[ply][0] = m;
                }
                ctx.history
                    .update(board.current_state().side_to_move, &m, depth);
            }
            break;
        }
    }

    let bound = if best <= original_alpha {
        Bound::Upper
    } else if best >= beta {
        Bound::Lower
    } else {
        Bound::Exact
    };
    tt.store(hash, depth, best, bound, best_move);

    best
}
