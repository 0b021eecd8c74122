//! Iterative deepening driver.
//!
//! Runs the root search at depth 1, 2, ... until the depth cap or the time
//! budget is hit. From depth 3 the window is an aspiration window of ±50
//! centipawns around the previous score; a root fail-high re-searches that
//! move at the full window before ending the iteration. Only fully completed
//! iterations update the returned move, so a timeout can never surface a
//! score polluted by the stop latch.

use crate::boardstack::BoardStack;
use crate::eval::Evaluator;
use crate::move_generation::MoveGen;
use crate::move_types::{Move, NULL_MOVE};
use crate::search::alpha_beta::{negamax, score_move, SearchContext};
use crate::search::INF;
use crate::transposition::TranspositionTable;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

/// Half-width of the root aspiration window, in centipawns.
const ASPIRATION_WINDOW: i32 = 50;

/// Depth from which aspiration windows apply.
const ASPIRATION_MIN_DEPTH: i32 = 3;

/// Caller-supplied search budget.
#[derive(Debug, Clone, Default)]
pub struct SearchLimits {
    /// Maximum iterative-deepening depth.
    pub max_depth: i32,
    /// Time budget in milliseconds.
    pub time_ms: u64,
    /// Optional cooperative stop flag; setting it latches the same stop as
    /// running out of time.
    pub stop: Option<Arc<AtomicBool>>,
}

impl SearchLimits {
    pub fn new(max_depth: i32, time_ms: u64) -> SearchLimits {
        SearchLimits {
            max_depth,
            time_ms,
            stop: None,
        }
    }
}

/// Outcome of a search.
#[derive(Debug, Clone, Copy)]
pub struct SearchResult {
    /// Best move from the last completed iteration; the null move if the
    /// position has no legal moves.
    pub best_move: Move,
    /// Score of `best_move` from the side to move's perspective.
    pub score: i32,
    /// Deepest fully completed iteration.
    pub depth: i32,
    pub nodes: u64,
    pub qnodes: u64,
    pub time_ms: u64,
}

/// Search `board` under `limits` and return the best move found.
pub fn iterative_deepening_search(
    board: &mut BoardStack,
    move_gen: &MoveGen,
    evaluator: &Evaluator,
    tt: &mut TranspositionTable,
    limits: &SearchLimits,
    verbose: bool,
) -> SearchResult {
    let mut ctx = SearchContext::new(
        Duration::from_millis(limits.time_ms),
        limits.stop.clone(),
    );

    let mut root_moves = move_gen.gen_legal_moves(board.current_state());
    if root_moves.is_empty() {
        return SearchResult {
            best_move: NULL_MOVE,
            score: 0,
            depth: 0,
            nodes: 0,
            qnodes: 0,
            time_ms: ctx.elapsed_ms(),
        };
    }

    let mut best_move = root_moves[0];
    let mut best_score = -INF;
    let mut depth_reached = 0;

    for depth in 1..=limits.max_depth {
        if ctx.time_up() {
            break;
        }

        let (mut alpha, beta) = if depth >= ASPIRATION_MIN_DEPTH {
            (best_score - ASPIRATION_WINDOW, best_score + ASPIRATION_WINDOW)
        } else {
            (-INF, INF)
        };

        let tt_move = tt
            .probe(board.current_state().hash)
            .map_or(NULL_MOVE, |e| e.best);
        root_moves.sort_by_key(|m| {
            -score_move(board.current_state(), &ctx, m, &tt_move, 0)
        });

        let mut local_best = -INF;
        let mut local_move = root_moves[0];

        for &m in root_moves.iter() {
            if ctx.time_up() {
                break;
            }
            if !board.make_move(m) {
                continue;
            }
            let score = -negamax(
                board, move_gen, evaluator, tt, &mut ctx, depth - 1, -beta, -alpha, 1,
            );
            board.undo_move();

            if ctx.stopped() {
                break;
            }

            if score > local_best {
                local_best = score;
                local_move = m;
            }

            alpha = alpha.max(score);

            if alpha >= beta {
                // Aspiration fail-high at the root: re-search this move at
                // the full window, then end the iteration. Remaining root
                // moves are not re-run under the widened window; a better
                // late move can be missed at this depth.
                if board.make_move(m) {
                    let rescore = -negamax(
                        board, move_gen, evaluator, tt, &mut ctx, depth - 1, -INF, INF, 1,
                    );
                    board.undo_move();
                    if !ctx.stopped() && rescore > local_best {
                        local_best = rescore;
                        local_move = m;
                    }
                }
                break;
            }
        }

        if !ctx.stopped() {
            best_score = local_best;
            best_move = local_move;
            depth_reached = depth;

            if verbose {
                let elapsed = ctx.elapsed_ms();
                let nodes = ctx.nodes + ctx.qnodes;
                let nps = if elapsed > 0 {
                    nodes * 1000 / elapsed
                } else {
                    0
                };
                println!(
                    "info depth {} score cp {} time {} nodes {} nps {} pv {}",
                    depth, best_score, elapsed, nodes, nps, best_move
                );
            }
        }
    }

    SearchResult {
        best_move,
        score: best_score,
        depth: depth_reached,
        nodes: ctx.nodes,
        qnodes: ctx.qnodes,
        time_ms: ctx.elapsed_ms(),
    }
}
