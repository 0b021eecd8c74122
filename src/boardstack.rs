//! A board plus the stacks a search needs: undo records for unwinding and
//! position hashes for repetition detection.
//!
//! The search drives one mutable `BoardStack` down and back up the tree via
//! `make_move` / `undo_move`. The hash stack always contains the hash of the
//! root position plus one entry per made move, so counting occurrences of the
//! current hash answers the repetition question directly.

use crate::board::{Board, Undo};
use crate::move_types::Move;

#[derive(Clone)]
pub struct BoardStack {
    current: Board,
    undo_stack: Vec<Undo>,
    hash_stack: Vec<u64>,
}

impl BoardStack {
    /// Stack rooted at the starting position.
    pub fn new() -> BoardStack {
        BoardStack::with_board(Board::start_position())
    }

    /// Stack rooted at an arbitrary position.
    pub fn with_board(board: Board) -> BoardStack {
        let hash = board.hash;
        BoardStack {
            current: board,
            undo_stack: Vec::new(),
            hash_stack: vec![hash],
        }
    }

    /// The position at the top of the stack.
    #[inline]
    pub fn current_state(&self) -> &Board {
        &self.current
    }

    /// Number of moves currently made on the stack.
    #[inline]
    pub fn ply(&self) -> usize {
        self.undo_stack.len()
    }

    /// Apply a move. Returns false (stack unchanged) if the move leaves the
    /// mover in check.
    pub fn make_move(&mut self, m: Move) -> bool {
        match self.current.make_move(m) {
            Some(undo) => {
                self.undo_stack.push(undo);
                self.hash_stack.push(self.current.hash);
                true
            }
            None => false,
        }
    }

    /// Take back the most recent move. No-op on an empty stack.
    pub fn undo_move(&mut self) {
        if let Some(undo) = self.undo_stack.pop() {
            self.hash_stack.pop();
            self.current.undo_move(&undo);
        }
    }

    /// How many times the current position's hash occurs in the line from
    /// the root, the current position included. A count of 2 means the
    /// position already occurred once before in this line.
    pub fn repetition_count(&self) -> usize {
        let hash = self.current.hash;
        self.hash_stack.iter().filter(|&&h| h == hash).count()
    }
}

impl Default for BoardStack {
    fn default() -> Self {
        BoardStack::new()
    }
}
