//! Zobrist hashing keys.
//!
//! A position's hash is the XOR of one precomputed random value per
//! piece-on-square, plus terms for the side to move, the castling-rights mask
//! and the en-passant file. The table is filled from a fixed seed so every
//! instance is identical; boards share one table through an `Arc` rather than
//! a process-wide global.

use crate::piece_types::Piece;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// Index into [`ZobristTable::ep_file`] meaning "no en-passant square".
pub const EP_NONE: usize = 8;

const ZOBRIST_SEED: u64 = 0xC0FF_EE12_34;

/// Precomputed random keys for incremental position hashing.
pub struct ZobristTable {
    /// `psq[color][piece_type][square]`
    psq: [[[u64; 64]; 6]; 2],
    /// XORed in when Black is to move.
    side_to_move: u64,
    /// Indexed by the 4-bit castling mask.
    castling: [u64; 16],
    /// Indexed by en-passant file, or [`EP_NONE`].
    ep_file: [u64; 9],
}

impl ZobristTable {
    pub fn new() -> ZobristTable {
        let mut rng = StdRng::seed_from_u64(ZOBRIST_SEED);
        let mut psq = [[[0u64; 64]; 6]; 2];
        for color in 0..2 {
            for piece in 0..6 {
                for sq in 0..64 {
                    psq[color][piece][sq] = rng.next_u64();
                }
            }
        }
        let side_to_move = rng.next_u64();
        let mut castling = [0u64; 16];
        for key in castling.iter_mut() {
            *key = rng.next_u64();
        }
        let mut ep_file = [0u64; 9];
        for key in ep_file.iter_mut() {
            *key = rng.next_u64();
        }
        ZobristTable {
            psq,
            side_to_move,
            castling,
            ep_file,
        }
    }

    /// Key for a piece standing on a square.
    #[inline]
    pub fn piece_key(&self, piece: Piece, sq: u8) -> u64 {
        self.psq[piece.color.index()][piece.piece_type.index()][sq as usize]
    }

    /// Key toggled when the side to move is Black.
    #[inline]
    pub fn side_key(&self) -> u64 {
        self.side_to_move
    }

    /// Key for a castling-rights mask.
    #[inline]
    pub fn castling_key(&self, mask: u8) -> u64 {
        self.castling[(mask & 0xF) as usize]
    }

    /// Key for the en-passant file of `ep_square`, or the no-EP key.
    #[inline]
    pub fn ep_key(&self, ep_square: Option<u8>) -> u64 {
        match ep_square {
            Some(sq) => self.ep_file[(sq % 8) as usize],
            None => self.ep_file[EP_NONE],
        }
    }
}

impl Default for ZobristTable {
    fn default() -> Self {
        ZobristTable::new()
    }
}
