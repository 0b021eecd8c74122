//! Mailbox board representation with incremental Zobrist hashing.
//!
//! `Board` stores the 64-square mailbox, side to move, castling rights,
//! en-passant target, halfmove clock and the incrementally maintained hash.
//! `make_move` / `undo_move` are exact inverses; `make_move` rejects moves
//! that leave the mover's own king in check, restoring the position before
//! returning. Attack detection walks geometric rays directly rather than
//! going through move generation, so legality checks cannot recurse.

use crate::board_utils::{algebraic_to_sq, sq_to_algebraic, sq_to_file, sq_to_rank};
use crate::error::EngineError;
use crate::move_types::Move;
use crate::piece_types::{Color, Piece, PieceType};
use crate::zobrist::ZobristTable;
use std::sync::Arc;

/// Castling-rights bits.
pub const CASTLE_WK: u8 = 1;
pub const CASTLE_WQ: u8 = 2;
pub const CASTLE_BK: u8 = 4;
pub const CASTLE_BQ: u8 = 8;

/// All four rights, the starting mask.
pub const CASTLE_ALL: u8 = CASTLE_WK | CASTLE_WQ | CASTLE_BK | CASTLE_BQ;

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

const BISHOP_DIRS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const ROOK_DIRS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Everything needed to reverse one `make_move`.
#[derive(Debug, Clone, Copy)]
pub struct Undo {
    pub m: Move,
    /// Captured piece, if any. For en passant this pawn did not stand on the
    /// move's `to` square; `captured_sq` records where it was.
    pub captured: Option<Piece>,
    pub captured_sq: u8,
    pub en_passant: Option<u8>,
    pub castling_rights: u8,
    pub halfmove_clock: u32,
    pub hash: u64,
}

/// A chess position.
#[derive(Clone)]
pub struct Board {
    squares: [Option<Piece>; 64],
    pub side_to_move: Color,
    /// 4-bit mask of `CASTLE_*` flags.
    pub castling_rights: u8,
    /// Square a capturing pawn would land on, set only immediately after a
    /// double pawn push.
    pub en_passant: Option<u8>,
    /// Plies since the last pawn move or capture (fifty-move rule).
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
    /// Incrementally maintained Zobrist hash.
    pub hash: u64,
    zobrist: Arc<ZobristTable>,
}

impl std::fmt::Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Board")
            .field("fen", &self.to_fen())
            .field("hash", &format_args!("{:#018x}", self.hash))
            .finish()
    }
}

impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.squares == other.squares
            && self.side_to_move == other.side_to_move
            && self.castling_rights == other.castling_rights
            && self.en_passant == other.en_passant
            && self.halfmove_clock == other.halfmove_clock
            && self.hash == other.hash
    }
}

impl Eq for Board {}

impl Board {
    /// The standard starting position.
    pub fn start_position() -> Board {
        Board::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")
            .expect("startpos FEN is valid")
    }

    /// An empty board: no pieces, White to move, no rights. Mostly useful as
    /// a base for tests that place pieces by hand.
    pub fn empty() -> Board {
        let mut board = Board {
            squares: [None; 64],
            side_to_move: Color::White,
            castling_rights: 0,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            hash: 0,
            zobrist: Arc::new(ZobristTable::new()),
        };
        board.hash = board.recompute_hash();
        board
    }

    /// Parse a six-field FEN string.
    pub fn from_fen(fen: &str) -> Result<Board, EngineError> {
        let invalid = |reason: &str| EngineError::InvalidFen {
            fen: fen.to_string(),
            reason: reason.to_string(),
        };

        let mut fields = fen.split_whitespace();
        let placement = fields.next().ok_or_else(|| invalid("missing placement"))?;
        let stm = fields.next().ok_or_else(|| invalid("missing side to move"))?;
        let castling = fields.next().unwrap_or("-");
        let ep = fields.next().unwrap_or("-");
        let halfmove = fields.next().unwrap_or("0");
        let fullmove = fields.next().unwrap_or("1");

        let mut squares = [None; 64];
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(invalid("placement must have 8 ranks"));
        }
        for (i, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - i as u8; // FEN lists rank 8 first
            let mut file = 0u8;
            for c in rank_str.chars() {
                if let Some(skip) = c.to_digit(10) {
                    file += skip as u8;
                } else {
                    let piece = Piece::from_fen_char(c)
                        .ok_or_else(|| invalid("unknown piece character"))?;
                    if file >= 8 {
                        return Err(invalid("rank overflows 8 files"));
                    }
                    squares[(rank * 8 + file) as usize] = Some(piece);
                    file += 1;
                }
            }
            if file != 8 {
                return Err(invalid("rank does not cover 8 files"));
            }
        }

        let side_to_move = match stm {
            "w" => Color::White,
            "b" => Color::Black,
            _ => return Err(invalid("side to move must be w or b")),
        };

        let mut castling_rights = 0u8;
        if castling != "-" {
            for c in castling.chars() {
                castling_rights |= match c {
                    'K' => CASTLE_WK,
                    'Q' => CASTLE_WQ,
                    'k' => CASTLE_BK,
                    'q' => CASTLE_BQ,
                    _ => return Err(invalid("bad castling field")),
                };
            }
        }

        let en_passant = match ep {
            "-" => None,
            s => Some(algebraic_to_sq(s).ok_or_else(|| invalid("bad en-passant square"))?),
        };

        let halfmove_clock: u32 = halfmove
            .parse()
            .map_err(|_| invalid("bad halfmove clock"))?;
        let fullmove_number: u32 = fullmove
            .parse()
            .map_err(|_| invalid("bad fullmove number"))?;

        let mut board = Board {
            squares,
            side_to_move,
            castling_rights,
            en_passant,
            halfmove_clock,
            fullmove_number,
            hash: 0,
            zobrist: Arc::new(ZobristTable::new()),
        };
        if board.king_square(Color::White).is_none() || board.king_square(Color::Black).is_none() {
            return Err(invalid("both kings must be on the board"));
        }
        board.hash = board.recompute_hash();
        Ok(board)
    }

    /// Render the position as a FEN string.
    pub fn to_fen(&self) -> String {
        let mut s = String::new();
        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                match self.squares[(rank * 8 + file) as usize] {
                    Some(piece) => {
                        if empty > 0 {
                            s.push(char::from_digit(empty, 10).unwrap());
                            empty = 0;
                        }
                        s.push(piece.to_fen_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                s.push(char::from_digit(empty, 10).unwrap());
            }
            if rank > 0 {
                s.push('/');
            }
        }

        s.push(' ');
        s.push(match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        });

        s.push(' ');
        if self.castling_rights == 0 {
            s.push('-');
        } else {
            if self.castling_rights & CASTLE_WK != 0 {
                s.push('K');
            }
            if self.castling_rights & CASTLE_WQ != 0 {
                s.push('Q');
            }
            if self.castling_rights & CASTLE_BK != 0 {
                s.push('k');
            }
            if self.castling_rights & CASTLE_BQ != 0 {
                s.push('q');
            }
        }

        s.push(' ');
        match self.en_passant {
            Some(sq) => s.push_str(&sq_to_algebraic(sq)),
            None => s.push('-'),
        }

        s.push_str(&format!(" {} {}", self.halfmove_clock, self.fullmove_number));
        s
    }

    /// Piece on a square.
    #[inline]
    pub fn piece_at(&self, sq: u8) -> Option<Piece> {
        self.squares[sq as usize]
    }

    /// Place or clear a square directly, keeping the hash consistent. Meant
    /// for test setup; normal play goes through `make_move`.
    pub fn set_piece(&mut self, sq: u8, piece: Option<Piece>) {
        if let Some(old) = self.squares[sq as usize] {
            self.hash ^= self.zobrist.piece_key(old, sq);
        }
        self.squares[sq as usize] = piece;
        if let Some(new) = piece {
            self.hash ^= self.zobrist.piece_key(new, sq);
        }
    }

    /// Square of `color`'s king.
    pub fn king_square(&self, color: Color) -> Option<u8> {
        (0..64u8).find(|&sq| {
            matches!(
                self.squares[sq as usize],
                Some(p) if p.piece_type == PieceType::King && p.color == color
            )
        })
    }

    /// Recompute the Zobrist hash from scratch. `make_move` maintains the
    /// hash incrementally; this is the oracle the increments must agree with.
    pub fn recompute_hash(&self) -> u64 {
        let mut h = 0u64;
        for sq in 0..64u8 {
            if let Some(piece) = self.squares[sq as usize] {
                h ^= self.zobrist.piece_key(piece, sq);
            }
        }
        if self.side_to_move == Color::Black {
            h ^= self.zobrist.side_key();
        }
        h ^= self.zobrist.castling_key(self.castling_rights);
        h ^= self.zobrist.ep_key(self.en_passant);
        h
    }

    /// Does `by` attack `sq`? Walks pawn/knight/king offsets and slider rays
    /// from the target square outward.
    pub fn is_square_attacked(&self, sq: u8, by: Color) -> bool {
        let rank = sq_to_rank(sq) as i8;
        let file = sq_to_file(sq) as i8;

        // A pawn of `by` attacks from one rank closer to its own side.
        let pawn_rank = rank + if by == Color::White { -1 } else { 1 };
        if (0..8).contains(&pawn_rank) {
            for df in [-1i8, 1] {
                let pf = file + df;
                if (0..8).contains(&pf) {
                    if let Some(p) = self.squares[(pawn_rank * 8 + pf) as usize] {
                        if p.piece_type == PieceType::Pawn && p.color == by {
                            return true;
                        }
                    }
                }
            }
        }

        for (df, dr) in KNIGHT_OFFSETS {
            let (nf, nr) = (file + df, rank + dr);
            if (0..8).contains(&nf) && (0..8).contains(&nr) {
                if let Some(p) = self.squares[(nr * 8 + nf) as usize] {
                    if p.piece_type == PieceType::Knight && p.color == by {
                        return true;
                    }
                }
            }
        }

        for df in -1i8..=1 {
            for dr in -1i8..=1 {
                if df == 0 && dr == 0 {
                    continue;
                }
                let (nf, nr) = (file + df, rank + dr);
                if (0..8).contains(&nf) && (0..8).contains(&nr) {
                    if let Some(p) = self.squares[(nr * 8 + nf) as usize] {
                        if p.piece_type == PieceType::King && p.color == by {
                            return true;
                        }
                    }
                }
            }
        }

        let ray_hits = |dirs: &[(i8, i8)], slider: PieceType| -> bool {
            for &(df, dr) in dirs {
                let (mut nf, mut nr) = (file + df, rank + dr);
                while (0..8).contains(&nf) && (0..8).contains(&nr) {
                    if let Some(p) = self.squares[(nr * 8 + nf) as usize] {
                        if p.color == by
                            && (p.piece_type == slider || p.piece_type == PieceType::Queen)
                        {
                            return true;
                        }
                        break;
                    }
                    nf += df;
                    nr += dr;
                }
            }
            false
        };

        ray_hits(&BISHOP_DIRS, PieceType::Bishop) || ray_hits(&ROOK_DIRS, PieceType::Rook)
    }

    /// Is `color`'s king attacked?
    pub fn in_check(&self, color: Color) -> bool {
        match self.king_square(color) {
            Some(k) => self.is_square_attacked(k, color.opposite()),
            None => false,
        }
    }

    /// Apply a move. Returns the undo record, or `None` (position restored)
    /// when the move would leave the mover's own king in check.
    ///
    /// The hash is updated incrementally in lockstep with each board
    /// mutation so that the incremental value always equals
    /// [`Board::recompute_hash`] once the move completes.
    pub fn make_move(&mut self, m: Move) -> Option<Undo> {
        let moving = self.squares[m.from as usize]?;
        debug_assert_eq!(moving.color, self.side_to_move);

        let mut undo = Undo {
            m,
            captured: None,
            captured_sq: m.to,
            en_passant: self.en_passant,
            castling_rights: self.castling_rights,
            halfmove_clock: self.halfmove_clock,
            hash: self.hash,
        };

        let resets_clock = moving.piece_type == PieceType::Pawn || m.is_capture || m.is_en_passant;
        self.halfmove_clock = if resets_clock {
            0
        } else {
            self.halfmove_clock + 1
        };

        // Remove the old EP / castling / side terms; the new ones go back in
        // after legality is confirmed.
        self.hash ^= self.zobrist.ep_key(self.en_passant);
        self.hash ^= self.zobrist.castling_key(self.castling_rights);
        if self.side_to_move == Color::Black {
            self.hash ^= self.zobrist.side_key();
        }

        self.en_passant = None;

        if m.is_en_passant {
            // The victim pawn sits one rank behind the target square.
            let cap_sq = if moving.color == Color::White {
                m.to - 8
            } else {
                m.to + 8
            };
            undo.captured = self.squares[cap_sq as usize];
            undo.captured_sq = cap_sq;
            if let Some(victim) = undo.captured {
                self.hash ^= self.zobrist.piece_key(victim, cap_sq);
            }
            self.squares[cap_sq as usize] = None;
        } else if m.is_capture {
            undo.captured = self.squares[m.to as usize];
            undo.captured_sq = m.to;
            if let Some(victim) = undo.captured {
                self.hash ^= self.zobrist.piece_key(victim, m.to);
            }
        }

        self.hash ^= self.zobrist.piece_key(moving, m.from);
        self.squares[m.to as usize] = self.squares[m.from as usize];
        self.squares[m.from as usize] = None;
        self.hash ^= self.zobrist.piece_key(moving, m.to);

        if let Some(promo) = m.promotion {
            self.hash ^= self.zobrist.piece_key(moving, m.to);
            let promoted = Piece::new(promo, moving.color);
            self.hash ^= self.zobrist.piece_key(promoted, m.to);
            self.squares[m.to as usize] = Some(promoted);
        }

        if m.is_castle {
            let (rook_from, rook_to) = match m.to {
                6 => (7u8, 5u8),
                2 => (0, 3),
                62 => (63, 61),
                58 => (56, 59),
                _ => unreachable!("castle move with non-castle target"),
            };
            if let Some(rook) = self.squares[rook_from as usize] {
                self.hash ^= self.zobrist.piece_key(rook, rook_from);
                self.hash ^= self.zobrist.piece_key(rook, rook_to);
            }
            self.squares[rook_to as usize] = self.squares[rook_from as usize];
            self.squares[rook_from as usize] = None;
        }

        // Any move touching a king or rook home square clears the matching
        // rights; a capture landing on a rook square clears the victim's.
        let mut clear_if_touched = |sq: u8, mask: u8| {
            if m.from == sq || m.to == sq {
                self.castling_rights &= !mask;
            }
        };
        clear_if_touched(4, CASTLE_WK | CASTLE_WQ);
        clear_if_touched(0, CASTLE_WQ);
        clear_if_touched(7, CASTLE_WK);
        clear_if_touched(60, CASTLE_BK | CASTLE_BQ);
        clear_if_touched(56, CASTLE_BQ);
        clear_if_touched(63, CASTLE_BK);

        if moving.piece_type == PieceType::Pawn {
            let from_rank = sq_to_rank(m.from);
            let to_rank = sq_to_rank(m.to);
            if from_rank.abs_diff(to_rank) == 2 {
                self.en_passant = Some((m.from + m.to) / 2);
            }
        }

        if self.side_to_move == Color::Black {
            self.fullmove_number += 1;
        }
        self.side_to_move = self.side_to_move.opposite();

        // The mover may not leave their own king in check.
        if self.in_check(self.side_to_move.opposite()) {
            self.undo_move(&undo);
            return None;
        }

        self.hash ^= self.zobrist.ep_key(self.en_passant);
        self.hash ^= self.zobrist.castling_key(self.castling_rights);
        if self.side_to_move == Color::Black {
            self.hash ^= self.zobrist.side_key();
        }

        debug_assert_eq!(self.hash, self.recompute_hash());
        Some(undo)
    }

    /// Reverse a `make_move`. EP square, castling rights, halfmove clock and
    /// hash come back verbatim from the undo record.
    pub fn undo_move(&mut self, undo: &Undo) {
        let m = undo.m;

        if self.side_to_move == Color::White {
            self.fullmove_number -= 1;
        }
        self.side_to_move = self.side_to_move.opposite();
        self.en_passant = undo.en_passant;
        self.castling_rights = undo.castling_rights;
        self.halfmove_clock = undo.halfmove_clock;
        self.hash = undo.hash;

        if m.is_castle {
            let (rook_from, rook_to) = match m.to {
                6 => (7u8, 5u8),
                2 => (0, 3),
                62 => (63, 61),
                58 => (56, 59),
                _ => unreachable!("castle move with non-castle target"),
            };
            self.squares[rook_from as usize] = self.squares[rook_to as usize];
            self.squares[rook_to as usize] = None;
        }

        self.squares[m.from as usize] = self.squares[m.to as usize];
        self.squares[m.to as usize] = None;

        if m.promotion.is_some() {
            if let Some(piece) = self.squares[m.from as usize] {
                self.squares[m.from as usize] = Some(Piece::new(PieceType::Pawn, piece.color));
            }
        }

        if let Some(captured) = undo.captured {
            self.squares[undo.captured_sq as usize] = Some(captured);
        }
    }

    /// Insufficient-material draw: K vs K, K+minor vs K, or K+B vs K+B
    /// (regardless of bishop square colors). Any pawn, rook or queen on the
    /// board disables the detection.
    pub fn is_insufficient_material(&self) -> bool {
        let mut minors = [0u32; 2];
        let mut bishops = [0u32; 2];
        let mut knights = [0u32; 2];

        for sq in 0..64 {
            let Some(piece) = self.squares[sq] else {
                continue;
            };
            match piece.piece_type {
                PieceType::King => {}
                PieceType::Pawn | PieceType::Rook | PieceType::Queen => return false,
                PieceType::Bishop => {
                    minors[piece.color.index()] += 1;
                    bishops[piece.color.index()] += 1;
                }
                PieceType::Knight => {
                    minors[piece.color.index()] += 1;
                    knights[piece.color.index()] += 1;
                }
            }
        }

        let (wm, bm) = (minors[0], minors[1]);
        if wm == 0 && bm == 0 {
            return true;
        }
        if wm == 1 && bm == 0 && (bishops[0] == 1 || knights[0] == 1) {
            return true;
        }
        if bm == 1 && wm == 0 && (bishops[1] == 1 || knights[1] == 1) {
            return true;
        }
        wm == 1 && bm == 1 && bishops[0] == 1 && bishops[1] == 1
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::start_position()
    }
}
