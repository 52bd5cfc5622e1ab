use std::fmt;

use super::types::*;
use super::zobrist;
use crate::error::{ChessError, Result};

/// Plain 64-cell position. Applying a move returns a new value; the input is never mutated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    board: [Option<Piece>; 64],
    side_to_move: Color,
    castling: CastlingRights,
    en_passant: Option<Square>,
    halfmove_clock: u32,
    fullmove_number: u32,
    last_move: Option<Move>,
    key: u64,
}

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

impl Default for Position {
    fn default() -> Self { Self::startpos() }
}

impl Position {
    pub fn startpos() -> Self {
        let mut board = [None; 64];
        for file in 0..8i8 {
            board[square(file, 0) as usize] = Some(Piece::new(BACK_RANK[file as usize], Color::White));
            board[square(file, 1) as usize] = Some(Piece::new(PieceKind::Pawn, Color::White));
            board[square(file, 6) as usize] = Some(Piece::new(PieceKind::Pawn, Color::Black));
            board[square(file, 7) as usize] = Some(Piece::new(BACK_RANK[file as usize], Color::Black));
        }
        let mut pos = Self {
            board,
            side_to_move: Color::White,
            castling: CastlingRights::ALL,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            last_move: None,
            key: 0,
        };
        pos.key = zobrist::compute(&pos);
        pos
    }

    pub fn builder() -> PositionBuilder { PositionBuilder::default() }

    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> { self.board[sq as usize] }
    #[inline]
    pub fn side_to_move(&self) -> Color { self.side_to_move }
    #[inline]
    pub fn castling(&self) -> CastlingRights { self.castling }
    #[inline]
    pub fn en_passant(&self) -> Option<Square> { self.en_passant }
    #[inline]
    pub fn halfmove_clock(&self) -> u32 { self.halfmove_clock }
    #[inline]
    pub fn fullmove_number(&self) -> u32 { self.fullmove_number }
    #[inline]
    pub fn last_move(&self) -> Option<Move> { self.last_move }
    #[inline]
    pub fn key(&self) -> u64 { self.key }

    /// Occupied squares with their pieces, a1 first.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.board.iter().enumerate().filter_map(|(i, p)| p.map(|p| (i as Square, p)))
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces().find(|(_, p)| p.kind == PieceKind::King && p.color == color).map(|(sq, _)| sq)
    }

    /// Returns the position after `mv`; `mv` must come from this position's generator.
    pub fn apply(&self, mv: &Move) -> Position {
        let mut next = self.clone();
        let side = self.side_to_move;
        let piece = match self.board[mv.from as usize] {
            Some(p) => p,
            None => return next,
        };
        let ep_victim = square(file_of(mv.to), rank_of(mv.from));
        let captured = if mv.en_passant { self.board[ep_victim as usize] } else { self.board[mv.to as usize] };

        next.board[mv.from as usize] = None;
        if mv.en_passant {
            next.board[ep_victim as usize] = None;
        }

        if let Some(castle) = mv.castle {
            let home = side.home_rank();
            let (king_to, rook_from, rook_to) = match castle {
                CastleSide::Kingside => (square(6, home), square(7, home), square(5, home)),
                CastleSide::Queenside => (square(2, home), square(0, home), square(3, home)),
            };
            next.board[king_to as usize] = Some(piece);
            next.board[rook_to as usize] = next.board[rook_from as usize].take();
        } else {
            let placed = match (piece.kind, mv.promotion) {
                (PieceKind::Pawn, Some(kind)) => Piece::new(kind, side),
                _ => piece,
            };
            next.board[mv.to as usize] = Some(placed);
        }

        if piece.kind == PieceKind::King {
            next.castling.clear(side, CastleSide::Kingside);
            next.castling.clear(side, CastleSide::Queenside);
        }
        // Any move touching a rook home square drops that right.
        for (sq, color, castle) in [
            (square(0, 0), Color::White, CastleSide::Queenside),
            (square(7, 0), Color::White, CastleSide::Kingside),
            (square(0, 7), Color::Black, CastleSide::Queenside),
            (square(7, 7), Color::Black, CastleSide::Kingside),
        ] {
            if mv.from == sq || mv.to == sq { next.castling.clear(color, castle); }
        }

        next.en_passant = None;
        if piece.kind == PieceKind::Pawn && (rank_of(mv.to) - rank_of(mv.from)).abs() == 2 {
            next.en_passant = Some(square(file_of(mv.from), (rank_of(mv.to) + rank_of(mv.from)) / 2));
        }

        if piece.kind == PieceKind::Pawn || captured.is_some() {
            next.halfmove_clock = 0;
        } else {
            next.halfmove_clock += 1;
        }
        if side == Color::Black { next.fullmove_number += 1; }

        next.side_to_move = side.opposite();
        next.last_move = Some(Move { capture: captured.is_some(), ..*mv });
        next.key = zobrist::compute(&next);
        next
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8i8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8i8 {
                let c = self.piece_at(square(file, rank)).map(|p| p.glyph()).unwrap_or('.');
                write!(f, " {}", c)?;
            }
            writeln!(f)?;
        }
        writeln!(f, "   a b c d e f g h")?;
        write!(f, "{} to move", self.side_to_move)
    }
}

/// Builds custom positions piece by piece; castling rights default to none.
#[derive(Clone, Debug)]
pub struct PositionBuilder {
    board: [Option<Piece>; 64],
    side_to_move: Color,
    castling: CastlingRights,
    en_passant: Option<Square>,
    halfmove_clock: u32,
    fullmove_number: u32,
    errors: Vec<String>,
}

impl Default for PositionBuilder {
    fn default() -> Self {
        Self {
            board: [None; 64],
            side_to_move: Color::White,
            castling: CastlingRights::default(),
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            errors: Vec::new(),
        }
    }
}

impl PositionBuilder {
    pub fn piece(mut self, sq: &str, color: Color, kind: PieceKind) -> Self {
        match parse_square(sq) {
            Ok(s) => self.board[s as usize] = Some(Piece::new(kind, color)),
            Err(_) => self.errors.push(format!("bad square {sq}")),
        }
        self
    }

    /// Places pieces from eight diagram rows, rank 8 first; `.` marks an empty square.
    pub fn diagram(mut self, rows: [&str; 8]) -> Self {
        for (i, row) in rows.iter().enumerate() {
            let rank = 7 - i as i8;
            let cells: Vec<char> = row.chars().filter(|c| !c.is_whitespace()).collect();
            if cells.len() != 8 {
                self.errors.push(format!("rank {} has {} cells", rank + 1, cells.len()));
                continue;
            }
            for (file, &c) in cells.iter().enumerate() {
                let sq = square(file as i8, rank) as usize;
                match (c, Piece::from_glyph(c)) {
                    ('.', _) => self.board[sq] = None,
                    (_, Some(p)) => self.board[sq] = Some(p),
                    (_, None) => self.errors.push(format!("unknown piece glyph {c:?}")),
                }
            }
        }
        self
    }

    pub fn side_to_move(mut self, color: Color) -> Self {
        self.side_to_move = color;
        self
    }

    pub fn castling(mut self, rights: CastlingRights) -> Self {
        self.castling = rights;
        self
    }

    pub fn en_passant(mut self, sq: &str) -> Self {
        match parse_square(sq) {
            Ok(s) => self.en_passant = Some(s),
            Err(_) => self.errors.push(format!("bad en-passant square {sq}")),
        }
        self
    }

    pub fn halfmove_clock(mut self, plies: u32) -> Self {
        self.halfmove_clock = plies;
        self
    }

    pub fn fullmove_number(mut self, n: u32) -> Self {
        self.fullmove_number = n.max(1);
        self
    }

    pub fn build(self) -> Result<Position> {
        if let Some(e) = self.errors.first() {
            return Err(ChessError::InvalidPosition(e.clone()));
        }
        for color in Color::ALL {
            let kings = self.board.iter().flatten().filter(|p| p.kind == PieceKind::King && p.color == color).count();
            if kings != 1 {
                return Err(ChessError::InvalidPosition(format!("{color} has {kings} kings")));
            }
        }
        let mut pos = Position {
            board: self.board,
            side_to_move: self.side_to_move,
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
            last_move: None,
            key: 0,
        };
        pos.key = zobrist::compute(&pos);
        Ok(pos)
    }
}
