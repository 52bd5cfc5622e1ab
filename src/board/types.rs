use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ChessError, Result};

pub const FILES: &[u8; 8] = b"abcdefgh";
pub const RANKS: &[u8; 8] = b"12345678";

/// Board index in `0..64`, `rank * 8 + file` (a1 = 0, h8 = 63).
pub type Square = u8;

#[inline]
pub fn square(file: i8, rank: i8) -> Square { (rank * 8 + file) as Square }

#[inline]
pub fn file_of(sq: Square) -> i8 { (sq % 8) as i8 }

#[inline]
pub fn rank_of(sq: Square) -> i8 { (sq / 8) as i8 }

#[inline]
pub fn on_board(file: i8, rank: i8) -> bool { (0..8).contains(&file) && (0..8).contains(&rank) }

/// Light squares are 1, dark squares 0.
#[inline]
pub fn square_color(sq: Square) -> u8 { ((file_of(sq) + rank_of(sq)) % 2) as u8 }

pub fn square_name(sq: Square) -> String {
    let mut s = String::with_capacity(2);
    s.push(FILES[file_of(sq) as usize] as char);
    s.push(RANKS[rank_of(sq) as usize] as char);
    s
}

pub fn parse_square(s: &str) -> Result<Square> {
    let b = s.as_bytes();
    if b.len() != 2 || !(b'a'..=b'h').contains(&b[0]) || !(b'1'..=b'8').contains(&b[1]) {
        return Err(ChessError::InvalidSquare(s.to_string()));
    }
    Ok(square((b[0] - b'a') as i8, (b[1] - b'1') as i8))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    #[inline]
    pub fn opposite(self) -> Color {
        match self { Color::White => Color::Black, Color::Black => Color::White }
    }

    #[inline]
    pub fn index(self) -> usize { self as usize }

    /// Rank direction pawns of this colour advance in.
    #[inline]
    pub fn forward(self) -> i8 { if self == Color::White { 1 } else { -1 } }

    #[inline]
    pub fn home_rank(self) -> i8 { if self == Color::White { 0 } else { 7 } }

    /// +1 for White, -1 for Black; converts white-relative scores.
    #[inline]
    pub fn sign(self) -> f32 { if self == Color::White { 1.0 } else { -1.0 } }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self { Color::White => "White", Color::Black => "Black" })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    /// Promotion choices in generation order.
    pub const PROMOTIONS: [PieceKind; 4] = [PieceKind::Queen, PieceKind::Rook, PieceKind::Bishop, PieceKind::Knight];

    #[inline]
    pub fn index(self) -> usize { self as usize }

    pub fn letter(self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }

    /// Material value in pawns; the king carries none.
    pub fn value(self) -> f32 {
        match self {
            PieceKind::Pawn => 1.0,
            PieceKind::Knight => 3.0,
            PieceKind::Bishop => 3.25,
            PieceKind::Rook => 5.0,
            PieceKind::Queen => 9.0,
            PieceKind::King => 0.0,
        }
    }

    #[inline]
    pub fn is_minor(self) -> bool { matches!(self, PieceKind::Knight | PieceKind::Bishop) }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
}

impl Piece {
    #[inline]
    pub const fn new(kind: PieceKind, color: Color) -> Self { Self { kind, color } }

    /// Plane index `color * 6 + kind`, shared by hashing and feature encoding.
    #[inline]
    pub fn plane(self) -> usize { self.color.index() * 6 + self.kind.index() }

    /// Inverse of [`Piece::glyph`].
    pub fn from_glyph(c: char) -> Option<Piece> {
        let kind = match c.to_ascii_uppercase() {
            'P' => PieceKind::Pawn,
            'N' => PieceKind::Knight,
            'B' => PieceKind::Bishop,
            'R' => PieceKind::Rook,
            'Q' => PieceKind::Queen,
            'K' => PieceKind::King,
            _ => return None,
        };
        let color = if c.is_ascii_uppercase() { Color::White } else { Color::Black };
        Some(Piece::new(kind, color))
    }

    /// Diagram glyph: upper case for White, lower case for Black.
    pub fn glyph(self) -> char {
        let c = self.kind.letter();
        if self.color == Color::White { c } else { c.to_ascii_lowercase() }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CastleSide {
    Kingside,
    Queenside,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CastlingRights {
    pub white_kingside: bool,
    pub white_queenside: bool,
    pub black_kingside: bool,
    pub black_queenside: bool,
}

impl CastlingRights {
    pub const ALL: CastlingRights = CastlingRights {
        white_kingside: true,
        white_queenside: true,
        black_kingside: true,
        black_queenside: true,
    };

    pub fn has(&self, color: Color, side: CastleSide) -> bool {
        match (color, side) {
            (Color::White, CastleSide::Kingside) => self.white_kingside,
            (Color::White, CastleSide::Queenside) => self.white_queenside,
            (Color::Black, CastleSide::Kingside) => self.black_kingside,
            (Color::Black, CastleSide::Queenside) => self.black_queenside,
        }
    }

    pub fn clear(&mut self, color: Color, side: CastleSide) {
        match (color, side) {
            (Color::White, CastleSide::Kingside) => self.white_kingside = false,
            (Color::White, CastleSide::Queenside) => self.white_queenside = false,
            (Color::Black, CastleSide::Kingside) => self.black_kingside = false,
            (Color::Black, CastleSide::Queenside) => self.black_queenside = false,
        }
    }

    /// Flags in key order: white K, white Q, black K, black Q.
    pub fn flags(&self) -> [bool; 4] {
        [self.white_kingside, self.white_queenside, self.black_kingside, self.black_queenside]
    }
}

/// A move relative to the position it was generated from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceKind>,
    pub capture: bool,
    pub en_passant: bool,
    pub double_push: bool,
    pub castle: Option<CastleSide>,
}

impl Move {
    pub fn quiet(from: Square, to: Square) -> Self {
        Self { from, to, promotion: None, capture: false, en_passant: false, double_push: false, castle: None }
    }

    pub fn capture(from: Square, to: Square) -> Self {
        Self { capture: true, ..Self::quiet(from, to) }
    }

    /// Stable id of the action (from, to, promotion), independent of the flags.
    pub fn id(&self) -> u16 {
        let promo = self.promotion.map(|p| p.index() as u16).unwrap_or(0);
        (self.from as u16) | ((self.to as u16) << 6) | (promo << 12)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", square_name(self.from), square_name(self.to))?;
        if let Some(p) = self.promotion {
            write!(f, "{}", p.letter().to_ascii_lowercase())?;
        }
        Ok(())
    }
}
