use crate::board::types::{file_of, rank_of, Square};
use crate::board::{Color, PieceKind, Position};

/// Material in pawns, positive when White is ahead.
pub fn material_white(pos: &Position) -> f32 {
    pos.pieces().map(|(_, p)| p.kind.value() * p.color.sign()).sum()
}

/// Signed material from `color`'s point of view.
pub fn material_for(pos: &Position, color: Color) -> f32 { material_white(pos) * color.sign() }

/// Non-pawn, non-king material of both sides (63.0 at the start).
pub fn non_pawn_material(pos: &Position) -> f32 {
    pos.pieces().filter(|(_, p)| p.kind != PieceKind::Pawn).map(|(_, p)| p.kind.value()).sum()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Opening,
    Middlegame,
    Endgame,
}

pub fn phase(pos: &Position) -> Phase {
    let m = non_pawn_material(pos);
    if m > 55.0 {
        Phase::Opening
    } else if m > 26.0 {
        Phase::Middlegame
    } else {
        Phase::Endgame
    }
}

/// Ranks a pawn of `color` on `sq` has advanced from its start rank (0..=5).
pub fn pawn_advance(sq: Square, color: Color) -> i8 {
    match color {
        Color::White => rank_of(sq) - 1,
        Color::Black => 6 - rank_of(sq),
    }
}

/// No enemy pawn ahead of `sq` on the same or an adjacent file.
pub fn is_passed_pawn(pos: &Position, sq: Square, color: Color) -> bool {
    let (file, rank) = (file_of(sq), rank_of(sq));
    !pos.pieces().any(|(s, p)| {
        p.kind == PieceKind::Pawn
            && p.color != color
            && (file_of(s) - file).abs() <= 1
            && (rank_of(s) - rank) * color.forward() > 0
    })
}

/// Chebyshev distance between two squares.
pub fn distance(a: Square, b: Square) -> i8 {
    (file_of(a) - file_of(b)).abs().max((rank_of(a) - rank_of(b)).abs())
}

/// White-relative progress: material plus small pawn advancement and passed-pawn terms.
pub fn progress_score(pos: &Position) -> f32 {
    let mut score = material_white(pos);
    for (sq, p) in pos.pieces().filter(|(_, p)| p.kind == PieceKind::Pawn) {
        let sign = p.color.sign();
        score += sign * 0.05 * pawn_advance(sq, p.color) as f32;
        if is_passed_pawn(pos, sq, p.color) {
            score += sign * 0.15;
        }
    }
    score
}
