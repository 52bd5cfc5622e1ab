use serde::{Deserialize, Serialize};
use std::fmt;

use super::movegen::in_check;
use super::position::Position;
use super::types::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DrawReason {
    Stalemate,
    Repetition,
    InsufficientMaterial,
    FiftyMove,
    /// Ply cap reached without natural termination.
    PlyCap,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Win(Color),
    Draw(DrawReason),
}

impl Outcome {
    /// +1 White win, -1 Black win, 0 draw.
    pub fn reward(&self) -> f32 {
        match self {
            Outcome::Win(c) => c.sign(),
            Outcome::Draw(_) => 0.0,
        }
    }

    /// Repetition and fifty-move draws are the loop-seeking outcomes.
    pub fn is_loop_draw(&self) -> bool {
        matches!(self, Outcome::Draw(DrawReason::Repetition | DrawReason::FiftyMove))
    }

    pub fn result_token(&self) -> &'static str {
        match self {
            Outcome::Win(Color::White) => "1-0",
            Outcome::Win(Color::Black) => "0-1",
            Outcome::Draw(_) => "1/2-1/2",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Win(c) => write!(f, "{c} wins by checkmate"),
            Outcome::Draw(DrawReason::Stalemate) => f.write_str("Draw by stalemate"),
            Outcome::Draw(DrawReason::Repetition) => f.write_str("Draw by threefold repetition"),
            Outcome::Draw(DrawReason::InsufficientMaterial) => f.write_str("Draw by insufficient mating material"),
            Outcome::Draw(DrawReason::FiftyMove) => f.write_str("Draw by 50-move rule"),
            Outcome::Draw(DrawReason::PlyCap) => f.write_str("Draw by ply cap"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Over(Outcome),
    Check,
    InProgress,
}

impl GameStatus {
    pub fn is_terminal(&self) -> bool { matches!(self, GameStatus::Over(_)) }

    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            GameStatus::Over(o) => Some(*o),
            _ => None,
        }
    }

    /// Short badge text.
    pub fn label(&self) -> &'static str {
        match self {
            GameStatus::Over(Outcome::Win(_)) => "Checkmate",
            GameStatus::Over(Outcome::Draw(DrawReason::Stalemate)) => "Stalemate",
            GameStatus::Over(Outcome::Draw(_)) => "Draw",
            GameStatus::Check => "Check",
            GameStatus::InProgress => "In progress",
        }
    }
}

/// Classifies `pos` given its legal move count and how often its key has occurred.
pub fn evaluate(pos: &Position, legal_count: usize, occurrences: u32) -> GameStatus {
    let side = pos.side_to_move();
    let check = in_check(pos, side);
    if legal_count == 0 {
        return GameStatus::Over(if check { Outcome::Win(side.opposite()) } else { Outcome::Draw(DrawReason::Stalemate) });
    }
    if occurrences >= 3 {
        return GameStatus::Over(Outcome::Draw(DrawReason::Repetition));
    }
    if has_insufficient_material(pos) {
        return GameStatus::Over(Outcome::Draw(DrawReason::InsufficientMaterial));
    }
    if pos.halfmove_clock() >= 100 {
        return GameStatus::Over(Outcome::Draw(DrawReason::FiftyMove));
    }
    if check { GameStatus::Check } else { GameStatus::InProgress }
}

pub fn has_insufficient_material(pos: &Position) -> bool {
    let mut minors: Vec<(Square, Piece)> = Vec::with_capacity(4);
    for (sq, p) in pos.pieces() {
        match p.kind {
            PieceKind::King => continue,
            PieceKind::Pawn | PieceKind::Rook | PieceKind::Queen => return false,
            _ => minors.push((sq, p)),
        }
    }
    match minors.as_slice() {
        [] | [_] => true,
        [(sa, a), (sb, b)] => {
            a.kind == PieceKind::Bishop
                && b.kind == PieceKind::Bishop
                && a.color != b.color
                && square_color(*sa) == square_color(*sb)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kings() -> crate::board::position::PositionBuilder {
        Position::builder()
            .piece("e1", Color::White, PieceKind::King)
            .piece("e8", Color::Black, PieceKind::King)
    }

    #[test]
    fn bare_kings_are_insufficient() {
        assert!(has_insufficient_material(&kings().build().unwrap()));
        assert!(has_insufficient_material(&kings().piece("c3", Color::White, PieceKind::Knight).build().unwrap()));
        assert!(!has_insufficient_material(&kings().piece("a1", Color::White, PieceKind::Rook).build().unwrap()));
    }

    #[test]
    fn same_colored_bishops_are_insufficient() {
        // c1 and f8 are both dark squares.
        let same = kings()
            .piece("c1", Color::White, PieceKind::Bishop)
            .piece("f8", Color::Black, PieceKind::Bishop)
            .build()
            .unwrap();
        assert!(has_insufficient_material(&same));
        let opposite = kings()
            .piece("c1", Color::White, PieceKind::Bishop)
            .piece("c8", Color::Black, PieceKind::Bishop)
            .build()
            .unwrap();
        assert!(!has_insufficient_material(&opposite));
        let two_knights = kings()
            .piece("c3", Color::White, PieceKind::Knight)
            .piece("d3", Color::White, PieceKind::Knight)
            .build()
            .unwrap();
        assert!(!has_insufficient_material(&two_knights));
    }

    #[test]
    fn repetition_precedes_material_and_clock() {
        let pos = kings().piece("a1", Color::White, PieceKind::Rook).halfmove_clock(120).build().unwrap();
        assert_eq!(evaluate(&pos, 5, 3), GameStatus::Over(Outcome::Draw(DrawReason::Repetition)));
        assert_eq!(evaluate(&pos, 5, 1), GameStatus::Over(Outcome::Draw(DrawReason::FiftyMove)));
    }
}
