use super::movegen::{has_legal_move, in_check};
use super::position::Position;
use super::types::*;
use crate::error::{ChessError, Result};

fn disambiguation(pos: &Position, mv: &Move, legal: &[Move]) -> String {
    let Some(piece) = pos.piece_at(mv.from) else { return String::new() };
    if matches!(piece.kind, PieceKind::Pawn | PieceKind::King) { return String::new(); }

    let rivals: Vec<&Move> = legal
        .iter()
        .filter(|m| m.from != mv.from && m.to == mv.to)
        .filter(|m| matches!(pos.piece_at(m.from), Some(p) if p.kind == piece.kind))
        .collect();
    if rivals.is_empty() { return String::new(); }

    let same_file = rivals.iter().any(|m| file_of(m.from) == file_of(mv.from));
    let same_rank = rivals.iter().any(|m| rank_of(m.from) == rank_of(mv.from));
    let name = square_name(mv.from);
    if !same_file {
        name[..1].to_string()
    } else if !same_rank {
        name[1..].to_string()
    } else {
        name
    }
}

/// SAN for a legal move of `pos`; `legal` is the full legal move list of `pos`.
pub fn san_for_move(pos: &Position, mv: &Move, legal: &[Move]) -> String {
    let mut san = String::new();
    match mv.castle {
        Some(CastleSide::Kingside) => san.push_str("O-O"),
        Some(CastleSide::Queenside) => san.push_str("O-O-O"),
        None => {
            let kind = pos.piece_at(mv.from).map(|p| p.kind).unwrap_or(PieceKind::Pawn);
            let capture = mv.en_passant || pos.piece_at(mv.to).is_some();
            if kind != PieceKind::Pawn {
                san.push(kind.letter());
                san.push_str(&disambiguation(pos, mv, legal));
            } else if capture {
                san.push(FILES[file_of(mv.from) as usize] as char);
            }
            if capture { san.push('x'); }
            san.push_str(&square_name(mv.to));
            if let (PieceKind::Pawn, Some(promo)) = (kind, mv.promotion) {
                san.push('=');
                san.push(promo.letter());
            }
        }
    }

    let next = pos.apply(mv);
    if in_check(&next, next.side_to_move()) {
        san.push(if has_legal_move(&next) { '+' } else { '#' });
    }
    san
}

/// Strips annotation glyphs, whitespace and a trailing check/mate suffix; maps `0` to `O`.
fn strip_annotations(text: &str) -> String {
    let mut s: String = text
        .trim()
        .chars()
        .filter(|c| !matches!(c, '!' | '?') && !c.is_whitespace())
        .map(|c| if c == '0' { 'O' } else { c })
        .collect();
    if s.ends_with('+') || s.ends_with('#') { s.pop(); }
    s
}

pub fn normalize_san(text: &str) -> String { strip_annotations(text).to_uppercase() }

/// Matches free-form move text against the legal moves of `pos`.
///
/// An exact (case-sensitive) match wins; otherwise the first case-insensitive
/// match, also accepting promotions written without `=`.
pub fn parse_san(pos: &Position, text: &str, legal: &[Move]) -> Result<Move> {
    let exact = strip_annotations(text);
    if exact.is_empty() { return Err(ChessError::InvalidMove(text.to_string())); }
    let norm = exact.to_uppercase();
    let sans: Vec<String> = legal.iter().map(|m| strip_annotations(&san_for_move(pos, m, legal))).collect();

    if let Some(i) = sans.iter().position(|s| *s == exact) {
        return Ok(legal[i]);
    }
    for (mv, san) in legal.iter().zip(&sans) {
        let upper = san.to_uppercase();
        if upper == norm || (upper.contains('=') && upper.replace('=', "") == norm) {
            return Ok(*mv);
        }
    }
    Err(ChessError::InvalidMove(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::movegen::legal_moves;

    #[test]
    fn knights_disambiguate_by_file() {
        let pos = Position::builder()
            .piece("e1", Color::White, PieceKind::King)
            .piece("b3", Color::White, PieceKind::Knight)
            .piece("f3", Color::White, PieceKind::Knight)
            .piece("d7", Color::Black, PieceKind::King)
            .build()
            .unwrap();
        let legal = legal_moves(&pos);
        let to_d2: Vec<String> = legal
            .iter()
            .filter(|m| m.to == parse_square("d2").unwrap() && pos.piece_at(m.from).unwrap().kind == PieceKind::Knight)
            .map(|m| san_for_move(&pos, m, &legal))
            .collect();
        assert_eq!(to_d2.len(), 2);
        assert!(to_d2.contains(&"Nbd2".to_string()));
        assert!(to_d2.contains(&"Nfd2".to_string()));
    }

    #[test]
    fn rooks_disambiguate_by_rank() {
        let pos = Position::builder()
            .piece("e1", Color::White, PieceKind::King)
            .piece("a1", Color::White, PieceKind::Rook)
            .piece("a3", Color::White, PieceKind::Rook)
            .piece("d8", Color::Black, PieceKind::King)
            .build()
            .unwrap();
        let legal = legal_moves(&pos);
        let a2 = parse_square("a2").unwrap();
        let mut sans: Vec<String> = legal.iter().filter(|m| m.to == a2).map(|m| san_for_move(&pos, m, &legal)).collect();
        sans.sort();
        assert_eq!(sans, vec!["R1a2".to_string(), "R3a2".to_string()]);
    }

    #[test]
    fn parse_accepts_loose_input() {
        let pos = Position::startpos();
        let legal = legal_moves(&pos);
        let mv = parse_san(&pos, "  nf3!? ", &legal).unwrap();
        assert_eq!(mv.to_string(), "g1f3");
        assert!(parse_san(&pos, "Ke2", &legal).is_err());
        assert!(parse_san(&pos, "", &legal).is_err());
    }

    #[test]
    fn parse_prefers_exact_case_for_pawn_versus_bishop() {
        // Both the b-pawn and the bishop on b2 can capture on c3.
        let pos = Position::builder()
            .piece("e1", Color::White, PieceKind::King)
            .piece("b2", Color::White, PieceKind::Pawn)
            .piece("d2", Color::White, PieceKind::Bishop)
            .piece("c3", Color::Black, PieceKind::Knight)
            .piece("h8", Color::Black, PieceKind::King)
            .build()
            .unwrap();
        let legal = legal_moves(&pos);
        assert_eq!(parse_san(&pos, "bxc3", &legal).unwrap().from, parse_square("b2").unwrap());
        assert_eq!(parse_san(&pos, "Bxc3", &legal).unwrap().from, parse_square("d2").unwrap());
    }

    #[test]
    fn promotion_without_equals_sign() {
        let pos = Position::builder()
            .piece("a1", Color::White, PieceKind::King)
            .piece("e7", Color::White, PieceKind::Pawn)
            .piece("h1", Color::Black, PieceKind::King)
            .build()
            .unwrap();
        let legal = legal_moves(&pos);
        let mv = parse_san(&pos, "e8N", &legal).unwrap();
        assert_eq!(mv.promotion, Some(PieceKind::Knight));
        let q = parse_san(&pos, "e8=q", &legal).unwrap();
        assert_eq!(q.promotion, Some(PieceKind::Queen));
    }
}
