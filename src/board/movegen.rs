use super::position::Position;
use super::types::*;

pub const KNIGHT_STEPS: [(i8, i8); 8] = [(1, 2), (2, 1), (2, -1), (1, -2), (-1, -2), (-2, -1), (-2, 1), (-1, 2)];
pub const KING_STEPS: [(i8, i8); 8] = [(1, 1), (1, 0), (1, -1), (0, 1), (0, -1), (-1, 1), (-1, 0), (-1, -1)];
pub const ROOK_DIRS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
pub const BISHOP_DIRS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

#[inline]
fn step(sq: Square, df: i8, dr: i8) -> Option<Square> {
    let (f, r) = (file_of(sq) + df, rank_of(sq) + dr);
    if on_board(f, r) { Some(square(f, r)) } else { None }
}

fn piece_is(pos: &Position, sq: Square, color: Color, kinds: &[PieceKind]) -> bool {
    matches!(pos.piece_at(sq), Some(p) if p.color == color && kinds.contains(&p.kind))
}

/// True if any piece of `by` attacks `target`.
pub fn is_square_attacked(pos: &Position, target: Square, by: Color) -> bool {
    // Attacking pawns sit one rank behind the target from the attacker's point of view.
    for df in [-1, 1] {
        if let Some(sq) = step(target, -df, -by.forward()) {
            if piece_is(pos, sq, by, &[PieceKind::Pawn]) { return true; }
        }
    }
    for (df, dr) in KNIGHT_STEPS {
        if let Some(sq) = step(target, df, dr) {
            if piece_is(pos, sq, by, &[PieceKind::Knight]) { return true; }
        }
    }
    for (df, dr) in KING_STEPS {
        if let Some(sq) = step(target, df, dr) {
            if piece_is(pos, sq, by, &[PieceKind::King]) { return true; }
        }
    }
    let sliders: [(&[(i8, i8); 4], [PieceKind; 2]); 2] = [
        (&ROOK_DIRS, [PieceKind::Rook, PieceKind::Queen]),
        (&BISHOP_DIRS, [PieceKind::Bishop, PieceKind::Queen]),
    ];
    for (dirs, kinds) in sliders {
        for &(df, dr) in dirs {
            let mut cur = step(target, df, dr);
            while let Some(sq) = cur {
                if pos.piece_at(sq).is_some() {
                    if piece_is(pos, sq, by, &kinds) { return true; }
                    break;
                }
                cur = step(sq, df, dr);
            }
        }
    }
    false
}

pub fn in_check(pos: &Position, color: Color) -> bool {
    match pos.king_square(color) {
        Some(k) => is_square_attacked(pos, k, color.opposite()),
        None => false,
    }
}

/// Bitmask of every square attacked by `by` (pawn diagonals, not pushes).
pub fn attacked_squares(pos: &Position, by: Color) -> u64 {
    let mut mask = 0u64;
    for (from, piece) in pos.pieces().filter(|(_, p)| p.color == by) {
        match piece.kind {
            PieceKind::Pawn => {
                for df in [-1, 1] {
                    if let Some(sq) = step(from, df, by.forward()) { mask |= 1u64 << sq; }
                }
            }
            PieceKind::Knight | PieceKind::King => {
                let steps = if piece.kind == PieceKind::Knight { &KNIGHT_STEPS } else { &KING_STEPS };
                for &(df, dr) in steps {
                    if let Some(sq) = step(from, df, dr) { mask |= 1u64 << sq; }
                }
            }
            kind => {
                for (df, dr) in slider_dirs(kind) {
                    let mut cur = step(from, df, dr);
                    while let Some(sq) = cur {
                        mask |= 1u64 << sq;
                        if pos.piece_at(sq).is_some() { break; }
                        cur = step(sq, df, dr);
                    }
                }
            }
        }
    }
    mask
}

fn slider_dirs(kind: PieceKind) -> Vec<(i8, i8)> {
    let mut dirs = Vec::with_capacity(8);
    if matches!(kind, PieceKind::Bishop | PieceKind::Queen) { dirs.extend_from_slice(&BISHOP_DIRS); }
    if matches!(kind, PieceKind::Rook | PieceKind::Queen) { dirs.extend_from_slice(&ROOK_DIRS); }
    dirs
}

fn push_pawn_move(moves: &mut Vec<Move>, mv: Move, promo_rank: i8) {
    if rank_of(mv.to) == promo_rank {
        for kind in PieceKind::PROMOTIONS {
            moves.push(Move { promotion: Some(kind), ..mv });
        }
    } else {
        moves.push(mv);
    }
}

/// Moves obeying piece movement rules; the mover's own king may be left attacked.
pub fn pseudo_legal_moves(pos: &Position) -> Vec<Move> {
    let mut moves = Vec::with_capacity(48);
    let side = pos.side_to_move();
    let enemy = side.opposite();

    for (from, piece) in pos.pieces().filter(|(_, p)| p.color == side) {
        match piece.kind {
            PieceKind::Pawn => {
                let dir = side.forward();
                let start_rank = if side == Color::White { 1 } else { 6 };
                let promo_rank = if side == Color::White { 7 } else { 0 };
                if let Some(one) = step(from, 0, dir) {
                    if pos.piece_at(one).is_none() {
                        push_pawn_move(&mut moves, Move::quiet(from, one), promo_rank);
                        if rank_of(from) == start_rank {
                            if let Some(two) = step(from, 0, 2 * dir) {
                                if pos.piece_at(two).is_none() {
                                    moves.push(Move { double_push: true, ..Move::quiet(from, two) });
                                }
                            }
                        }
                    }
                }
                for df in [-1, 1] {
                    let Some(to) = step(from, df, dir) else { continue };
                    if matches!(pos.piece_at(to), Some(t) if t.color == enemy) {
                        push_pawn_move(&mut moves, Move::capture(from, to), promo_rank);
                    }
                    if pos.en_passant() == Some(to) {
                        moves.push(Move { en_passant: true, ..Move::capture(from, to) });
                    }
                }
            }
            PieceKind::Knight | PieceKind::King => {
                let steps = if piece.kind == PieceKind::Knight { &KNIGHT_STEPS } else { &KING_STEPS };
                for &(df, dr) in steps {
                    let Some(to) = step(from, df, dr) else { continue };
                    match pos.piece_at(to) {
                        None => moves.push(Move::quiet(from, to)),
                        Some(t) if t.color == enemy => moves.push(Move::capture(from, to)),
                        _ => {}
                    }
                }
                if piece.kind == PieceKind::King {
                    castling_moves(pos, from, &mut moves);
                }
            }
            kind => {
                for (df, dr) in slider_dirs(kind) {
                    let mut cur = step(from, df, dr);
                    while let Some(to) = cur {
                        match pos.piece_at(to) {
                            None => moves.push(Move::quiet(from, to)),
                            Some(t) => {
                                if t.color == enemy { moves.push(Move::capture(from, to)); }
                                break;
                            }
                        }
                        cur = step(to, df, dr);
                    }
                }
            }
        }
    }
    moves
}

fn castling_moves(pos: &Position, from: Square, moves: &mut Vec<Move>) {
    let side = pos.side_to_move();
    let enemy = side.opposite();
    let home = side.home_rank();
    if from != square(4, home) || in_check(pos, side) { return; }
    let empty = |files: &[i8]| files.iter().all(|&f| pos.piece_at(square(f, home)).is_none());
    let safe = |files: &[i8]| files.iter().all(|&f| !is_square_attacked(pos, square(f, home), enemy));

    if pos.castling().has(side, CastleSide::Kingside) && empty(&[5, 6]) && safe(&[5, 6]) {
        moves.push(Move { castle: Some(CastleSide::Kingside), ..Move::quiet(from, square(6, home)) });
    }
    if pos.castling().has(side, CastleSide::Queenside) && empty(&[1, 2, 3]) && safe(&[3, 2]) {
        moves.push(Move { castle: Some(CastleSide::Queenside), ..Move::quiet(from, square(2, home)) });
    }
}

/// Pseudo-legal moves that do not leave the mover's king attacked.
pub fn legal_moves(pos: &Position) -> Vec<Move> {
    let side = pos.side_to_move();
    pseudo_legal_moves(pos)
        .into_iter()
        .filter(|mv| !in_check(&pos.apply(mv), side))
        .collect()
}

pub fn has_legal_move(pos: &Position) -> bool {
    let side = pos.side_to_move();
    pseudo_legal_moves(pos).iter().any(|mv| !in_check(&pos.apply(mv), side))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startpos_has_twenty_moves() {
        let pos = Position::startpos();
        assert_eq!(legal_moves(&pos).len(), 20);
        assert_eq!(pseudo_legal_moves(&pos).len(), 20);
    }

    #[test]
    fn pinned_piece_cannot_leave_the_file() {
        // Black rook on e7 pins the white rook on e2 against Ke1.
        let pos = Position::builder()
            .piece("e1", Color::White, PieceKind::King)
            .piece("e2", Color::White, PieceKind::Rook)
            .piece("e7", Color::Black, PieceKind::Rook)
            .piece("a8", Color::Black, PieceKind::King)
            .build()
            .unwrap();
        let legal = legal_moves(&pos);
        let pseudo = pseudo_legal_moves(&pos);
        assert!(legal.len() < pseudo.len());
        for mv in legal.iter().filter(|m| m.from == parse_square("e2").unwrap()) {
            assert_eq!(file_of(mv.to), 4, "pinned rook left the e-file: {mv}");
        }
    }

    #[test]
    fn pawn_attack_direction_follows_attacker() {
        // A white pawn on d4 attacks e5, not e3.
        let pos = Position::builder()
            .piece("e1", Color::White, PieceKind::King)
            .piece("d4", Color::White, PieceKind::Pawn)
            .piece("e8", Color::Black, PieceKind::King)
            .build()
            .unwrap();
        assert!(is_square_attacked(&pos, parse_square("e5").unwrap(), Color::White));
        assert!(!is_square_attacked(&pos, parse_square("e3").unwrap(), Color::White));
        let mask = attacked_squares(&pos, Color::White);
        assert!(mask & (1u64 << parse_square("c5").unwrap()) != 0);
    }

    #[test]
    fn castling_blocked_through_attacked_square() {
        let rights = CastlingRights::ALL;
        let pos = Position::builder()
            .piece("e1", Color::White, PieceKind::King)
            .piece("h1", Color::White, PieceKind::Rook)
            .piece("a1", Color::White, PieceKind::Rook)
            .piece("e8", Color::Black, PieceKind::King)
            .piece("f8", Color::Black, PieceKind::Rook)
            .castling(rights)
            .build()
            .unwrap();
        let legal = legal_moves(&pos);
        assert!(!legal.iter().any(|m| m.castle == Some(CastleSide::Kingside)));
        assert!(legal.iter().any(|m| m.castle == Some(CastleSide::Queenside)));
    }

    #[test]
    fn promotion_expands_to_four_moves() {
        let pos = Position::builder()
            .piece("a1", Color::White, PieceKind::King)
            .piece("b7", Color::White, PieceKind::Pawn)
            .piece("h8", Color::Black, PieceKind::King)
            .build()
            .unwrap();
        let promos: Vec<_> = legal_moves(&pos).into_iter().filter(|m| m.promotion.is_some()).collect();
        assert_eq!(promos.len(), 4);
    }
}
