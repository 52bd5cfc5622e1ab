//! Handcrafted move scoring. Never trained; used as the `heuristic` strategy
//! and as a shaping bonus blended into learned scores.

use super::material::{distance, is_passed_pawn, pawn_advance, phase, Phase};
use crate::board::movegen::{attacked_squares, has_legal_move, in_check};
use crate::board::types::{file_of, rank_of};
use crate::board::{Move, PieceKind, Position};

const CASTLE_BONUS: f32 = 0.6;
const CENTER_BONUS: f32 = 0.3;
const EXTENDED_CENTER_BONUS: f32 = 0.12;
const DEVELOPMENT_BONUS: f32 = 0.25;
const DEVELOPMENT_MAX_FULLMOVE: u32 = 12;
const KING_WALK_PENALTY: f32 = 0.4;
const ENDGAME_KING_PROXIMITY: f32 = 0.05;
const CAPTURE_SCALE: f32 = 0.3;
const CHECK_BONUS: f32 = 0.25;
const MATE_BONUS: f32 = 8.0;
const PASSED_PAWN_BASE: f32 = 0.15;
const PASSED_PAWN_ADVANCE: f32 = 0.35;
const PASSED_PAWN_KING_SUPPORT: f32 = 0.1;
const PAWN_STORM_BONUS: f32 = 0.08;

const COVERAGE_WEIGHT: f32 = 0.1;
const THREAT_WEIGHT: f32 = 0.3;

fn is_center(file: i8, rank: i8) -> bool { (3..=4).contains(&file) && (3..=4).contains(&rank) }

fn is_extended_center(file: i8, rank: i8) -> bool { (2..=5).contains(&file) && (2..=5).contains(&rank) }

/// Material gained by `mv`: captured piece plus any promotion upgrade.
pub fn value_gained(pos: &Position, mv: &Move) -> f32 {
    let captured = if mv.en_passant {
        PieceKind::Pawn.value()
    } else {
        pos.piece_at(mv.to).map(|p| p.kind.value()).unwrap_or(0.0)
    };
    let promo = mv.promotion.map(|k| k.value() - PieceKind::Pawn.value()).unwrap_or(0.0);
    captured + promo
}

/// Shaping bonus for playing `mv` in `pos`.
pub fn shaping_bonus(pos: &Position, mv: &Move) -> f32 { shaping_bonus_after(pos, mv, &pos.apply(mv)) }

/// As [`shaping_bonus`] when the resulting position is already known.
pub fn shaping_bonus_after(pos: &Position, mv: &Move, after: &Position) -> f32 {
    let Some(piece) = pos.piece_at(mv.from) else { return 0.0 };
    let side = piece.color;
    let stage = phase(pos);
    let endgame = stage == Phase::Endgame;
    let enemy_king = pos.king_square(side.opposite());
    let (to_file, to_rank) = (file_of(mv.to), rank_of(mv.to));
    let mut bonus = 0.0;

    if mv.castle.is_some() {
        bonus += CASTLE_BONUS;
    }

    if piece.kind != PieceKind::King || endgame {
        if is_center(to_file, to_rank) {
            bonus += CENTER_BONUS;
        } else if is_extended_center(to_file, to_rank) {
            bonus += EXTENDED_CENTER_BONUS;
        }
    }

    if piece.kind.is_minor()
        && !endgame
        && rank_of(mv.from) == side.home_rank()
        && pos.fullmove_number() <= DEVELOPMENT_MAX_FULLMOVE
    {
        bonus += DEVELOPMENT_BONUS;
    }

    if piece.kind == PieceKind::King && mv.castle.is_none() {
        if endgame {
            if let Some(ek) = enemy_king {
                bonus += ENDGAME_KING_PROXIMITY * (7 - distance(mv.to, ek)) as f32;
            }
        } else {
            bonus -= KING_WALK_PENALTY;
        }
    }

    bonus += CAPTURE_SCALE * value_gained(pos, mv);

    if in_check(after, after.side_to_move()) {
        bonus += if has_legal_move(after) { CHECK_BONUS } else { MATE_BONUS };
    }

    if piece.kind == PieceKind::Pawn {
        if is_passed_pawn(after, mv.to, side) {
            let advance = pawn_advance(mv.to, side) as f32 / 6.0;
            let mut b = PASSED_PAWN_BASE + PASSED_PAWN_ADVANCE * advance * advance;
            if let Some(own_king) = after.king_square(side) {
                b += PASSED_PAWN_KING_SUPPORT * (7 - distance(own_king, mv.to)) as f32 / 7.0;
            }
            bonus += b;
        }
        if !endgame {
            if let Some(ek) = enemy_king {
                let file_gap = (file_of(ek) - to_file).abs();
                let in_enemy_half = (to_rank - side.home_rank()).abs() >= 3;
                if file_gap <= 1 && in_enemy_half {
                    bonus += PAWN_STORM_BONUS * (2 - file_gap) as f32;
                }
            }
        }
    }
    bonus
}

/// Score of the `heuristic` strategy: square coverage difference plus attacked enemy material.
pub fn strategy_score(pos: &Position, mv: &Move) -> f32 {
    let Some(piece) = pos.piece_at(mv.from) else { return 0.0 };
    let side = piece.color;
    let after = pos.apply(mv);
    let own = attacked_squares(&after, side);
    let theirs = attacked_squares(&after, side.opposite());
    let coverage = own.count_ones() as f32 - theirs.count_ones() as f32;
    let threat: f32 = after
        .pieces()
        .filter(|(sq, p)| p.color != side && own & (1u64 << sq) != 0)
        .map(|(_, p)| p.kind.value())
        .sum();
    COVERAGE_WEIGHT * coverage + THREAT_WEIGHT * threat
}
