use crate::board::{Color, Move, PieceKind, Position};

/// 12 piece planes over 64 squares plus a side-to-move bit.
pub const POSITION_FEATURES: usize = 12 * 64 + 1;
/// From square, to square, promotion {none, Q, R, B, N}, flags {capture, castle, en passant}.
pub const MOVE_FEATURES: usize = 64 + 64 + 5 + 3;
pub const FEATURE_LEN: usize = POSITION_FEATURES + MOVE_FEATURES;

const SIDE_BIT: usize = 12 * 64;
const FROM_OFF: usize = POSITION_FEATURES;
const TO_OFF: usize = FROM_OFF + 64;
const PROMO_OFF: usize = TO_OFF + 64;
const FLAG_OFF: usize = PROMO_OFF + 5;

/// Binary feature vector stored as its active indices.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Features {
    active: Vec<usize>,
}

impl Features {
    pub fn active(&self) -> &[usize] { &self.active }

    #[inline]
    pub fn dot(&self, weights: &[f32]) -> f32 { self.active.iter().map(|&i| weights[i]).sum() }

    /// Adds `scale` at every active index of `acc`.
    #[inline]
    pub fn add_scaled_to(&self, acc: &mut [f32], scale: f32) {
        for &i in &self.active {
            acc[i] += scale;
        }
    }

    pub fn to_dense(&self) -> Vec<f32> {
        let mut v = vec![0.0; FEATURE_LEN];
        self.add_scaled_to(&mut v, 1.0);
        v
    }
}

fn promotion_slot(kind: Option<PieceKind>) -> usize {
    match kind {
        None => 0,
        Some(PieceKind::Queen) => 1,
        Some(PieceKind::Rook) => 2,
        Some(PieceKind::Bishop) => 3,
        Some(_) => 4,
    }
}

pub fn position_indices(pos: &Position) -> Vec<usize> {
    let mut out: Vec<usize> = pos.pieces().map(|(sq, p)| p.plane() * 64 + sq as usize).collect();
    if pos.side_to_move() == Color::White {
        out.push(SIDE_BIT);
    }
    out
}

pub fn move_indices(mv: &Move) -> Vec<usize> {
    let mut out = Vec::with_capacity(6);
    out.push(FROM_OFF + mv.from as usize);
    out.push(TO_OFF + mv.to as usize);
    out.push(PROMO_OFF + promotion_slot(mv.promotion));
    if mv.capture || mv.en_passant { out.push(FLAG_OFF); }
    if mv.castle.is_some() { out.push(FLAG_OFF + 1); }
    if mv.en_passant { out.push(FLAG_OFF + 2); }
    out
}

/// Combined position + move features.
pub fn encode(pos: &Position, mv: &Move) -> Features {
    let mut active = position_indices(pos);
    active.extend(move_indices(mv));
    Features { active }
}

/// Encodes every candidate move, sharing the position part.
pub fn encode_all(pos: &Position, moves: &[Move]) -> Vec<Features> {
    let base = position_indices(pos);
    moves
        .iter()
        .map(|mv| {
            let mut active = base.clone();
            active.extend(move_indices(mv));
            Features { active }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::legal_moves;

    #[test]
    fn lengths_are_fixed() {
        assert_eq!(POSITION_FEATURES, 769);
        assert_eq!(MOVE_FEATURES, 136);
        let pos = Position::startpos();
        let mv = legal_moves(&pos)[0];
        let dense = encode(&pos, &mv).to_dense();
        assert_eq!(dense.len(), FEATURE_LEN);
        // 32 pieces, side bit, from, to, promotion none
        assert_eq!(dense.iter().filter(|&&x| x == 1.0).count(), 32 + 1 + 3);
    }

    #[test]
    fn en_passant_sets_both_capture_and_ep_flags() {
        let mv = Move { en_passant: true, ..Move::capture(36, 43) };
        let idx = move_indices(&mv);
        assert!(idx.contains(&FLAG_OFF));
        assert!(idx.contains(&(FLAG_OFF + 2)));
        assert!(!idx.contains(&(FLAG_OFF + 1)));
    }
}
