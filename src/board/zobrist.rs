use std::sync::OnceLock;

use super::position::Position;
use super::types::file_of;

// 12*64 piece-square keys, side, 4 castling flags, 8 en-passant files
const PIECE_KEYS: usize = 12 * 64;
const SIDE_KEY: usize = PIECE_KEYS;
const CASTLE_KEYS: usize = SIDE_KEY + 1;
const EP_KEYS: usize = CASTLE_KEYS + 4;
const TABLE_LEN: usize = EP_KEYS + 8;

fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

static TABLE: OnceLock<[u64; TABLE_LEN]> = OnceLock::new();

fn table() -> &'static [u64; TABLE_LEN] {
    TABLE.get_or_init(|| {
        let mut t = [0u64; TABLE_LEN];
        let mut seed = 0xF00D_F00D_DEAD_BEEF;
        for v in &mut t {
            seed = splitmix64(seed);
            *v = seed;
        }
        t
    })
}

/// Position key over board, side to move, castling rights and en-passant square.
/// Move history never enters the key.
pub fn compute(pos: &Position) -> u64 {
    let t = table();
    let mut key = 0u64;
    for sq in 0..64u8 {
        if let Some(p) = pos.piece_at(sq) {
            key ^= t[p.plane() * 64 + sq as usize];
        }
    }
    if pos.side_to_move() == super::types::Color::Black { key ^= t[SIDE_KEY]; }
    for (i, set) in pos.castling().flags().iter().enumerate() {
        if *set { key ^= t[CASTLE_KEYS + i]; }
    }
    if let Some(ep) = pos.en_passant() {
        key ^= t[EP_KEYS + file_of(ep) as usize];
    }
    key
}
