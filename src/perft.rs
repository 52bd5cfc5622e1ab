use crate::board::{legal_moves, CastlingRights, Color, Position};
use crate::error::{ChessError, Result};

/// Leaf node count of the legal move tree to `depth`.
pub fn perft(pos: &Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = legal_moves(pos);
    if depth == 1 {
        return moves.len() as u64;
    }
    moves.iter().map(|mv| perft(&pos.apply(mv), depth - 1)).sum()
}

/// Per-root-move counts, for locating generator bugs.
pub fn divide(pos: &Position, depth: u32) -> Vec<(String, u64)> {
    let mut out: Vec<_> = legal_moves(pos)
        .iter()
        .map(|mv| (mv.to_string(), if depth <= 1 { 1 } else { perft(&pos.apply(mv), depth - 1) }))
        .collect();
    out.sort();
    out
}

pub const PRESETS: [&str; 3] = ["startpos", "kiwipete", "endgame"];

/// Standard perft test positions by name.
pub fn preset(name: &str) -> Result<Position> {
    match name {
        "startpos" => Ok(Position::startpos()),
        "kiwipete" => Position::builder()
            .diagram([
                "r...k..r",
                "p.ppqpb.",
                "bn..pnp.",
                "...PN...",
                ".p..P...",
                "..N..Q.p",
                "PPPBBPPP",
                "R...K..R",
            ])
            .castling(CastlingRights::ALL)
            .build(),
        "endgame" => Position::builder()
            .diagram([
                "........",
                "..p.....",
                "...p....",
                "KP.....r",
                ".R...p.k",
                "........",
                "....P.P.",
                "........",
            ])
            .side_to_move(Color::White)
            .build(),
        other => Err(ChessError::InvalidPosition(format!(
            "unknown perft position {other}; expected one of {}",
            PRESETS.join(", ")
        ))),
    }
}
