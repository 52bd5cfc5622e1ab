pub mod game;
pub mod movegen;
pub mod position;
pub mod san;
pub mod status;
pub mod types;
pub mod zobrist;

pub use game::{Game, Repetitions};
pub use movegen::{in_check, is_square_attacked, legal_moves, pseudo_legal_moves};
pub use position::{Position, PositionBuilder};
pub use status::{DrawReason, GameStatus, Outcome};
pub use types::{CastleSide, CastlingRights, Color, Move, Piece, PieceKind, Square};
