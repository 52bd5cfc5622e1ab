// Chess rules engine plus a self-play trainer for a linear move policy.
pub mod board;
pub mod config;
pub mod error;
pub mod eval;
pub mod match_play;
pub mod perft;
pub mod policy;
pub mod selfplay;
pub mod session;
pub mod store;

pub use error::{ChessError, Result};
