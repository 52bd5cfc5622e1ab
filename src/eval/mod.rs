pub mod heuristic;
pub mod material;
