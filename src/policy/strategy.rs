use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::features::encode_all;
use super::model::PolicyModel;
use crate::board::{Move, Position};
use crate::error::{ChessError, Result};
use crate::eval::heuristic::strategy_score;

pub const RANDOM_ID: &str = "random";
pub const HEURISTIC_ID: &str = "heuristic";

pub fn is_reserved_id(id: &str) -> bool { id == RANDOM_ID || id == HEURISTIC_ID }

/// Closed vocabulary for naming a move-selection strategy.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    Random,
    Heuristic,
    Trained(String),
}

impl FromStr for Strategy {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "" => Err(ChessError::UnknownModel(s.to_string())),
            RANDOM_ID => Ok(Strategy::Random),
            HEURISTIC_ID => Ok(Strategy::Heuristic),
            id => Ok(Strategy::Trained(id.to_string())),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Random => f.write_str(RANDOM_ID),
            Strategy::Heuristic => f.write_str(HEURISTIC_ID),
            Strategy::Trained(id) => f.write_str(id),
        }
    }
}

/// Per-move scoring shared by every strategy.
pub trait MoveScorer {
    fn name(&self) -> &str;

    /// Raw score per candidate move, or `None` to choose uniformly at random.
    fn score_moves(&self, pos: &Position, moves: &[Move]) -> Option<Vec<f32>>;
}

pub struct RandomScorer;

impl MoveScorer for RandomScorer {
    fn name(&self) -> &str { RANDOM_ID }

    fn score_moves(&self, _pos: &Position, _moves: &[Move]) -> Option<Vec<f32>> { None }
}

pub struct HeuristicScorer;

impl MoveScorer for HeuristicScorer {
    fn name(&self) -> &str { HEURISTIC_ID }

    fn score_moves(&self, pos: &Position, moves: &[Move]) -> Option<Vec<f32>> {
        Some(moves.iter().map(|mv| strategy_score(pos, mv)).collect())
    }
}

impl MoveScorer for PolicyModel {
    fn name(&self) -> &str { &self.id }

    fn score_moves(&self, pos: &Position, moves: &[Move]) -> Option<Vec<f32>> {
        Some(encode_all(pos, moves).iter().map(|f| self.score(f)).collect())
    }
}

static RANDOM: RandomScorer = RandomScorer;
static HEURISTIC: HeuristicScorer = HeuristicScorer;

/// Resolves a strategy to its scorer, looking trained ids up in `models`.
pub fn resolve<'a>(strategy: &Strategy, models: &'a [PolicyModel]) -> Result<&'a dyn MoveScorer> {
    match strategy {
        Strategy::Random => Ok(&RANDOM),
        Strategy::Heuristic => Ok(&HEURISTIC),
        Strategy::Trained(id) => models
            .iter()
            .find(|m| &m.id == id)
            .map(|m| m as &dyn MoveScorer)
            .ok_or_else(|| ChessError::UnknownModel(id.clone())),
    }
}
