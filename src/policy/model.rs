use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use super::features::{Features, FEATURE_LEN};
use crate::error::{ChessError, Result};

pub fn now_ms() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis() as u64).unwrap_or(0)
}

/// Linear move-scoring policy: score = weights · features.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PolicyModel {
    pub id: String,
    pub display_name: String,
    pub games_trained: u64,
    pub weights: Vec<f32>,
    #[serde(default)]
    pub created_at: u64,
    #[serde(default)]
    pub updated_at: u64,
}

impl PolicyModel {
    /// Fresh model with a zero weight vector.
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        let ts = now_ms();
        Self {
            id: id.into(),
            display_name: display_name.into(),
            games_trained: 0,
            weights: vec![0.0; FEATURE_LEN],
            created_at: ts,
            updated_at: ts,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.weights.len() != FEATURE_LEN {
            return Err(ChessError::WeightLength { expected: FEATURE_LEN, actual: self.weights.len() });
        }
        if self.weights.iter().any(|w| !w.is_finite()) {
            return Err(ChessError::CorruptModel(format!("{} has non-finite weights", self.id)));
        }
        Ok(())
    }

    #[inline]
    pub fn score(&self, f: &Features) -> f32 { f.dot(&self.weights) }

    /// `w += scale * gradient`, then clip every component to `±clip`.
    pub fn apply_gradient(&mut self, gradient: &[f32], scale: f32, clip: f32) {
        for (w, g) in self.weights.iter_mut().zip(gradient) {
            *w = (*w + scale * g).clamp(-clip, clip);
        }
        self.updated_at = now_ms();
    }
}
