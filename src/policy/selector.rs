use rand::rngs::SmallRng;
use rand::Rng;

use super::features::{encode_all, FEATURE_LEN};
use super::strategy::MoveScorer;
use crate::board::{Game, Move};
use crate::config::{Hyperparams, FORBIDDEN_SCORE};
use crate::error::{ChessError, Result};
use crate::eval::heuristic::shaping_bonus_after;
use crate::eval::material::material_for;

/// Knobs for one call to [`select_move`].
#[derive(Clone, Debug, PartialEq)]
pub struct SelectParams {
    pub temperature: f32,
    /// Weight of the heuristic shaping bonus added to every score; 0 disables it.
    pub heuristic_weight: f32,
    pub anti_repeat: bool,
    pub anti_repeat_penalty: f32,
    pub ahead_multiplier: f32,
    pub epsilon: f32,
    /// Sample from the distribution; otherwise take the arg-max.
    pub sample: bool,
    pub collect_gradient: bool,
    /// Move id to choose regardless of the distribution.
    pub forced: Option<u16>,
}

impl SelectParams {
    pub fn training(hp: &Hyperparams) -> Self {
        Self {
            temperature: hp.train_temperature,
            heuristic_weight: hp.train_heuristic_weight,
            anti_repeat: true,
            anti_repeat_penalty: hp.anti_repeat_penalty,
            ahead_multiplier: hp.anti_repeat_ahead_multiplier,
            epsilon: 0.0,
            sample: true,
            collect_gradient: false,
            forced: None,
        }
    }

    pub fn play(hp: &Hyperparams) -> Self {
        Self {
            temperature: hp.play_temperature,
            heuristic_weight: hp.play_heuristic_weight,
            epsilon: hp.play_epsilon,
            sample: false,
            ..Self::training(hp)
        }
    }

    /// Training distribution with the choice pinned to `id`, collecting the gradient.
    pub fn replay(hp: &Hyperparams, id: u16) -> Self {
        Self { collect_gradient: true, forced: Some(id), ..Self::training(hp) }
    }
}

#[derive(Clone, Debug)]
pub struct Selection {
    pub index: usize,
    pub mv: Move,
    pub probabilities: Vec<f32>,
    /// `f(chosen) - E[f]` under `probabilities`, when requested.
    pub gradient: Option<Vec<f32>>,
    /// Prior occurrences of the position the chosen move leads to.
    pub repeat_count: u32,
}

/// Numerically stable softmax of `scores / temperature`; uniform when the normalizer degenerates.
pub fn softmax(scores: &[f32], temperature: f32) -> Vec<f32> {
    let n = scores.len();
    if n == 0 {
        return Vec::new();
    }
    let inv_t = 1.0 / temperature.max(1e-3);
    let max = scores.iter().map(|s| s * inv_t).fold(f32::NEG_INFINITY, f32::max);
    let mut probs: Vec<f32> = scores.iter().map(|s| (s * inv_t - max).exp()).collect();
    let sum: f32 = probs.iter().sum();
    if !sum.is_finite() || sum <= 0.0 {
        return vec![1.0 / n as f32; n];
    }
    for p in &mut probs {
        *p /= sum;
    }
    probs
}

fn sample_index(probs: &[f32], rng: &mut SmallRng) -> usize {
    let r: f32 = rng.gen();
    let mut cdf = 0.0f32;
    for (i, &p) in probs.iter().enumerate() {
        cdf += p.max(0.0);
        if r <= cdf {
            return i;
        }
    }
    probs.len() - 1
}

fn argmax(probs: &[f32]) -> usize {
    let mut best = 0;
    for (i, &p) in probs.iter().enumerate() {
        if p > probs[best] {
            best = i;
        }
    }
    best
}

/// Scores every legal move of `game`, shapes the scores, and picks one.
pub fn select_move(
    game: &Game,
    scorer: &dyn MoveScorer,
    params: &SelectParams,
    rng: &mut SmallRng,
) -> Result<Selection> {
    let legal = game.legal_moves();
    if legal.is_empty() {
        return Err(ChessError::NoLegalMoves);
    }
    let pos = game.position();
    let n = legal.len();

    let afters: Vec<_> = legal.iter().map(|mv| pos.apply(mv)).collect();
    let repeats: Vec<u32> = afters.iter().map(|p| game.repetitions().count(p.key())).collect();

    let raw = scorer.score_moves(pos, legal);
    let uniform = raw.is_none();
    let probabilities = match raw {
        None => vec![1.0 / n as f32; n],
        Some(mut scores) => {
            if params.heuristic_weight != 0.0 {
                for ((s, mv), after) in scores.iter_mut().zip(legal).zip(&afters) {
                    *s += params.heuristic_weight * shaping_bonus_after(pos, mv, after);
                }
            }
            if params.anti_repeat {
                // "Ahead" is a strict material lead; equality counts as not ahead.
                let ahead = material_for(pos, pos.side_to_move()) > 0.0;
                let has_fresh = repeats.iter().any(|&c| c == 0);
                for (s, &count) in scores.iter_mut().zip(&repeats) {
                    if count == 0 {
                        continue;
                    }
                    if ahead && has_fresh {
                        *s = FORBIDDEN_SCORE;
                    } else {
                        let scale = if ahead { params.ahead_multiplier } else { 1.0 };
                        *s -= params.anti_repeat_penalty * count as f32 * scale;
                    }
                }
            }
            softmax(&scores, params.temperature)
        }
    };

    let index = if let Some(id) = params.forced {
        legal
            .iter()
            .position(|m| m.id() == id)
            .ok_or_else(|| ChessError::InvalidMove(format!("forced move id {id} is not legal here")))?
    } else if params.epsilon > 0.0 && rng.gen::<f32>() < params.epsilon {
        rng.gen_range(0..n)
    } else if uniform {
        rng.gen_range(0..n)
    } else if params.sample {
        sample_index(&probabilities, rng)
    } else {
        argmax(&probabilities)
    };

    let gradient = params.collect_gradient.then(|| {
        let features = encode_all(pos, legal);
        let mut grad = vec![0.0f32; FEATURE_LEN];
        features[index].add_scaled_to(&mut grad, 1.0);
        for (f, &p) in features.iter().zip(&probabilities) {
            if p > 0.0 {
                f.add_scaled_to(&mut grad, -p);
            }
        }
        grad
    });

    Ok(Selection { index, mv: legal[index], probabilities, gradient, repeat_count: repeats[index] })
}
