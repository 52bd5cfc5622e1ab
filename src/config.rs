//! Fixed training and play constants.

use serde::{Deserialize, Serialize};

pub const LEARNING_RATE: f32 = 0.05;
/// Every weight is clipped to `[-WEIGHT_CLIP, WEIGHT_CLIP]` after each update.
pub const WEIGHT_CLIP: f32 = 5.0;

pub const TRAIN_TEMPERATURE: f32 = 1.0;
pub const PLAY_TEMPERATURE: f32 = 0.35;
pub const TRAIN_HEURISTIC_WEIGHT: f32 = 0.6;
pub const PLAY_HEURISTIC_WEIGHT: f32 = 0.35;
pub const PLAY_EPSILON: f32 = 0.03;

pub const PLY_PENALTY: f32 = 0.001;
pub const LOOP_DRAW_PENALTY: f32 = 0.3;

pub const NO_PROGRESS_WINDOW: usize = 12;
pub const NO_PROGRESS_THRESHOLD: f32 = 0.25;
pub const NO_PROGRESS_PENALTY: f32 = 0.02;
pub const NO_PROGRESS_GRACE_PLIES: usize = 20;

/// Score subtracted per prior occurrence of the resulting position.
pub const ANTI_REPEAT_PENALTY: f32 = 1.5;
pub const ANTI_REPEAT_AHEAD_MULTIPLIER: f32 = 2.0;
/// Reward penalty per prior occurrence of the position a chosen move repeats.
pub const REPEAT_MOVE_PENALTY: f32 = 0.05;
/// Score given to moves forbidden outright.
pub const FORBIDDEN_SCORE: f32 = -1.0e9;

pub const TRAIN_OPENING_PLIES: (usize, usize) = (2, 6);
pub const MATCH_OPENING_PLIES: (usize, usize) = (0, 4);

pub const MAX_PLIES: usize = 200;

/// Bundles the constants so one consistent set can be passed around and dumped.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hyperparams {
    pub learning_rate: f32,
    pub weight_clip: f32,
    pub train_temperature: f32,
    pub play_temperature: f32,
    pub train_heuristic_weight: f32,
    pub play_heuristic_weight: f32,
    pub play_epsilon: f32,
    pub ply_penalty: f32,
    pub loop_draw_penalty: f32,
    pub no_progress_window: usize,
    pub no_progress_threshold: f32,
    pub no_progress_penalty: f32,
    pub no_progress_grace_plies: usize,
    pub anti_repeat_penalty: f32,
    pub anti_repeat_ahead_multiplier: f32,
    pub repeat_move_penalty: f32,
    pub train_opening_plies: (usize, usize),
    pub match_opening_plies: (usize, usize),
    pub max_plies: usize,
}

impl Default for Hyperparams {
    fn default() -> Self {
        Self {
            learning_rate: LEARNING_RATE,
            weight_clip: WEIGHT_CLIP,
            train_temperature: TRAIN_TEMPERATURE,
            play_temperature: PLAY_TEMPERATURE,
            train_heuristic_weight: TRAIN_HEURISTIC_WEIGHT,
            play_heuristic_weight: PLAY_HEURISTIC_WEIGHT,
            play_epsilon: PLAY_EPSILON,
            ply_penalty: PLY_PENALTY,
            loop_draw_penalty: LOOP_DRAW_PENALTY,
            no_progress_window: NO_PROGRESS_WINDOW,
            no_progress_threshold: NO_PROGRESS_THRESHOLD,
            no_progress_penalty: NO_PROGRESS_PENALTY,
            no_progress_grace_plies: NO_PROGRESS_GRACE_PLIES,
            anti_repeat_penalty: ANTI_REPEAT_PENALTY,
            anti_repeat_ahead_multiplier: ANTI_REPEAT_AHEAD_MULTIPLIER,
            repeat_move_penalty: REPEAT_MOVE_PENALTY,
            train_opening_plies: TRAIN_OPENING_PLIES,
            match_opening_plies: MATCH_OPENING_PLIES,
            max_plies: MAX_PLIES,
        }
    }
}
