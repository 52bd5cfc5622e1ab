//! REINFORCE updates from finished self-play games.

use log::{debug, info};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use super::{play_game, GameRecord, Progress, SelfPlayParams};
use crate::board::{Color, Outcome};
use crate::config::Hyperparams;
use crate::error::{ChessError, Result};
use crate::policy::strategy::Strategy;
use crate::policy::PolicyModel;

/// Applies every step of `record` to `model`. Returns the number of non-zero updates.
pub fn apply_trajectory(model: &mut PolicyModel, record: &GameRecord, hp: &Hyperparams) -> usize {
    let n = record.steps.len();
    if n == 0 {
        return 0;
    }
    let scale = hp.learning_rate / n as f32;
    let mut applied = 0;
    for step in &record.steps {
        let outcome = match step.player {
            Color::White => record.reward,
            Color::Black => -record.reward,
        };
        let advantage = outcome + record.shared_bias + step.move_penalty;
        if advantage == 0.0 {
            continue;
        }
        model.apply_gradient(&step.policy_gradient, scale * advantage, hp.weight_clip);
        applied += 1;
    }
    applied
}

#[derive(Clone, Debug)]
pub struct TrainConfig {
    pub target: String,
    pub white: Strategy,
    pub black: Strategy,
    pub games: usize,
    pub seed: u64,
    /// Swap colours every game so the target sees both sides.
    pub alternate_colors: bool,
    pub learn_from_opponent: bool,
    /// Progress callback cadence, in games.
    pub report_every: usize,
    pub hyper: Hyperparams,
}

impl TrainConfig {
    /// Target model against itself.
    pub fn self_play(target: impl Into<String>, games: usize, seed: u64) -> Self {
        let target = target.into();
        let me = Strategy::Trained(target.clone());
        Self {
            target,
            white: me.clone(),
            black: me,
            games,
            seed,
            alternate_colors: false,
            learn_from_opponent: true,
            report_every: 1,
            hyper: Hyperparams::default(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TrainSummary {
    pub games: usize,
    pub white_wins: usize,
    pub black_wins: usize,
    pub draws: usize,
    pub loop_draws: usize,
    pub total_plies: usize,
    pub updates: usize,
    pub stagnant_plies: usize,
}

impl TrainSummary {
    fn record(&mut self, rec: &GameRecord, updates: usize) {
        self.games += 1;
        match rec.outcome {
            Outcome::Win(Color::White) => self.white_wins += 1,
            Outcome::Win(Color::Black) => self.black_wins += 1,
            Outcome::Draw(_) => self.draws += 1,
        }
        if rec.outcome.is_loop_draw() {
            self.loop_draws += 1;
        }
        self.total_plies += rec.plies();
        self.updates += updates;
        self.stagnant_plies += rec.stagnant_plies;
    }

    pub fn avg_plies(&self) -> f32 {
        if self.games == 0 { 0.0 } else { self.total_plies as f32 / self.games as f32 }
    }
}

/// Plays `cfg.games` games and updates the target model after each one.
pub fn train_batch(models: &mut [PolicyModel], cfg: &TrainConfig, progress: &mut dyn Progress) -> Result<TrainSummary> {
    if !models.iter().any(|m| m.id == cfg.target) {
        return Err(ChessError::UnknownModel(cfg.target.clone()));
    }
    let mut seeds = SmallRng::seed_from_u64(cfg.seed);
    let mut summary = TrainSummary::default();
    let every = cfg.report_every.max(1);

    for gi in 0..cfg.games {
        let (white, black) = if cfg.alternate_colors && gi % 2 == 1 {
            (cfg.black.clone(), cfg.white.clone())
        } else {
            (cfg.white.clone(), cfg.black.clone())
        };
        let params = SelfPlayParams {
            seed: seeds.gen(),
            learn_from_opponent: cfg.learn_from_opponent,
            hyper: cfg.hyper.clone(),
            ..SelfPlayParams::training(0, white, black, cfg.target.clone())
        };
        let record = play_game(&params, models, progress)?;

        let model = models
            .iter_mut()
            .find(|m| m.id == cfg.target)
            .ok_or_else(|| ChessError::UnknownModel(cfg.target.clone()))?;
        let updates = apply_trajectory(model, &record, &cfg.hyper);
        model.games_trained += 1;
        debug!(
            "{} game {}: {} in {} plies, reward {:+}, bias {:.3}, {} updates",
            model.id,
            model.games_trained,
            record.outcome,
            record.plies(),
            record.reward,
            record.shared_bias,
            updates
        );
        summary.record(&record, updates);

        if (gi + 1) % every == 0 || gi + 1 == cfg.games {
            progress.game_finished(gi + 1, cfg.games, &record);
        }
    }

    info!(
        "trained {} on {} games: +{} ={} -{} (white/draw/black), {} loop draws, avg {:.1} plies",
        cfg.target,
        summary.games,
        summary.white_wins,
        summary.draws,
        summary.black_wins,
        summary.loop_draws,
        summary.avg_plies()
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::DrawReason;
    use crate::policy::FEATURE_LEN;
    use crate::selfplay::{NoProgress, TrajectoryStep};

    fn record(reward: f32, shared_bias: f32, steps: Vec<TrajectoryStep>) -> GameRecord {
        GameRecord {
            seed: 0,
            white: Strategy::Random,
            black: Strategy::Random,
            moves: Vec::new(),
            uci: Vec::new(),
            outcome: if reward > 0.0 { Outcome::Win(Color::White) } else { Outcome::Draw(DrawReason::PlyCap) },
            reward,
            shared_bias,
            stagnant_plies: 0,
            movetext: String::new(),
            steps,
        }
    }

    #[test]
    fn zero_advantage_is_skipped() {
        let mut m = PolicyModel::new("m", "m");
        let step = TrajectoryStep { player: Color::White, policy_gradient: vec![1.0; FEATURE_LEN], move_penalty: 0.0 };
        let rec = record(0.0, 0.0, vec![step]);
        assert_eq!(apply_trajectory(&mut m, &rec, &Hyperparams::default()), 0);
        assert!(m.weights.iter().all(|&w| w == 0.0));
    }

    #[test]
    fn black_steps_see_negated_reward() {
        let mut m = PolicyModel::new("m", "m");
        let mut g = vec![0.0; FEATURE_LEN];
        g[3] = 1.0;
        let step = TrajectoryStep { player: Color::Black, policy_gradient: g, move_penalty: 0.0 };
        apply_trajectory(&mut m, &record(1.0, 0.0, vec![step]), &Hyperparams::default());
        assert!((m.weights[3] + 0.05).abs() < 1e-7);
    }

    #[test]
    fn batch_counts_games() {
        let mut models = vec![PolicyModel::new("m", "m")];
        let mut cfg = TrainConfig::self_play("m", 2, 9);
        cfg.hyper.max_plies = 30;
        let summary = train_batch(&mut models, &cfg, &mut NoProgress).unwrap();
        assert_eq!(summary.games, 2);
        assert_eq!(models[0].games_trained, 2);
        assert!(models[0].weights.iter().all(|w| w.abs() <= 5.0));
    }
}
