//! Seeded self-play: full simulated games between two strategies, with the
//! per-ply gradients and shaping penalties the trainer consumes.

pub mod train;

use log::debug;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::board::{Color, Game, Outcome};
use crate::config::Hyperparams;
use crate::error::{ChessError, Result};
use crate::eval::material::progress_score;
use crate::policy::selector::{select_move, SelectParams};
use crate::policy::strategy::{resolve, Strategy};
use crate::policy::PolicyModel;

/// Which selection settings the acting side uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayMode {
    /// Training temperature and blend, sampled.
    Training,
    /// Play temperature and blend, arg-max with epsilon exploration.
    Match,
}

#[derive(Clone, Debug)]
pub struct SelfPlayParams {
    pub seed: u64,
    pub white: Strategy,
    pub black: Strategy,
    /// Model id that receives gradients. `None` records no trajectory.
    pub train: Option<String>,
    /// Record steps for every post-opening ply, not only the plies the trained model acted on.
    pub learn_from_opponent: bool,
    pub mode: PlayMode,
    pub hyper: Hyperparams,
}

impl SelfPlayParams {
    pub fn training(seed: u64, white: Strategy, black: Strategy, target: impl Into<String>) -> Self {
        Self {
            seed,
            white,
            black,
            train: Some(target.into()),
            learn_from_opponent: true,
            mode: PlayMode::Training,
            hyper: Hyperparams::default(),
        }
    }

    pub fn exhibition(seed: u64, white: Strategy, black: Strategy) -> Self {
        Self { train: None, mode: PlayMode::Match, ..Self::training(seed, white, black, "") }
    }

    fn strategy_for(&self, color: Color) -> &Strategy {
        match color {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }

    fn opening_range(&self) -> (usize, usize) {
        match self.mode {
            PlayMode::Training => self.hyper.train_opening_plies,
            PlayMode::Match => self.hyper.match_opening_plies,
        }
    }

    fn select_params(&self) -> SelectParams {
        match self.mode {
            PlayMode::Training => SelectParams::training(&self.hyper),
            PlayMode::Match => SelectParams::play(&self.hyper),
        }
    }
}

/// One recorded ply of the trained model's trajectory.
#[derive(Clone, Debug, PartialEq)]
pub struct TrajectoryStep {
    pub player: Color,
    pub policy_gradient: Vec<f32>,
    /// Repetition and no-progress penalties for this ply; zero or negative.
    pub move_penalty: f32,
}

#[derive(Clone, Debug, Serialize)]
pub struct GameRecord {
    pub seed: u64,
    pub white: Strategy,
    pub black: Strategy,
    pub moves: Vec<String>,
    pub uci: Vec<String>,
    pub outcome: Outcome,
    /// +1 White win, -1 Black win, 0 draw.
    pub reward: f32,
    pub shared_bias: f32,
    pub stagnant_plies: usize,
    pub movetext: String,
    #[serde(skip)]
    pub steps: Vec<TrajectoryStep>,
}

impl GameRecord {
    pub fn plies(&self) -> usize { self.moves.len() }

    pub fn result_text(&self) -> String { self.outcome.to_string() }
}

/// Observer for long-running loops. Both hooks default to no-ops.
pub trait Progress {
    fn ply(&mut self, _game: &Game) {}
    fn game_finished(&mut self, _done: usize, _total: usize, _record: &GameRecord) {}
}

pub struct NoProgress;

impl Progress for NoProgress {}

/// Trailing-window stagnation tracker over the white-relative progress score.
struct ProgressWindow {
    scores: Vec<f32>,
    window: usize,
    threshold: f32,
    grace: usize,
}

impl ProgressWindow {
    fn new(hp: &Hyperparams) -> Self {
        Self {
            scores: Vec::new(),
            window: hp.no_progress_window,
            threshold: hp.no_progress_threshold,
            grace: hp.no_progress_grace_plies,
        }
    }

    /// Records the score after `ply` and reports whether the game is stagnant.
    fn push(&mut self, ply: usize, score: f32) -> bool {
        self.scores.push(score);
        if ply < self.grace || self.scores.len() <= self.window {
            return false;
        }
        let tail = &self.scores[self.scores.len() - self.window - 1..];
        let lo = tail.iter().copied().fold(f32::INFINITY, f32::min);
        let hi = tail.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        hi - lo <= self.threshold
    }
}

/// Per-ply shaping: a cost per prior occurrence of the reached position, plus a flat cost when stagnant.
fn move_penalty(hp: &Hyperparams, repeat_count: u32, stagnant: bool) -> f32 {
    let mut penalty = -hp.repeat_move_penalty * repeat_count as f32;
    if stagnant {
        penalty -= hp.no_progress_penalty;
    }
    penalty
}

/// Plays one complete game from the initial position.
pub fn play_game(params: &SelfPlayParams, models: &[PolicyModel], progress: &mut dyn Progress) -> Result<GameRecord> {
    let hp = &params.hyper;
    let mut rng = SmallRng::seed_from_u64(params.seed);
    let mut game = Game::new();
    let white = resolve(&params.white, models)?;
    let black = resolve(&params.black, models)?;
    let trained = match &params.train {
        Some(id) => Some(
            models.iter().find(|m| &m.id == id).ok_or_else(|| ChessError::UnknownModel(id.clone()))?,
        ),
        None => None,
    };
    let acting = params.select_params();

    let mut uci = Vec::new();
    let mut steps = Vec::new();
    let mut stagnant_plies = 0usize;
    let mut window = ProgressWindow::new(hp);

    let (lo, hi) = params.opening_range();
    let opening = rng.gen_range(lo..=hi.max(lo));
    while game.plies() < opening && !game.is_over() {
        let legal = game.legal_moves();
        let mv = legal[rng.gen_range(0..legal.len())];
        game.play(&mv)?;
        uci.push(mv.to_string());
        window.push(game.plies(), progress_score(game.position()));
        progress.ply(&game);
    }

    while !game.is_over() {
        if game.plies() >= hp.max_plies {
            game.adjudicate_ply_cap();
            break;
        }
        let mover = game.position().side_to_move();
        let strategy = params.strategy_for(mover);
        let scorer = match mover {
            Color::White => white,
            Color::Black => black,
        };
        let choice = select_move(&game, scorer, &acting, &mut rng)?;

        let gradient = match trained {
            Some(model) if params.learn_from_opponent || matches!(strategy, Strategy::Trained(id) if *id == model.id) => {
                let replay = SelectParams::replay(hp, choice.mv.id());
                select_move(&game, model, &replay, &mut rng)?.gradient
            }
            _ => None,
        };

        game.play(&choice.mv)?;
        uci.push(choice.mv.to_string());
        let stagnant = window.push(game.plies(), progress_score(game.position()));
        if stagnant {
            stagnant_plies += 1;
        }
        if let Some(policy_gradient) = gradient {
            let move_penalty = move_penalty(hp, choice.repeat_count, stagnant);
            steps.push(TrajectoryStep { player: mover, policy_gradient, move_penalty });
        }
        progress.ply(&game);
    }

    let outcome = game.result().ok_or_else(|| ChessError::GameOver("game ended without a result".into()))?;
    let plies = game.plies();
    let mut shared_bias = -hp.ply_penalty * plies as f32;
    if outcome.is_loop_draw() {
        shared_bias -= hp.loop_draw_penalty;
    }
    debug!(
        "seed {} {} vs {}: {} after {} plies ({} steps, {} stagnant)",
        params.seed,
        params.white,
        params.black,
        outcome,
        plies,
        steps.len(),
        stagnant_plies
    );

    Ok(GameRecord {
        seed: params.seed,
        white: params.white.clone(),
        black: params.black.clone(),
        moves: game.history().to_vec(),
        uci,
        outcome,
        reward: outcome.reward(),
        shared_bias,
        stagnant_plies,
        movetext: game.pgn_movetext(),
        steps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_game() {
        let models = vec![PolicyModel::new("m", "m")];
        let p = SelfPlayParams::training(42, Strategy::Trained("m".into()), Strategy::Heuristic, "m");
        let a = play_game(&p, &models, &mut NoProgress).unwrap();
        let b = play_game(&p, &models, &mut NoProgress).unwrap();
        assert_eq!(a.moves, b.moves);
        assert_eq!(a.reward, b.reward);
        assert_eq!(a.steps.len(), b.steps.len());
    }

    #[test]
    fn ply_cap_forces_a_draw() {
        let mut p = SelfPlayParams::exhibition(5, Strategy::Random, Strategy::Random);
        p.hyper.max_plies = 10;
        let rec = play_game(&p, &[], &mut NoProgress).unwrap();
        assert!(rec.plies() <= 10);
        if rec.plies() == 10 {
            assert_eq!(rec.outcome, Outcome::Draw(crate::board::DrawReason::PlyCap));
        }
        assert!(rec.steps.is_empty());
    }

    #[test]
    fn stagnation_needs_a_full_flat_window() {
        let hp = Hyperparams { no_progress_grace_plies: 0, no_progress_window: 3, ..Hyperparams::default() };
        let mut w = ProgressWindow::new(&hp);
        assert!(!w.push(1, 0.0));
        assert!(!w.push(2, 0.0));
        assert!(!w.push(3, 0.0));
        assert!(w.push(4, 0.1));
        assert!(!w.push(5, 1.0));
    }

    #[test]
    fn move_penalty_combines_repeats_and_stagnation() {
        let hp = Hyperparams { repeat_move_penalty: 0.25, no_progress_penalty: 0.1, ..Hyperparams::default() };
        assert_eq!(move_penalty(&hp, 0, false), 0.0);
        assert!((move_penalty(&hp, 2, false) + 0.5).abs() < 1e-6);
        assert!((move_penalty(&hp, 0, true) + 0.1).abs() < 1e-6);
        assert!((move_penalty(&hp, 1, true) + 0.35).abs() < 1e-6);
    }

    #[test]
    fn stagnant_plies_carry_the_no_progress_penalty() {
        // A threshold no score swing can exceed makes every ply past the window stagnant.
        let mut p = SelfPlayParams::training(17, Strategy::Random, Strategy::Random, "m");
        p.hyper = Hyperparams {
            no_progress_grace_plies: 0,
            no_progress_window: 4,
            no_progress_threshold: 1.0e6,
            no_progress_penalty: 0.75,
            repeat_move_penalty: 0.0,
            max_plies: 40,
            ..Hyperparams::default()
        };
        let models = vec![PolicyModel::new("m", "m")];
        let rec = play_game(&p, &models, &mut NoProgress).unwrap();

        let opening = rec.plies() - rec.steps.len();
        assert!(!rec.steps.is_empty());
        for (i, step) in rec.steps.iter().enumerate() {
            let ply = opening + i + 1;
            let expected = if ply >= 5 { -0.75 } else { 0.0 };
            assert_eq!(step.move_penalty, expected, "ply {ply}");
        }
        let stagnant = rec.steps.iter().filter(|s| s.move_penalty < 0.0).count();
        assert_eq!(stagnant, rec.stagnant_plies);
    }

    #[test]
    fn unknown_training_target_is_an_error() {
        let p = SelfPlayParams::training(1, Strategy::Random, Strategy::Random, "missing");
        assert!(matches!(play_game(&p, &[], &mut NoProgress), Err(ChessError::UnknownModel(_))));
    }
}
