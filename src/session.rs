//! Caller-owned session: current game, loaded models, the model store and the busy flag.

use log::{info, warn};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::time::{Duration, Instant};

use crate::board::{Game, Outcome};
use crate::config::Hyperparams;
use crate::error::{ChessError, Result};
use crate::match_play::{run_match, MatchConfig, MatchSummary};
use crate::policy::selector::{select_move, SelectParams};
use crate::policy::strategy::{resolve, Strategy};
use crate::policy::PolicyModel;
use crate::selfplay::train::{train_batch, TrainConfig, TrainSummary};
use crate::selfplay::Progress;
use crate::store::{load_models, validate_id, ModelStore, DEFAULT_MODEL_ID};

/// Long-running operations; at most one runs at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Activity {
    Autoplaying,
    Training,
    MatchPlaying,
}

impl Activity {
    pub fn label(self) -> &'static str {
        match self {
            Activity::Autoplaying => "autoplay",
            Activity::Training => "training",
            Activity::MatchPlaying => "match",
        }
    }
}

pub struct Session {
    game: Game,
    models: Vec<PolicyModel>,
    active: String,
    store: Box<dyn ModelStore>,
    busy: Option<Activity>,
    rng: SmallRng,
    hyper: Hyperparams,
}

impl Session {
    pub fn new(store: Box<dyn ModelStore>, seed: u64) -> Self {
        let models = load_models(store.as_ref());
        let active = models.first().map(|m| m.id.clone()).unwrap_or_else(|| DEFAULT_MODEL_ID.to_string());
        info!("session loaded {} model(s), active {}", models.len(), active);
        Self {
            game: Game::new(),
            models,
            active,
            store,
            busy: None,
            rng: SmallRng::seed_from_u64(seed),
            hyper: Hyperparams::default(),
        }
    }

    pub fn game(&self) -> &Game { &self.game }
    pub fn models(&self) -> &[PolicyModel] { &self.models }
    pub fn busy(&self) -> Option<Activity> { self.busy }
    pub fn hyperparams(&self) -> &Hyperparams { &self.hyper }
    /// Used by `play_strategy` and by configs built with `train_config` or `match_config`.
    /// Configs passed to `train` and `run_match` carry their own copy.
    pub fn set_hyperparams(&mut self, hyper: Hyperparams) { self.hyper = hyper; }
    pub fn is_persistent(&self) -> bool { self.store.is_persistent() }

    pub fn active_model(&self) -> Option<&PolicyModel> { self.models.iter().find(|m| m.id == self.active) }

    /// Runs `f` with `activity` marked busy; refuses if anything else is running.
    pub fn run_exclusive<T>(&mut self, activity: Activity, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.ensure_idle(activity.label())?;
        self.busy = Some(activity);
        let out = f(self);
        self.busy = None;
        out
    }

    fn ensure_idle(&self, requested: &'static str) -> Result<()> {
        match self.busy {
            Some(a) => Err(ChessError::Busy { active: a.label(), requested }),
            None => Ok(()),
        }
    }

    pub fn new_game(&mut self) -> Result<()> {
        self.ensure_idle("new game")?;
        self.game = Game::new();
        Ok(())
    }

    /// Plays free-form SAN; the game is unchanged when it does not match.
    pub fn play_san(&mut self, text: &str) -> Result<String> {
        self.ensure_idle("move")?;
        self.game.play_san(text)
    }

    pub fn play_random(&mut self) -> Result<String> {
        self.ensure_idle("random move")?;
        self.random_move()
    }

    fn random_move(&mut self) -> Result<String> {
        if let Some(outcome) = self.game.result() {
            return Err(ChessError::GameOver(outcome.to_string()));
        }
        let legal = self.game.legal_moves();
        if legal.is_empty() {
            return Err(ChessError::NoLegalMoves);
        }
        let mv = legal[self.rng.gen_range(0..legal.len())];
        self.game.play(&mv)
    }

    /// Lets `strategy` choose the next move with play settings.
    pub fn play_strategy(&mut self, strategy: &Strategy) -> Result<String> {
        self.ensure_idle("move")?;
        if let Some(outcome) = self.game.result() {
            return Err(ChessError::GameOver(outcome.to_string()));
        }
        let scorer = resolve(strategy, &self.models)?;
        let choice = select_move(&self.game, scorer, &SelectParams::play(&self.hyper), &mut self.rng)?;
        self.game.play(&choice.mv)
    }

    /// Plays random moves until the game ends, calling `on_ply` after each one.
    pub fn autoplay(&mut self, on_ply: &mut dyn FnMut(&Game)) -> Result<(Outcome, Duration)> {
        self.run_exclusive(Activity::Autoplaying, |s| {
            if let Some(outcome) = s.game.result() {
                return Err(ChessError::GameOver(outcome.to_string()));
            }
            let started = Instant::now();
            while !s.game.is_over() {
                s.random_move()?;
                on_ply(&s.game);
            }
            let outcome = s.game.result().ok_or(ChessError::NoLegalMoves)?;
            Ok((outcome, started.elapsed()))
        })
    }

    pub fn create_model(&mut self, id: &str, display_name: &str) -> Result<&PolicyModel> {
        self.ensure_idle("create model")?;
        validate_id(id)?;
        if self.models.iter().any(|m| m.id == id) {
            return Err(ChessError::DuplicateModel(id.to_string()));
        }
        let name = if display_name.trim().is_empty() { id } else { display_name.trim() };
        let model = PolicyModel::new(id, name);
        persist(self.store.as_mut(), &model);
        self.models.push(model);
        self.active = id.to_string();
        Ok(&self.models[self.models.len() - 1])
    }

    pub fn delete_model(&mut self, id: &str) -> Result<()> {
        self.ensure_idle("delete model")?;
        let idx = self.models.iter().position(|m| m.id == id).ok_or_else(|| ChessError::UnknownModel(id.to_string()))?;
        self.store.delete(id)?;
        self.models.remove(idx);
        if self.models.is_empty() {
            let fresh = PolicyModel::new(DEFAULT_MODEL_ID, "Default model");
            persist(self.store.as_mut(), &fresh);
            self.models.push(fresh);
        }
        if self.active == id {
            self.active = self.models[0].id.clone();
        }
        Ok(())
    }

    pub fn select_model(&mut self, id: &str) -> Result<()> {
        self.ensure_idle("select model")?;
        if !self.models.iter().any(|m| m.id == id) {
            return Err(ChessError::UnknownModel(id.to_string()));
        }
        self.active = id.to_string();
        Ok(())
    }

    /// Self-play config for `target` carrying this session's hyperparameters.
    pub fn train_config(&self, target: impl Into<String>, games: usize, seed: u64) -> TrainConfig {
        TrainConfig { hyper: self.hyper.clone(), ..TrainConfig::self_play(target, games, seed) }
    }

    pub fn match_config(&self, a: Strategy, b: Strategy, games: usize, seed: u64) -> MatchConfig {
        MatchConfig { hyper: self.hyper.clone(), ..MatchConfig::new(a, b, games, seed) }
    }

    /// Trains `cfg.target` and persists it after the batch.
    pub fn train(&mut self, cfg: &TrainConfig, progress: &mut dyn Progress) -> Result<TrainSummary> {
        self.run_exclusive(Activity::Training, |s| {
            let summary = train_batch(&mut s.models, cfg, progress)?;
            if let Some(model) = s.models.iter().find(|m| m.id == cfg.target) {
                persist(s.store.as_mut(), model);
            }
            Ok(summary)
        })
    }

    pub fn run_match(&mut self, cfg: &MatchConfig, progress: &mut dyn Progress) -> Result<MatchSummary> {
        self.run_exclusive(Activity::MatchPlaying, |s| run_match(cfg, &s.models, progress))
    }
}

fn persist(store: &mut dyn ModelStore, model: &PolicyModel) {
    if let Err(e) = store.put(model) {
        warn!("could not save model {}: {}", model.id, e);
    }
}
