//! Head-to-head evaluation between two strategies.

use log::info;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::board::{Color, Outcome};
use crate::config::Hyperparams;
use crate::error::Result;
use crate::policy::strategy::{resolve, Strategy};
use crate::policy::PolicyModel;
use crate::selfplay::{play_game, GameRecord, PlayMode, Progress, SelfPlayParams};

#[derive(Clone, Debug)]
pub struct MatchConfig {
    pub a: Strategy,
    pub b: Strategy,
    pub games: usize,
    pub seed: u64,
    /// `a` takes White in even games and Black in odd ones.
    pub alternate_colors: bool,
    pub report_every: usize,
    pub hyper: Hyperparams,
}

impl MatchConfig {
    pub fn new(a: Strategy, b: Strategy, games: usize, seed: u64) -> Self {
        Self { a, b, games, seed, alternate_colors: true, report_every: 1, hyper: Hyperparams::default() }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ColorTally {
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
}

impl ColorTally {
    pub fn games(&self) -> usize { self.wins + self.draws + self.losses }
}

/// Results of one strategy across a match, overall and split by colour.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StrategyTally {
    pub strategy: Strategy,
    pub as_white: ColorTally,
    pub as_black: ColorTally,
}

impl StrategyTally {
    fn new(strategy: Strategy) -> Self {
        Self { strategy, as_white: ColorTally::default(), as_black: ColorTally::default() }
    }

    fn record(&mut self, color: Color, outcome: Outcome) {
        let t = match color {
            Color::White => &mut self.as_white,
            Color::Black => &mut self.as_black,
        };
        match outcome {
            Outcome::Win(c) if c == color => t.wins += 1,
            Outcome::Win(_) => t.losses += 1,
            Outcome::Draw(_) => t.draws += 1,
        }
    }

    pub fn wins(&self) -> usize { self.as_white.wins + self.as_black.wins }
    pub fn draws(&self) -> usize { self.as_white.draws + self.as_black.draws }
    pub fn losses(&self) -> usize { self.as_white.losses + self.as_black.losses }

    /// Win = 1, draw = 0.5.
    pub fn score(&self) -> f32 { self.wins() as f32 + 0.5 * self.draws() as f32 }
}

#[derive(Clone, Debug, Serialize)]
pub struct MatchSummary {
    pub games: usize,
    pub a: StrategyTally,
    pub b: StrategyTally,
    pub white_wins: usize,
    pub black_wins: usize,
    pub draws: usize,
    pub records: Vec<GameRecord>,
}

impl MatchSummary {
    /// All games as PGN, one block per game with Seven Tag Roster style headers.
    pub fn to_pgn(&self) -> String {
        let mut out = String::new();
        for (i, rec) in self.records.iter().enumerate() {
            out.push_str("[Event \"policy_chess match\"]\n");
            out.push_str(&format!("[Round \"{}\"]\n", i + 1));
            out.push_str(&format!("[White \"{}\"]\n", rec.white));
            out.push_str(&format!("[Black \"{}\"]\n", rec.black));
            out.push_str(&format!("[Result \"{}\"]\n", rec.outcome.result_token()));
            out.push_str(&format!("[Termination \"{}\"]\n\n", rec.outcome));
            out.push_str(&rec.movetext);
            out.push_str("\n\n");
        }
        out
    }
}

/// Plays `cfg.games` seeded games between `cfg.a` and `cfg.b` without collecting gradients.
pub fn run_match(cfg: &MatchConfig, models: &[PolicyModel], progress: &mut dyn Progress) -> Result<MatchSummary> {
    // Fail before playing anything if either side names a missing model.
    resolve(&cfg.a, models)?;
    resolve(&cfg.b, models)?;

    let mut seeds = SmallRng::seed_from_u64(cfg.seed);
    let mut summary = MatchSummary {
        games: 0,
        a: StrategyTally::new(cfg.a.clone()),
        b: StrategyTally::new(cfg.b.clone()),
        white_wins: 0,
        black_wins: 0,
        draws: 0,
        records: Vec::with_capacity(cfg.games),
    };
    let every = cfg.report_every.max(1);

    for gi in 0..cfg.games {
        let a_white = !cfg.alternate_colors || gi % 2 == 0;
        let (white, black) = if a_white { (cfg.a.clone(), cfg.b.clone()) } else { (cfg.b.clone(), cfg.a.clone()) };
        let params = SelfPlayParams {
            seed: seeds.gen(),
            mode: PlayMode::Match,
            hyper: cfg.hyper.clone(),
            ..SelfPlayParams::exhibition(0, white, black)
        };
        let record = play_game(&params, models, progress)?;

        let (a_color, b_color) = if a_white { (Color::White, Color::Black) } else { (Color::Black, Color::White) };
        summary.a.record(a_color, record.outcome);
        summary.b.record(b_color, record.outcome);
        match record.outcome {
            Outcome::Win(Color::White) => summary.white_wins += 1,
            Outcome::Win(Color::Black) => summary.black_wins += 1,
            Outcome::Draw(_) => summary.draws += 1,
        }
        summary.games += 1;
        if (gi + 1) % every == 0 || gi + 1 == cfg.games {
            progress.game_finished(gi + 1, cfg.games, &record);
        }
        summary.records.push(record);
    }

    info!(
        "{} vs {} over {} games: {}-{}-{} (score {:.1} : {:.1})",
        cfg.a,
        cfg.b,
        summary.games,
        summary.a.wins(),
        summary.a.draws(),
        summary.a.losses(),
        summary.a.score(),
        summary.b.score()
    );
    Ok(summary)
}
