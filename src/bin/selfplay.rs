use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use policy_chess::config::Hyperparams;
use policy_chess::policy::Strategy;
use policy_chess::selfplay::train::TrainConfig;
use policy_chess::selfplay::{GameRecord, Progress};
use policy_chess::session::Session;
use policy_chess::store::open_store;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "policy-chess-selfplay", about = "Train a policy model by self-play and save it")]
struct Args {
    /// Model id to train; created if missing
    #[arg(long, default_value = "default")]
    model: String,
    #[arg(long, default_value_t = 100)]
    games: usize,
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Opponent strategy: random, heuristic or a model id (defaults to the model itself)
    #[arg(long)]
    opponent: Option<String>,
    /// Keep colours fixed (the trained model always White) instead of swapping every game
    #[arg(long, default_value_t = false)]
    fixed_colors: bool,
    /// Only learn from plies the trained model played itself
    #[arg(long, default_value_t = false)]
    own_moves_only: bool,
    #[arg(long, default_value = "models")]
    store: PathBuf,
    /// Hyperparameter overrides as JSON (see --dump-config)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Print the effective hyperparameters as JSON and exit
    #[arg(long, default_value_t = false)]
    dump_config: bool,
    #[arg(long, default_value_t = 10)]
    report_every: usize,
}

struct Bar(ProgressBar);

impl Progress for Bar {
    fn game_finished(&mut self, done: usize, _total: usize, record: &GameRecord) {
        self.0.set_position(done as u64);
        self.0.set_message(format!("last: {} in {} plies", record.outcome, record.plies()));
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let a = Args::parse();

    let hyper: Hyperparams = match &a.config {
        Some(p) => {
            let text = std::fs::read_to_string(p).with_context(|| format!("reading {}", p.display()))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {}", p.display()))?
        }
        None => Hyperparams::default(),
    };
    if a.dump_config {
        println!("{}", serde_json::to_string_pretty(&hyper)?);
        return Ok(());
    }

    let mut session = Session::new(open_store(Some(&a.store)), a.seed);
    if !session.models().iter().any(|m| m.id == a.model) {
        session.create_model(&a.model, &a.model)?;
    }
    let me = Strategy::Trained(a.model.clone());
    let opponent: Strategy = match &a.opponent {
        Some(s) => s.parse()?,
        None => me.clone(),
    };

    let mut cfg = TrainConfig::self_play(a.model.clone(), a.games, a.seed);
    cfg.black = opponent;
    cfg.alternate_colors = !a.fixed_colors;
    cfg.report_every = a.report_every;
    cfg.learn_from_opponent = !a.own_moves_only;
    cfg.hyper = hyper;

    eprintln!(
        "Training {} for {} games against {} (seed={}, store={})",
        a.model,
        a.games,
        cfg.black,
        a.seed,
        if session.is_persistent() { a.store.display().to_string() } else { "memory".into() }
    );
    let pb = ProgressBar::new(a.games as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} games {msg}")?
            .progress_chars("##-"),
    );
    let mut bar = Bar(pb);
    let summary = session.train(&cfg, &mut bar)?;
    bar.0.finish_with_message("done");

    println!(
        "games={} white={} draws={} black={} loop_draws={} avg_plies={:.1} updates={}",
        summary.games,
        summary.white_wins,
        summary.draws,
        summary.black_wins,
        summary.loop_draws,
        summary.avg_plies(),
        summary.updates
    );
    if let Some(m) = session.models().iter().find(|m| m.id == a.model) {
        println!("{} has now trained on {} games", m.id, m.games_trained);
    }
    Ok(())
}
