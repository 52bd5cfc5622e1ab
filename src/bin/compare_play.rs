use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use policy_chess::board::Game;
use policy_chess::match_play::MatchConfig;
use policy_chess::policy::Strategy;
use policy_chess::selfplay::{GameRecord, Progress};
use policy_chess::session::Session;
use policy_chess::store::open_store;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "compare_play", about = "Play a match between two strategies (random, heuristic or a model id)")]
struct Args {
    #[arg(long)]
    a: String,
    #[arg(long, default_value = "heuristic")]
    b: String,
    #[arg(long, default_value_t = 20)]
    games: usize,
    #[arg(long, default_value_t = 1)]
    seed: u64,
    #[arg(long, default_value = "models")]
    store: PathBuf,
    /// Keep colours fixed (a always White)
    #[arg(long, default_value_t = false)]
    fixed_colors: bool,
    /// Print the board after every ply (single-game display)
    #[arg(long, default_value_t = false)]
    show: bool,
    /// Write the summary as JSON
    #[arg(long)]
    json_out: Option<PathBuf>,
    /// Write all games as PGN
    #[arg(long)]
    pgn_out: Option<PathBuf>,
}

struct Reporter {
    bar: ProgressBar,
    show: bool,
}

impl Progress for Reporter {
    fn ply(&mut self, game: &Game) {
        if self.show {
            let last = game.history().last().map(String::as_str).unwrap_or("");
            self.bar.println(format!("\n{} {}\n{}", game.plies(), last, game.position()));
        }
    }

    fn game_finished(&mut self, done: usize, _total: usize, record: &GameRecord) {
        self.bar.set_position(done as u64);
        self.bar.set_message(format!("{} vs {}: {}", record.white, record.black, record.outcome));
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let a: Strategy = args.a.parse()?;
    let b: Strategy = args.b.parse()?;

    let mut session = Session::new(open_store(Some(&args.store)), args.seed);
    let mut cfg = MatchConfig::new(a, b, args.games, args.seed);
    cfg.alternate_colors = !args.fixed_colors;

    let bar = ProgressBar::new(args.games as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.green/blue}] {pos}/{len} {msg}")?
            .progress_chars("##-"),
    );
    let mut reporter = Reporter { bar, show: args.show };
    let summary = session.run_match(&cfg, &mut reporter)?;
    reporter.bar.finish_and_clear();

    for t in [&summary.a, &summary.b] {
        println!(
            "{:<12} +{} ={} -{}  score {:.1}/{}  (white +{} ={} -{}, black +{} ={} -{})",
            t.strategy.to_string(),
            t.wins(),
            t.draws(),
            t.losses(),
            t.score(),
            summary.games,
            t.as_white.wins,
            t.as_white.draws,
            t.as_white.losses,
            t.as_black.wins,
            t.as_black.draws,
            t.as_black.losses
        );
    }
    println!("white wins {} / draws {} / black wins {}", summary.white_wins, summary.draws, summary.black_wins);

    if let Some(path) = &args.json_out {
        std::fs::write(path, serde_json::to_string_pretty(&summary)?).with_context(|| format!("writing {}", path.display()))?;
    }
    if let Some(path) = &args.pgn_out {
        std::fs::write(path, summary.to_pgn()).with_context(|| format!("writing {}", path.display()))?;
    }
    Ok(())
}
