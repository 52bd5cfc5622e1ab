use anyhow::Result;
use clap::Parser;
use policy_chess::perft::{divide, perft, preset};
use std::time::Instant;

#[derive(clap::Parser, Debug)]
#[command(name = "perft", about = "Perft driver for the policy_chess move generator")]
struct Args {
    /// Search depth
    #[arg(value_name = "DEPTH")]
    depth: u32,
    /// Named position: startpos, kiwipete or endgame
    #[arg(value_name = "POSITION", default_value = "startpos")]
    position: String,
    /// Report elapsed time and NPS
    #[arg(long, default_value_t = false)]
    nps: bool,
    /// Print per-move counts
    #[arg(long, default_value_t = false)]
    divide: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let pos = preset(&args.position)?;

    if args.divide {
        for (mv, n) in divide(&pos, args.depth) {
            println!("{mv}: {n}");
        }
    }
    let t0 = Instant::now();
    let nodes = perft(&pos, args.depth);
    let dt = t0.elapsed().as_secs_f64();
    if args.nps {
        println!("nodes: {nodes} elapsed: {:.3}s nps: {:.1}", dt, nodes as f64 / dt.max(f64::EPSILON));
    } else {
        println!("nodes: {nodes}");
    }
    Ok(())
}
