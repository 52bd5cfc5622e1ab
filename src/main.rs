use anyhow::{bail, Result};
use clap::Parser;
use policy_chess::board::Color;
use policy_chess::policy::Strategy;
use policy_chess::selfplay::NoProgress;
use policy_chess::session::Session;
use policy_chess::store::open_store;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about = "Play chess in SAN against a random, heuristic or trained strategy", long_about = None)]
struct Args {
    /// Opponent: random, heuristic or a model id (defaults to the active model)
    #[arg(long)]
    opponent: Option<String>,

    /// Your color: 'w' for white, 'b' for black
    #[arg(long, default_value = "w")]
    color: String,

    /// Model store directory
    #[arg(long, default_value = "models")]
    store: PathBuf,

    #[arg(long, default_value_t = 7)]
    seed: u64,

    /// Delay between plies while autoplaying, in milliseconds
    #[arg(long, default_value_t = 16)]
    autoplay_delay_ms: u64,
}

const HELP: &str = "\
  <san>                 play a move, e.g. e4, Nf3, O-O, exd8=Q
  random                play a uniformly random move
  autoplay              finish the game with random moves
  new                   start a new game
  models                list models
  use <id>              make <id> the active model
  create <id> [name]    create a zero-weight model
  delete <id>           delete a model
  train <games>         self-play train the active model
  opponent <strategy>   random, heuristic or a model id
  moves                 show the move list
  quit";

fn parse_color(color_str: &str) -> Result<Color> {
    match color_str.to_lowercase().as_str() {
        "w" | "white" => Ok(Color::White),
        "b" | "black" => Ok(Color::Black),
        _ => bail!("Invalid color: use 'w' or 'b'"),
    }
}

fn print_state(session: &Session) {
    let game = session.game();
    println!("\n{}", game.position());
    match game.result() {
        Some(outcome) => println!("{}: {}", game.status().label(), outcome),
        None => println!("{}", game.status().label()),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let human = parse_color(&args.color)?;
    let mut session = Session::new(open_store(Some(&args.store)), args.seed);
    let mut opponent: Strategy = match &args.opponent {
        Some(s) => s.parse()?,
        None => Strategy::Trained(session.active_model().map(|m| m.id.clone()).unwrap_or_default()),
    };
    println!("Playing {} against {}. Type 'help' for commands.", human, opponent);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        let game = session.game();
        if !game.is_over() && game.position().side_to_move() != human {
            match session.play_strategy(&opponent) {
                Ok(san) => println!("{} plays {}", opponent, san),
                Err(e) => {
                    println!("Opponent could not move: {e}");
                    opponent = Strategy::Random;
                    continue;
                }
            }
        }
        print_state(&session);

        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else { break };
        let line = line?;
        let mut words = line.split_whitespace();
        let Some(cmd) = words.next() else { continue };
        let arg = words.next();

        let outcome = match (cmd, arg) {
            ("quit" | "exit", _) => break,
            ("help", _) => {
                println!("{HELP}");
                Ok(())
            }
            ("new", _) => session.new_game(),
            ("random", _) => session.play_random().map(|san| println!("Random move: {san}")),
            ("autoplay", _) => {
                let delay = Duration::from_millis(args.autoplay_delay_ms);
                session
                    .autoplay(&mut |g| {
                        println!("{}. {}", g.plies(), g.history().last().map(String::as_str).unwrap_or(""));
                        thread::sleep(delay);
                    })
                    .map(|(outcome, took)| println!("{outcome}. Autoplay finished in {:.1}s.", took.as_secs_f64()))
            }
            ("models", _) => {
                let active = session.active_model().map(|m| m.id.clone());
                for m in session.models() {
                    let mark = if Some(&m.id) == active.as_ref() { "*" } else { " " };
                    println!("{mark} {:<16} {:<24} {} games", m.id, m.display_name, m.games_trained);
                }
                Ok(())
            }
            ("use", Some(id)) => session.select_model(id),
            ("create", Some(id)) => {
                let name = words.collect::<Vec<_>>().join(" ");
                session.create_model(id, &name).map(|m| println!("Created {}", m.id))
            }
            ("delete", Some(id)) => session.delete_model(id),
            ("train", n) => {
                let games = n.and_then(|s| s.parse().ok()).unwrap_or(10);
                match session.active_model().map(|m| m.id.clone()) {
                    Some(id) => {
                        let cfg = session.train_config(id, games, args.seed);
                        session.train(&cfg, &mut NoProgress).map(|s| {
                            println!("Trained {} games, avg {:.1} plies, {} loop draws", s.games, s.avg_plies(), s.loop_draws)
                        })
                    }
                    None => Ok(()),
                }
            }
            ("opponent", Some(s)) => s.parse::<Strategy>().map(|s| opponent = s),
            ("moves", _) => {
                println!("{}", session.game().pgn_movetext());
                Ok(())
            }
            _ => session.play_san(&line).map(|san| println!("Played {san}")),
        };
        if let Err(e) = outcome {
            println!("{e}");
        }
    }
    Ok(())
}
