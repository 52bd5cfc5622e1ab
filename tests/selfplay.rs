use policy_chess::board::{Color, DrawReason, Outcome};
use policy_chess::config::{Hyperparams, WEIGHT_CLIP};
use policy_chess::match_play::{run_match, MatchConfig};
use policy_chess::policy::{softmax, PolicyModel, Strategy, FEATURE_LEN};
use policy_chess::selfplay::train::{apply_trajectory, train_batch, TrainConfig};
use policy_chess::selfplay::{play_game, GameRecord, NoProgress, SelfPlayParams, TrajectoryStep};
use pretty_assertions::assert_eq;

fn one_step(reward: f32, shared_bias: f32, player: Color, move_penalty: f32, gradient: Vec<f32>) -> GameRecord {
    GameRecord {
        seed: 0,
        white: Strategy::Random,
        black: Strategy::Random,
        moves: Vec::new(),
        uci: Vec::new(),
        outcome: Outcome::Draw(DrawReason::PlyCap),
        reward,
        shared_bias,
        stagnant_plies: 0,
        movetext: String::new(),
        steps: vec![TrajectoryStep { player, policy_gradient: gradient, move_penalty }],
    }
}

#[test]
fn selfplay_is_deterministic_by_seed() {
    let models = vec![PolicyModel::new("m", "m")];
    let params = SelfPlayParams::training(42, Strategy::Trained("m".into()), Strategy::Heuristic, "m");
    let g1 = play_game(&params, &models, &mut NoProgress).unwrap();
    let g2 = play_game(&params, &models, &mut NoProgress).unwrap();
    assert_eq!(g1.moves, g2.moves);
    assert_eq!(g1.uci, g2.uci);
    assert_eq!(g1.reward, g2.reward);
    assert_eq!(g1.shared_bias, g2.shared_bias);
    assert!(!g1.steps.is_empty());
    assert!(g1.steps.iter().all(|s| s.policy_gradient.len() == FEATURE_LEN && s.move_penalty <= 0.0));
}

#[test]
fn single_step_update_is_exact() {
    let hp = Hyperparams::default();
    let mut g = vec![0.0; FEATURE_LEN];
    g[0] = 1.0;
    g[1] = -2.0;
    g[2] = 0.5;
    g[3] = 400.0;
    let mut model = PolicyModel::new("m", "m");
    // advantage = 1 - 0.2 - 0.05
    let rec = one_step(1.0, -0.2, Color::White, -0.05, g.clone());
    assert_eq!(apply_trajectory(&mut model, &rec, &hp), 1);
    let adv = 1.0f32 - 0.2 - 0.05;
    for i in 0..3 {
        let expected = hp.learning_rate * adv * g[i];
        assert!((model.weights[i] - expected).abs() < 1e-6, "w[{i}] = {}, expected {expected}", model.weights[i]);
    }
    assert_eq!(model.weights[3], WEIGHT_CLIP);
    assert!(model.weights[4..].iter().all(|&w| w == 0.0));
}

#[test]
fn loop_draws_carry_the_extra_penalty() {
    let models = vec![PolicyModel::new("m", "m")];
    let hp = Hyperparams::default();
    for seed in 0..6 {
        let params = SelfPlayParams::training(seed, Strategy::Random, Strategy::Random, "m");
        let rec = play_game(&params, &models, &mut NoProgress).unwrap();
        let mut expected = -hp.ply_penalty * rec.plies() as f32;
        if rec.outcome.is_loop_draw() {
            expected -= hp.loop_draw_penalty;
        }
        assert!((rec.shared_bias - expected).abs() < 1e-6);
        assert_eq!(rec.reward, rec.outcome.reward());
        assert!(rec.plies() <= hp.max_plies);
    }
}

#[test]
fn softmax_properties() {
    for scores in [vec![0.0, 0.0], vec![3.0, -1.0, 2.5, 10.0], vec![-1.0e9, -1.0e9, -1.0e9], vec![1.0e30, 0.0]] {
        let p = softmax(&scores, 0.35);
        assert!(p.iter().all(|x| x.is_finite() && *x >= 0.0));
        assert!((p.iter().sum::<f32>() - 1.0).abs() < 1e-5);
    }
}

#[test]
fn training_against_heuristic_moves_weights() {
    let mut models = vec![PolicyModel::new("m", "m")];
    let mut cfg = TrainConfig::self_play("m", 3, 5);
    cfg.black = Strategy::Heuristic;
    cfg.alternate_colors = true;
    cfg.hyper.max_plies = 60;
    let summary = train_batch(&mut models, &cfg, &mut NoProgress).unwrap();
    assert_eq!(summary.games, 3);
    assert_eq!(models[0].games_trained, 3);
    assert!(models[0].weights.iter().any(|&w| w != 0.0));
    assert!(models[0].weights.iter().all(|w| w.abs() <= WEIGHT_CLIP));
}

#[test]
fn match_tallies_by_strategy_and_color() {
    let models = vec![PolicyModel::new("m", "m")];
    let mut cfg = MatchConfig::new(Strategy::Trained("m".into()), Strategy::Random, 6, 3);
    cfg.hyper.max_plies = 50;
    let s = run_match(&cfg, &models, &mut NoProgress).unwrap();
    assert_eq!(s.records.len(), 6);
    assert_eq!(s.a.as_white.games() + s.a.as_black.games(), 6);
    assert_eq!(s.a.wins() + s.a.draws() + s.a.losses(), 6);
    assert_eq!(s.b.wins(), s.a.losses());
    assert_eq!(s.a.as_white.wins + s.b.as_white.wins, s.white_wins);
    assert!(s.records.iter().all(|r| r.steps.is_empty()));
}
