use criterion::{black_box, criterion_group, criterion_main, Criterion};
use policy_chess::board::Game;
use policy_chess::config::Hyperparams;
use policy_chess::policy::strategy::HeuristicScorer;
use policy_chess::policy::{select_move, PolicyModel, SelectParams};
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn bench_select(c: &mut Criterion) {
    let mut game = Game::new();
    for san in ["e4", "e5", "Nf3", "Nc6", "Bc4", "Bc5"] {
        game.play_san(san).unwrap();
    }
    let hp = Hyperparams::default();
    let model = PolicyModel::new("bench", "bench");
    let mut rng = SmallRng::seed_from_u64(1);

    let train = SelectParams { collect_gradient: true, ..SelectParams::training(&hp) };
    c.bench_function("select_model_with_gradient", |ben| {
        ben.iter(|| black_box(select_move(black_box(&game), &model, &train, &mut rng).unwrap().index))
    });
    let play = SelectParams::play(&hp);
    c.bench_function("select_heuristic_play", |ben| {
        ben.iter(|| black_box(select_move(black_box(&game), &HeuristicScorer, &play, &mut rng).unwrap().index))
    });
}

criterion_group!(benches, bench_select);
criterion_main!(benches);
