use criterion::{black_box, criterion_group, criterion_main, Criterion};
use policy_chess::perft::{perft, preset};

fn bench_perft(c: &mut Criterion) {
    let start = preset("startpos").unwrap();
    c.bench_function("perft_startpos_d3", |ben| ben.iter(|| black_box(perft(black_box(&start), 3))));
    let kiwi = preset("kiwipete").unwrap();
    c.bench_function("perft_kiwipete_d2", |ben| ben.iter(|| black_box(perft(black_box(&kiwi), 2))));
}

criterion_group!(benches, bench_perft);
criterion_main!(benches);
