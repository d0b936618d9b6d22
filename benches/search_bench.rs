use criterion::{black_box, criterion_group, criterion_main, Criterion};

use badchess_rust::constants::MAX_DEPTH;
use badchess_rust::eval::evaluate;
use badchess_rust::ordering::order_moves;
use badchess_rust::position::{legal_moves, parse_fen, start_position};
use badchess_rust::search::find_best_move;

const MORPHY_DEFENCE: &str = "r1bqkbnr/1ppp1ppp/p1n5/1B2p3/4P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 0 4";

fn bench_evaluate_startpos(c: &mut Criterion) {
    let pos = start_position();
    c.bench_function("evaluate_startpos", |b| {
        b.iter(|| black_box(evaluate(black_box(&pos))));
    });
}

fn bench_order_moves_middlegame(c: &mut Criterion) {
    let pos = parse_fen(MORPHY_DEFENCE).unwrap();
    let moves = legal_moves(&pos);
    c.bench_function("order_moves_middlegame", |b| {
        b.iter(|| black_box(order_moves(black_box(&pos), black_box(&moves))));
    });
}

fn bench_search_depth3(c: &mut Criterion) {
    let positions = [
        ("startpos_depth3", start_position()),
        ("middlegame_depth3", parse_fen(MORPHY_DEFENCE).unwrap()),
    ];
    let mut group = c.benchmark_group("search");
    group.sample_size(10);
    for (name, pos) in &positions {
        group.bench_function(*name, |b| {
            b.iter(|| black_box(find_best_move(black_box(pos), 3, MAX_DEPTH).unwrap()));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_evaluate_startpos,
    bench_order_moves_middlegame,
    bench_search_depth3
);
criterion_main!(benches);
