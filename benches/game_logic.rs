use criterion::{black_box, criterion_group, criterion_main, Criterion};
use quadfall::core::{Board, GameSession, PieceBag};
use quadfall::types::{PieceKind, DEFAULT_TIME_STEP_SECS, MIN_LEVEL};

fn bench_update_tick(c: &mut Criterion) {
    let mut session = GameSession::new(Board::default(), DEFAULT_TIME_STEP_SECS, 12345);

    c.bench_function("session_update_5ms", |b| {
        b.iter(|| {
            if session.is_game_over() {
                session.restart(MIN_LEVEL);
            }
            session.update(black_box(false), false, true);
        })
    });
}

fn bench_drop_and_freeze(c: &mut Criterion) {
    c.bench_function("drop_freeze_scan", |b| {
        b.iter(|| {
            let mut board = Board::default();
            board.spawn_piece(black_box(PieceKind::I));
            board.hard_drop();
            board.freeze_piece();
            board.clear_lines();
        })
    });
}

fn bench_spawn_piece(c: &mut Criterion) {
    let mut board = Board::default();
    let mut bag = PieceBag::new(12345);

    c.bench_function("spawn_piece", |b| {
        b.iter(|| {
            board.spawn_piece(black_box(bag.draw()));
        })
    });
}

fn bench_move_horizontal(c: &mut Criterion) {
    let mut board = Board::default();
    board.spawn_piece(PieceKind::T);
    let mut direction = 1;

    c.bench_function("move_horizontal", |b| {
        b.iter(|| {
            if !board.move_horizontal(black_box(direction)) {
                direction = -direction;
            }
        })
    });
}

fn bench_rotate(c: &mut Criterion) {
    let mut board = Board::default();
    board.spawn_piece(PieceKind::T);

    c.bench_function("rotate_with_kicks", |b| {
        b.iter(|| {
            board.rotate(black_box(true));
        })
    });
}

criterion_group!(
    benches,
    bench_update_tick,
    bench_drop_and_freeze,
    bench_spawn_piece,
    bench_move_horizontal,
    bench_rotate
);
criterion_main!(benches);
