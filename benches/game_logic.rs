use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rowmatch::core::{
    Board, BoardShape, EngineConfig, Geometry, Level, Resolver, SimpleRng, SpawnQueue,
};
use rowmatch::sim::{autoplay, DEMO_LEVEL};
use rowmatch::types::{GridPos, GroupId, ItemId, Tile, TileId, Token, MAX_SPAWN_ATTEMPTS};

fn demo_level() -> Level {
    match Level::from_json(DEMO_LEVEL) {
        Ok(level) => level,
        Err(err) => panic!("demo level: {}", err),
    }
}

fn bench_spawn_queue(c: &mut Criterion) {
    let level = demo_level();
    let shape = BoardShape::for_level(&level, &EngineConfig::default(), false);
    let mut rng = SimpleRng::new(12345);

    c.bench_function("generate_spawn_queue", |b| {
        b.iter(|| SpawnQueue::generate(black_box(&level), shape, MAX_SPAWN_ATTEMPTS, &mut rng))
    });
}

fn bench_cascade(c: &mut Criterion) {
    // every row completes on arrival; the cascade clears all five
    let tokens: Vec<Token> = (0..20u16)
        .map(|i| Token::new(GroupId(i / 4), ItemId(i)))
        .collect();

    c.bench_function("populate_cascade_5_rows", |b| {
        b.iter(|| {
            let mut resolver = Resolver::with_parts(
                Board::new(4, 5),
                SpawnQueue::from_tokens(tokens.clone()),
                5,
                Geometry::new(4, 5, 1.0, Default::default()),
                SimpleRng::new(1),
            );
            black_box(resolver.populate())
        })
    });
}

fn bench_collapse(c: &mut Criterion) {
    c.bench_function("collapse_checkerboard", |b| {
        b.iter(|| {
            let mut board = Board::new(8, 16);
            for y in 0..16i8 {
                for x in 0..8i8 {
                    if (x + y) % 2 == 0 {
                        board.set(
                            x,
                            y,
                            Some(Tile {
                                id: TileId((y as u32) * 8 + x as u32 + 1),
                                token: Token::new(GroupId(0), ItemId(0)),
                                pos: GridPos::new(x, y),
                            }),
                        );
                    }
                }
            }
            black_box(board.collapse())
        })
    });
}

fn bench_autoplay(c: &mut Criterion) {
    let level = demo_level();

    c.bench_function("autoplay_demo_level", |b| {
        b.iter(|| {
            let mut resolver = Resolver::new(&level, &EngineConfig::default(), false);
            black_box(autoplay(&mut resolver, 100, |_, _| {}))
        })
    });
}

criterion_group!(
    benches,
    bench_spawn_queue,
    bench_cascade,
    bench_collapse,
    bench_autoplay
);
criterion_main!(benches);
