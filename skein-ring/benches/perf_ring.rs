use criterion::{Criterion, black_box, criterion_group, criterion_main};
use skein_ring::{Ring, RingArena};

const RING_SIZE: usize = 1024;

fn bench_push_pop(c: &mut Criterion) {
    let mut group = c.benchmark_group("push_pop");

    group.bench_function("insert_back_pop_front", |b| {
        let mut arena: RingArena<u64> = RingArena::with_capacity(RING_SIZE + 1);
        let mut ring = Ring::new(&mut arena);

        b.iter(|| {
            let handle = ring.insert_back(&mut arena, black_box(42));
            let popped = ring.pop_front(&mut arena).unwrap();
            arena.remove(popped);
            black_box(handle)
        });
    });

    group.bench_function("move_to_back", |b| {
        let mut arena: RingArena<u64> = RingArena::with_capacity(RING_SIZE + 1);
        let mut ring = Ring::new(&mut arena);
        for i in 0..RING_SIZE as u64 {
            ring.insert_back(&mut arena, i);
        }

        b.iter(|| {
            let front = ring.front_handle(&arena).unwrap();
            ring.push_back(&mut arena, front);
            black_box(front)
        });
    });

    group.finish();
}

fn bench_splice(c: &mut Criterion) {
    let mut group = c.benchmark_group("splice");

    group.bench_function("whole_ring", |b| {
        let mut arena: RingArena<u64> = RingArena::with_capacity(RING_SIZE + 2);
        let mut left = Ring::new(&mut arena);
        let mut right = Ring::new(&mut arena);
        for i in 0..RING_SIZE as u64 {
            left.insert_back(&mut arena, i);
        }

        // Splice cost must not depend on range length.
        b.iter(|| {
            right.append(&mut arena, &mut left);
            left.append(&mut arena, &mut right);
        });
    });

    group.finish();
}

fn bench_walk(c: &mut Criterion) {
    let mut group = c.benchmark_group("walk");

    group.bench_function("iter_sum", |b| {
        let mut arena: RingArena<u64> = RingArena::with_capacity(RING_SIZE + 1);
        let mut ring = Ring::new(&mut arena);
        for i in 0..RING_SIZE as u64 {
            ring.insert_back(&mut arena, i);
        }

        b.iter(|| {
            let total: u64 = ring.iter(&arena).sum();
            black_box(total)
        });
    });

    group.bench_function("cursor_walk", |b| {
        let mut arena: RingArena<u64> = RingArena::with_capacity(RING_SIZE + 1);
        let mut ring = Ring::new(&mut arena);
        for i in 0..RING_SIZE as u64 {
            ring.insert_back(&mut arena, i);
        }

        b.iter(|| {
            let mut total = 0u64;
            let mut cursor = ring.cursor_front(&arena);
            while let Some(value) = cursor.get(&arena) {
                total += *value;
                cursor.move_next(&arena);
            }
            black_box(total)
        });
    });

    group.finish();
}

criterion_group!(benches, bench_push_pop, bench_splice, bench_walk);
criterion_main!(benches);
