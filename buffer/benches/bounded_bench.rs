//! Benchmarks for the bounded buffer.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use conveyor_buffer::BoundedBuffer;
use std::thread;

fn bench_put_take_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("put_take_cycle");

    for capacity in [1usize, 16, 256] {
        let buf = BoundedBuffer::new(capacity).unwrap();

        group.bench_with_input(
            BenchmarkId::from_parameter(capacity),
            &capacity,
            |b, _| {
                b.iter(|| {
                    buf.put(black_box(1u64));
                    black_box(buf.take())
                });
            },
        );
    }

    group.finish();
}

fn bench_try_put_take_cycle(c: &mut Criterion) {
    let buf = BoundedBuffer::new(16).unwrap();

    c.bench_function("try_put_take_cycle", |b| {
        b.iter(|| {
            buf.try_put(black_box(1u64)).unwrap();
            black_box(buf.try_take())
        });
    });
}

fn bench_spsc_handoff(c: &mut Criterion) {
    const ITEMS: u64 = 10_000;
    let mut group = c.benchmark_group("spsc_handoff");
    group.sample_size(10);

    for capacity in [1usize, 16, 256] {
        group.bench_with_input(
            BenchmarkId::from_parameter(capacity),
            &capacity,
            |b, &capacity| {
                b.iter(|| {
                    let buf = BoundedBuffer::new(capacity).unwrap();
                    let producer_buf = buf.clone();

                    let producer = thread::spawn(move || {
                        for i in 0..ITEMS {
                            producer_buf.put(i);
                        }
                    });

                    let mut sum = 0u64;
                    for _ in 0..ITEMS {
                        sum = sum.wrapping_add(buf.take());
                    }
                    producer.join().unwrap();
                    black_box(sum)
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_put_take_cycle,
    bench_try_put_take_cycle,
    bench_spsc_handoff
);
criterion_main!(benches);
