use core::hint::black_box;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use mintid::{AtomicCounterStore, Minter, MonotonicClock, TimeSource};
use std::{sync::Barrier, thread::scope, time::Instant};

struct FixedMockTime {
    millis: u64,
}

impl TimeSource for FixedMockTime {
    fn current_millis(&self) -> u64 {
        self.millis
    }
}

// Number of IDs minted per benchmark iteration (per-thread for
// multi-threaded).
const TOTAL_IDS: usize = 4096;

fn bench_minter<T, F>(c: &mut Criterion, group_name: &str, minter_factory: F)
where
    T: TimeSource,
    F: Fn() -> Minter<AtomicCounterStore, T>,
{
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();

            for _ in 0..iters {
                let minter = minter_factory();
                for _ in 0..TOTAL_IDS {
                    black_box(minter.try_allocate("bench").unwrap());
                }
            }

            start.elapsed()
        })
    });

    group.finish();
}

fn bench_minter_threaded<T, F>(c: &mut Criterion, group_name: &str, threads: usize, minter_factory: F)
where
    T: TimeSource + Sync,
    F: Fn() -> Minter<AtomicCounterStore, T>,
{
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements((TOTAL_IDS * threads) as u64));

    group.bench_function(format!("threads/{threads}/elems/{TOTAL_IDS}"), |b| {
        b.iter_custom(|iters| {
            let minter = minter_factory();

            let mut total = std::time::Duration::ZERO;
            for _ in 0..iters {
                let barrier = Barrier::new(threads);
                let start = Instant::now();
                scope(|s| {
                    for _ in 0..threads {
                        s.spawn(|| {
                            barrier.wait();
                            for _ in 0..TOTAL_IDS {
                                black_box(minter.try_allocate("bench").unwrap());
                            }
                        });
                    }
                });
                total += start.elapsed();
            }

            total
        })
    });

    group.finish();
}

fn benches(c: &mut Criterion) {
    bench_minter(c, "minter/mock_time", || {
        let minter = Minter::new(AtomicCounterStore::new(), FixedMockTime { millis: 42 });
        minter.register_namespace("bench").unwrap();
        minter
    });

    bench_minter(c, "minter/monotonic_clock", || {
        let minter = Minter::new(AtomicCounterStore::new(), MonotonicClock::default());
        minter.register_namespace("bench").unwrap();
        minter
    });

    let threads = num_cpus::get().max(2);
    bench_minter_threaded(c, "minter/mock_time_threaded", threads, || {
        let minter = Minter::new(AtomicCounterStore::new(), FixedMockTime { millis: 42 });
        minter.register_namespace("bench").unwrap();
        minter
    });
}

criterion_group!(bench, benches);
criterion_main!(bench);
