use core::hint::black_box;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use snowgen::{LockSnowflakeGenerator, SystemClock, TimeSource};
use std::{thread::scope, time::Instant};

struct FixedMockTime {
    millis: u64,
}

impl TimeSource for FixedMockTime {
    fn current_millis(&self) -> u64 {
        self.millis
    }
}

// Number of IDs generated per benchmark iteration (per-thread for
// multi-threaded).
const TOTAL_IDS: usize = 4096;

/// Hot path: the clock never moves and the sequence never runs out.
fn bench_fixed_time(c: &mut Criterion) {
    let mut group = c.benchmark_group("lock/fixed");
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();
            for _ in 0..iters {
                let generator = LockSnowflakeGenerator::new(0, FixedMockTime { millis: 1 }).unwrap();
                // 4095 follow-ups stay within the sequence space.
                for _ in 0..TOTAL_IDS {
                    black_box(generator.next_id().unwrap());
                }
            }
            start.elapsed()
        });
    });

    group.finish();
}

/// Real wall clock, including waits on sequence exhaustion.
fn bench_system_clock(c: &mut Criterion) {
    let mut group = c.benchmark_group("lock/system");
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    let generator = LockSnowflakeGenerator::new(0, SystemClock::default()).unwrap();
    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        b.iter(|| {
            for _ in 0..TOTAL_IDS {
                black_box(generator.next_id().unwrap());
            }
        });
    });

    group.finish();
}

/// Contended: every core hammers one generator.
fn bench_system_clock_threaded(c: &mut Criterion) {
    let threads = num_cpus::get();
    let mut group = c.benchmark_group(format!("lock/system/threads/{threads}"));
    group.throughput(Throughput::Elements((TOTAL_IDS * threads) as u64));

    let generator = LockSnowflakeGenerator::new(0, SystemClock::default()).unwrap();
    group.bench_function(format!("elems/{}", TOTAL_IDS * threads), |b| {
        b.iter(|| {
            scope(|s| {
                for _ in 0..threads {
                    s.spawn(|| {
                        for _ in 0..TOTAL_IDS {
                            black_box(generator.next_id().unwrap());
                        }
                    });
                }
            });
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_fixed_time,
    bench_system_clock,
    bench_system_clock_threaded
);
criterion_main!(benches);
