//! Throughput benchmarks for the ticket pool strategies.
//!
//! Benchmarks cover:
//! - Single-threaded add/take round trips
//! - Reads (size + peek) on a populated pool
//! - Producers and consumers contending on one pool
//! - Cost of a strategy switch on the manager

#![allow(missing_docs)]

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use ticket_pool::core::{BoundedPool, PoolManager, SyncMechanism, Ticket};

const POLL: Duration = Duration::from_millis(1);

fn manager(capacity: usize, mechanism: SyncMechanism) -> Arc<PoolManager> {
    Arc::new(PoolManager::with_settings(capacity, mechanism, POLL).expect("valid capacity"))
}

// ============================================================================
// Single-threaded
// ============================================================================

fn bench_add_take(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_take");

    for size in [16_u64, 256, 1024] {
        group.throughput(Throughput::Elements(size));
        for mechanism in SyncMechanism::ALL {
            let pool = manager(usize::try_from(size).expect("fits"), mechanism);
            let tickets: Vec<Ticket> = (0..size).map(|n| Ticket::new(format!("T{n}"))).collect();

            group.bench_with_input(
                BenchmarkId::new(mechanism.as_str(), size),
                &tickets,
                |b, tickets| {
                    b.iter(|| {
                        for ticket in tickets {
                            black_box(pool.add(ticket.clone()));
                        }
                        for _ in 0..tickets.len() {
                            black_box(pool.take().expect("ticket available"));
                        }
                    });
                },
            );
        }
    }
    group.finish();
}

fn bench_reads(c: &mut Criterion) {
    let mut group = c.benchmark_group("size_peek");

    for mechanism in SyncMechanism::ALL {
        let pool = manager(128, mechanism);
        for n in 0..128 {
            pool.add(Ticket::new(format!("T{n}")));
        }

        group.bench_function(mechanism.as_str(), |b| {
            b.iter(|| {
                black_box(pool.size());
                black_box(pool.peek(black_box(64)));
            });
        });
    }
    group.finish();
}

// ============================================================================
// Contention
// ============================================================================

fn bench_contended(c: &mut Criterion) {
    let mut group = c.benchmark_group("contended_4x4");
    group.sample_size(20);
    const PER_THREAD: usize = 500;
    group.throughput(Throughput::Elements((PER_THREAD * 4) as u64));

    for mechanism in SyncMechanism::ALL {
        group.bench_function(mechanism.as_str(), |b| {
            b.iter(|| {
                let pool = manager(64, mechanism);
                let mut handles = Vec::with_capacity(8);

                for p in 0..4 {
                    let pool = Arc::clone(&pool);
                    handles.push(thread::spawn(move || {
                        for n in 0..PER_THREAD {
                            let ticket = Ticket::new(format!("P{p}-{n}"));
                            while !pool.add(ticket.clone()) {
                                thread::yield_now();
                            }
                        }
                    }));
                }
                for _ in 0..4 {
                    let pool = Arc::clone(&pool);
                    handles.push(thread::spawn(move || {
                        for _ in 0..PER_THREAD {
                            black_box(pool.take().expect("ticket available"));
                        }
                    }));
                }

                for handle in handles {
                    handle.join().expect("bench thread panicked");
                }
            });
        });
    }
    group.finish();
}

fn bench_switch(c: &mut Criterion) {
    let pool = manager(64, SyncMechanism::Mutex);
    let mut next = SyncMechanism::ALL.iter().cycle();

    c.bench_function("switch_mechanism", |b| {
        b.iter(|| {
            if let Some(mechanism) = next.next() {
                pool.switch_mechanism(*mechanism);
            }
        });
    });
}

criterion_group!(benches, bench_add_take, bench_reads, bench_contended, bench_switch);
criterion_main!(benches);
