use core::hint::black_box;
use aztecglyph::{
    BASE58, Components, ContentType, Glyph, MonotonicClock, RandSource, ScopedAllocator,
    ThreadRandom, TimeSource,
};
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use std::{
    sync::{Arc, Barrier},
    thread::scope,
    time::Instant,
};

struct FixedMockTime {
    millis: u64,
}

impl TimeSource for FixedMockTime {
    fn current_millis(&self) -> u64 {
        self.millis
    }
}

// Number of glyphs issued per benchmark iteration. Stays within one
// millisecond's counter space so a frozen clock never wraps.
const TOTAL_IDS: usize = 2048;

const SAMPLE: u64 = 0x1234_5678_90AB_CDEF;

fn content_type() -> ContentType {
    ContentType::new(7).unwrap()
}

/// Issues `TOTAL_IDS` glyphs for one scope on a single thread.
fn bench_allocator<T: TimeSource>(
    c: &mut Criterion,
    group_name: &str,
    allocator_factory: impl Fn() -> ScopedAllocator<T>,
) {
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();

            for _ in 0..iters {
                let allocator = allocator_factory();
                for _ in 0..TOTAL_IDS {
                    black_box(allocator.issue(content_type()).unwrap());
                }
            }

            start.elapsed()
        });
    });

    group.finish();
}

/// Issues `TOTAL_IDS` glyphs for one scope, split across threads.
fn bench_allocator_contended<T: TimeSource + Send + Sync>(
    c: &mut Criterion,
    group_name: &str,
    allocator_factory: impl Fn() -> ScopedAllocator<T>,
) {
    let mut group = c.benchmark_group(group_name);

    for thread_count in [1, 2, 4, 8, 16] {
        let ids_per_thread = TOTAL_IDS / thread_count;

        group.throughput(Throughput::Elements(TOTAL_IDS as u64));
        group.bench_function(format!("elems/{TOTAL_IDS}/threads/{thread_count}"), |b| {
            b.iter_custom(|iters| {
                let start = Instant::now();

                for _ in 0..iters {
                    let allocator = Arc::new(allocator_factory());
                    let barrier = Arc::new(Barrier::new(thread_count + 1));
                    scope(|s| {
                        for _ in 0..thread_count {
                            let allocator = Arc::clone(&allocator);
                            let barrier = Arc::clone(&barrier);
                            s.spawn(move || {
                                barrier.wait();
                                for _ in 0..ids_per_thread {
                                    black_box(allocator.issue(content_type()).unwrap());
                                }
                            });
                        }
                        barrier.wait();
                    });
                }

                start.elapsed()
            });
        });
    }

    group.finish();
}

fn benchmark_mock_sequential(c: &mut Criterion) {
    bench_allocator(c, "mock/sequential/scoped", || {
        ScopedAllocator::with_clock(FixedMockTime {
            millis: 1_700_000_000_000,
        })
    });
}

fn benchmark_mock_contended(c: &mut Criterion) {
    bench_allocator_contended(c, "mock/contended/scoped", || {
        ScopedAllocator::with_clock(FixedMockTime {
            millis: 1_700_000_000_000,
        })
    });
}

fn benchmark_mono_sequential(c: &mut Criterion) {
    let clock = MonotonicClock::default();
    bench_allocator(c, "mono/sequential/scoped", || {
        ScopedAllocator::with_clock(clock.clone())
    });
}

fn benchmark_system_sequential(c: &mut Criterion) {
    bench_allocator(c, "system/sequential/scoped", ScopedAllocator::new);
}

fn benchmark_codec(c: &mut Criterion) {
    let glyph = Glyph::from_raw(SAMPLE);
    let text = glyph.to_base58();
    let hex = glyph.to_hex();

    let mut group = c.benchmark_group("codec");
    group.throughput(Throughput::Elements(1));
    group.bench_function("base58/encode_stack", |b| {
        b.iter(|| black_box(black_box(glyph).encode()));
    });
    group.bench_function("base58/encode_string", |b| {
        b.iter(|| black_box(black_box(glyph).to_base58()));
    });
    group.bench_function("base58/decode", |b| {
        b.iter(|| black_box(Glyph::from_base58(black_box(&text)).unwrap()));
    });
    group.bench_function("alphabet/encode_padded", |b| {
        b.iter(|| black_box(BASE58.encode_u64(black_box(SAMPLE), Some(Glyph::STRING_LEN))));
    });
    group.bench_function("hex/encode", |b| {
        b.iter(|| black_box(black_box(glyph).to_hex()));
    });
    group.bench_function("hex/decode", |b| {
        b.iter(|| black_box(Glyph::from_hex(black_box(&hex)).unwrap()));
    });
    group.finish();
}

fn benchmark_components(c: &mut Criterion) {
    let time = FixedMockTime {
        millis: 1_700_000_000_000,
    };
    let rng = ThreadRandom;

    let mut group = c.benchmark_group("components");
    group.throughput(Throughput::Elements(1));
    group.bench_function("explicit", |b| {
        b.iter(|| {
            black_box(
                Glyph::from_components(black_box(3), black_box(7), black_box(time.millis))
                    .unwrap(),
            )
        });
    });
    group.bench_function("random_defaults", |b| {
        b.iter(|| black_box(Components::new().build_with(&time, &rng).unwrap()));
    });
    group.bench_function("thread_random", |b| {
        b.iter(|| black_box(rng.rand()));
    });
    group.finish();
}

criterion_group!(
    benches,
    benchmark_mock_sequential,
    benchmark_mock_contended,
    benchmark_mono_sequential,
    benchmark_system_sequential,
    benchmark_codec,
    benchmark_components,
);
criterion_main!(benches);
