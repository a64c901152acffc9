use crate::{ContentType, Error, Field, Glyph, Issuer, MonotonicClock, ScopedAllocator, TimeSource};
use std::collections::HashSet;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};
use std::thread::scope;

const NOW: u64 = 1_700_000_000_000;

struct MockTime {
    millis: u64,
}

impl TimeSource for MockTime {
    fn current_millis(&self) -> u64 {
        self.millis
    }
}

/// Replays `values`, advancing only when told to.
#[derive(Clone)]
struct SharedMockStepTime {
    clock: Arc<MockStepTime>,
}

struct MockStepTime {
    values: Vec<u64>,
    index: AtomicUsize,
}

impl SharedMockStepTime {
    fn new(values: Vec<u64>) -> Self {
        Self {
            clock: Arc::new(MockStepTime {
                values,
                index: AtomicUsize::new(0),
            }),
        }
    }

    fn step(&self) {
        self.clock.index.fetch_add(1, Ordering::Relaxed);
    }
}

impl TimeSource for SharedMockStepTime {
    fn current_millis(&self) -> u64 {
        self.clock.values[self.clock.index.load(Ordering::Relaxed)]
    }
}

fn ct(tag: u16) -> ContentType {
    ContentType::new(tag).unwrap()
}

#[test]
fn counter_increments_within_same_millisecond() {
    let allocator = ScopedAllocator::with_clock(MockTime { millis: NOW });

    let id1 = allocator.issue(ct(7)).unwrap();
    let id2 = allocator.issue(ct(7)).unwrap();
    let id3 = allocator.issue(ct(7)).unwrap();

    for id in [id1, id2, id3] {
        assert_eq!(id.timestamp_millis(), NOW);
        assert_eq!(id.content_type(), 7);
    }
    assert_eq!(id1.counter(), 0);
    assert_eq!(id2.counter(), 1);
    assert_eq!(id3.counter(), 2);
    assert!(id1 < id2 && id2 < id3);
}

#[test]
fn counter_resets_on_new_millisecond() {
    let time = SharedMockStepTime::new(vec![NOW, NOW + 1]);
    let allocator = ScopedAllocator::with_clock(time.clone());

    allocator.issue(ct(1)).unwrap();
    let second = allocator.issue(ct(1)).unwrap();
    assert_eq!(second.counter(), 1);

    time.step();
    let third = allocator.issue(ct(1)).unwrap();
    assert_eq!(third.timestamp_millis(), NOW + 1);
    assert_eq!(third.counter(), 0);
    assert!(second < third);
}

#[test]
fn backward_clock_increments_counter() {
    let time = SharedMockStepTime::new(vec![NOW, NOW - 5]);
    let allocator = ScopedAllocator::with_clock(time.clone());

    let first = allocator.issue(ct(3)).unwrap();
    time.step();
    let second = allocator.issue(ct(3)).unwrap();

    assert_eq!(first.counter(), 0);
    assert_eq!(second.counter(), 1);
    assert_eq!(second.timestamp_millis(), NOW - 5);

    let state = allocator.snapshot(ct(3)).unwrap().unwrap();
    assert_eq!(state.last_timestamp_millis, NOW);
    assert_eq!(state.counter, 1);
}

#[test]
fn counter_wraps_after_exhaustion() {
    let allocator = ScopedAllocator::with_clock(MockTime { millis: NOW });

    for expected in 0..=Glyph::MAX_COUNTER {
        assert_eq!(allocator.issue(ct(9)).unwrap().counter(), expected);
    }
    assert_eq!(allocator.issue(ct(9)).unwrap().counter(), 0);
}

#[test]
fn scopes_are_independent() {
    let allocator = ScopedAllocator::with_clock(MockTime { millis: NOW });

    allocator.issue(ct(1)).unwrap();
    allocator.issue(ct(1)).unwrap();
    let other = allocator.issue(ct(2)).unwrap();
    let third = allocator.issue(ct(1)).unwrap();

    assert_eq!(other.counter(), 0);
    assert_eq!(other.content_type(), 2);
    assert_eq!(third.counter(), 2);
    assert_eq!(allocator.scopes().unwrap(), 2);
}

#[test]
fn new_millisecond_in_one_scope_leaves_others_alone() {
    let time = SharedMockStepTime::new(vec![NOW, NOW + 1]);
    let allocator = ScopedAllocator::with_clock(time.clone());

    allocator.issue(ct(1)).unwrap();
    allocator.issue(ct(2)).unwrap();
    time.step();
    allocator.issue(ct(1)).unwrap();

    let untouched = allocator.snapshot(ct(2)).unwrap().unwrap();
    assert_eq!(untouched.last_timestamp_millis, NOW);
    assert_eq!(untouched.counter, 0);
}

#[test]
fn fresh_scope_has_no_snapshot() {
    let allocator = ScopedAllocator::with_clock(MockTime { millis: NOW });
    assert_eq!(allocator.snapshot(ct(5)).unwrap(), None);
    assert_eq!(allocator.scopes().unwrap(), 0);
}

#[test]
fn clock_outside_window_is_reported() {
    let allocator = ScopedAllocator::with_clock(MockTime {
        millis: Glyph::EPOCH_MILLIS - 1,
    });
    assert!(matches!(
        allocator.issue(ct(1)),
        Err(Error::OutOfRange {
            field: Field::Timestamp,
            ..
        })
    ));
}

#[test]
fn failed_issue_leaves_scope_untouched() {
    let clock = SharedMockStepTime::new(vec![NOW, Glyph::MAX_NOW_MILLIS + 1, NOW]);
    let allocator = ScopedAllocator::with_clock(clock.clone());

    allocator.issue(ct(1)).unwrap();
    let before = allocator.snapshot(ct(1)).unwrap();

    clock.step();
    assert!(allocator.issue(ct(1)).is_err());
    assert!(allocator.issue(ct(2)).is_err());
    assert_eq!(allocator.snapshot(ct(1)).unwrap(), before);
    assert_eq!(allocator.snapshot(ct(2)).unwrap(), None);
    assert_eq!(allocator.scopes().unwrap(), 1);

    clock.step();
    assert_eq!(allocator.issue(ct(1)).unwrap().counter(), 1);
}

#[test]
fn issuer_trait_delegates() {
    fn issue_via<I: Issuer + ?Sized>(issuer: &I) -> Glyph {
        issuer.issue(ct(4)).unwrap()
    }

    let allocator = Arc::new(ScopedAllocator::with_clock(MockTime { millis: NOW }));
    assert_eq!(issue_via(&allocator).counter(), 0);
    assert_eq!(issue_via(&*allocator).counter(), 1);
    let dynamic: &dyn Issuer = &*allocator;
    assert_eq!(issue_via(dynamic).counter(), 2);
}

#[test]
fn system_clock_issuance_is_monotonic() {
    let allocator = ScopedAllocator::new();
    let mut last = allocator.issue(ct(11)).unwrap();
    // stays below the counter space even if the clock never ticks
    for _ in 0..1_000 {
        let next = allocator.issue(ct(11)).unwrap();
        assert!(next > last, "{next:?} <= {last:?}");
        last = next;
    }
}

#[test]
fn monotonic_clock_issuance_is_monotonic() {
    let allocator = ScopedAllocator::with_clock(MonotonicClock::new());
    let mut last = allocator.issue(ct(11)).unwrap();
    for _ in 0..1_000 {
        let next = allocator.issue(ct(11)).unwrap();
        assert!(next > last);
        last = next;
    }
}

#[test]
fn concurrent_issuance_is_unique() {
    const THREADS: usize = 8;
    const IDS_PER_THREAD: usize = 255;
    const TOTAL_IDS: usize = THREADS * IDS_PER_THREAD;

    // A frozen clock puts every glyph in the same millisecond, the worst case.
    let allocator = ScopedAllocator::with_clock(MockTime { millis: NOW });
    let seen_ids = Mutex::new(HashSet::with_capacity(TOTAL_IDS));

    scope(|s| {
        for _ in 0..THREADS {
            s.spawn(|| {
                for _ in 0..IDS_PER_THREAD {
                    let id = allocator.issue(ct(1)).unwrap();
                    assert!(seen_ids.lock().unwrap().insert(id));
                }
            });
        }
    });

    let seen_ids = seen_ids.into_inner().unwrap();
    assert_eq!(seen_ids.len(), TOTAL_IDS, "Expected {TOTAL_IDS} unique IDs");
    let counters: HashSet<u16> = seen_ids.iter().map(Glyph::counter).collect();
    assert_eq!(counters.len(), TOTAL_IDS);
}

#[test]
fn concurrent_issuance_across_scopes() {
    const THREADS: u16 = 4;
    const IDS_PER_THREAD: usize = 500;

    let allocator = Arc::new(ScopedAllocator::with_clock(MockTime { millis: NOW }));

    scope(|s| {
        for tag in 0..THREADS {
            let allocator = Arc::clone(&allocator);
            s.spawn(move || {
                let mut last = None;
                for _ in 0..IDS_PER_THREAD {
                    let id = allocator.issue(ct(tag)).unwrap();
                    assert_eq!(id.content_type(), tag);
                    assert!(last.is_none_or(|last| id > last));
                    last = Some(id);
                }
            });
        }
    });

    assert_eq!(allocator.scopes().unwrap(), usize::from(THREADS));
}
