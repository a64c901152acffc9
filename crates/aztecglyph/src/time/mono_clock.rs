use crate::TimeSource;
use std::{
    sync::{
        Arc, OnceLock,
        atomic::{AtomicU64, Ordering},
    },
    thread::{self, JoinHandle},
    time::{Duration, Instant, SystemTime, UNIX_EPOCH},
};

/// Shared ticker thread that updates every millisecond.
struct SharedTickerInner {
    elapsed: AtomicU64,
    _handle: OnceLock<JoinHandle<()>>,
}

/// A wall-anchored clock that never goes backward.
///
/// The wall clock is read once, at construction. From then on the clock
/// advances with [`Instant`], so NTP corrections or manual changes of the
/// system time cannot move it backward. Issuing glyphs through a
/// [`crate::ScopedAllocator`] built on this clock means a backward jump of the
/// system time can no longer repeat an already issued timestamp.
///
/// A background thread stores the elapsed milliseconds into an atomic once per
/// millisecond, so reading the clock is a single atomic load. The thread exits
/// on its next tick after the last clone of the clock is dropped.
///
/// # Example
///
/// ```
/// use aztecglyph::{MonotonicClock, TimeSource};
///
/// let clock = MonotonicClock::new();
/// let a = clock.current_millis();
/// std::thread::sleep(std::time::Duration::from_millis(3));
/// assert!(clock.current_millis() >= a);
/// ```
#[derive(Clone)]
pub struct MonotonicClock {
    inner: Arc<SharedTickerInner>,
    anchor_millis: u64,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    /// Starts a clock anchored to the current wall-clock time.
    pub fn new() -> Self {
        let anchor_millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_millis() as u64);

        let inner = Arc::new(SharedTickerInner {
            elapsed: AtomicU64::new(0),
            _handle: OnceLock::new(),
        });

        let weak_inner = Arc::downgrade(&inner);
        let handle = thread::spawn(move || {
            let start = Instant::now();
            let mut tick = 0;

            loop {
                let Some(inner_ref) = weak_inner.upgrade() else {
                    break;
                };

                // Absolute target time of the next tick
                let target = start + Duration::from_millis(tick);

                let now = Instant::now();
                if now < target {
                    thread::sleep(target - now);
                }

                let elapsed = start.elapsed().as_millis() as u64;
                inner_ref.elapsed.store(elapsed, Ordering::Release);

                tick = elapsed + 1;
            }
        });

        // Only this constructor ever sets the handle.
        let _ = inner._handle.set(handle);

        Self {
            inner,
            anchor_millis,
        }
    }

    /// Wall-clock time (Unix milliseconds) this clock was anchored to.
    pub const fn anchor_millis(&self) -> u64 {
        self.anchor_millis
    }
}

impl TimeSource for MonotonicClock {
    fn current_millis(&self) -> u64 {
        self.anchor_millis + self.inner.elapsed.load(Ordering::Acquire)
    }
}

impl core::fmt::Debug for MonotonicClock {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MonotonicClock")
            .field("anchor_millis", &self.anchor_millis)
            .field("elapsed", &self.inner.elapsed.load(Ordering::Relaxed))
            .finish()
    }
}
