use std::collections::{HashMap, hash_map::Entry};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    ContentType, Error, Field, Glyph, Issuer, Result, SystemClock, TimeSource,
    mutex::{self, Mutex},
};

/// Per-scope counter record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScopeState {
    /// The last millisecond this scope issued in (Unix milliseconds).
    pub last_timestamp_millis: u64,
    /// The counter of the last glyph issued for this scope.
    pub counter: u16,
}

/// A lock-based glyph allocator, keeping one counter per content type.
///
/// Within one scope and one millisecond, successive calls to
/// [`ScopedAllocator::issue`] receive strictly increasing counters; the
/// counter restarts at 0 whenever the clock moves past the scope's last
/// millisecond. After 2048 glyphs in the same millisecond the counter wraps
/// to 0 without further signal.
///
/// All scopes share one mutex, and the counter used to build a glyph is read
/// inside the same critical section that advanced it. Wrap the allocator in an
/// [`Arc`](std::sync::Arc) to share it across threads.
///
/// If the clock moves backward, the allocator keeps the scope's last
/// millisecond and only increments the counter, so glyphs carry the earlier
/// timestamp the clock reported. Use a [`crate::MonotonicClock`] to rule this
/// out.
///
/// # Example
/// ```
/// use aztecglyph::{ContentType, ScopedAllocator};
///
/// let allocator = ScopedAllocator::new();
/// let users = ContentType::new(1).unwrap();
///
/// let a = allocator.issue(users).unwrap();
/// let b = allocator.issue(users).unwrap();
/// assert!(a < b);
/// assert_eq!(allocator.scopes().unwrap(), 1);
/// ```
pub struct ScopedAllocator<T: TimeSource = SystemClock> {
    pub(crate) state: Mutex<HashMap<ContentType, ScopeState>>,
    pub(crate) time: T,
}

impl ScopedAllocator {
    /// Creates an allocator driven by the system clock.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for ScopedAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TimeSource> ScopedAllocator<T> {
    /// Creates an allocator driven by `time`.
    pub fn with_clock(time: T) -> Self {
        Self {
            state: Mutex::new(HashMap::new()),
            time,
        }
    }

    pub const fn clock(&self) -> &T {
        &self.time
    }

    /// Issues the next glyph for `content_type`.
    ///
    /// # Errors
    ///
    /// - [`crate::Error::OutOfRange`] if the clock lies outside the glyph
    ///   window (before 2020 or after 2089). The scope is left untouched.
    /// - [`crate::Error::LockPoisoned`] if another thread panicked while
    ///   holding the std lock.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn issue(&self, content_type: ContentType) -> Result<Glyph> {
        let (counter, now) = {
            let mut scopes = mutex::lock(&self.state)?;
            let now = self.time.current_millis();
            if !(Glyph::EPOCH_MILLIS..=Glyph::MAX_NOW_MILLIS).contains(&now) {
                return Err(Error::out_of_range(Field::Timestamp, now));
            }

            let scope = match scopes.entry(content_type) {
                Entry::Vacant(entry) => *entry.insert(ScopeState {
                    last_timestamp_millis: now,
                    counter: 0,
                }),
                Entry::Occupied(mut entry) => {
                    let scope = entry.get_mut();
                    if now > scope.last_timestamp_millis {
                        scope.last_timestamp_millis = now;
                        scope.counter = 0;
                    } else {
                        if now < scope.last_timestamp_millis {
                            Self::cold_clock_behind(content_type, now, scope.last_timestamp_millis);
                        }
                        scope.counter = (scope.counter + 1) & Glyph::MAX_COUNTER;
                    }
                    *scope
                }
            };
            (scope.counter, now)
        };

        Glyph::from_components(counter, content_type.get(), now)
    }

    #[cold]
    #[inline(never)]
    #[allow(unused_variables)]
    fn cold_clock_behind(content_type: ContentType, now: u64, last: u64) {
        #[cfg(feature = "tracing")]
        tracing::warn!(
            %content_type,
            now,
            last,
            behind_ms = last - now,
            "clock moved backward; reusing last millisecond counter"
        );
    }

    /// Number of scopes that have issued at least once.
    ///
    /// # Errors
    ///
    /// [`crate::Error::LockPoisoned`] on a poisoned std lock.
    pub fn scopes(&self) -> Result<usize> {
        Ok(mutex::lock(&self.state)?.len())
    }

    /// The counter record of `content_type`, if it has issued before.
    ///
    /// # Errors
    ///
    /// [`crate::Error::LockPoisoned`] on a poisoned std lock.
    pub fn snapshot(&self, content_type: ContentType) -> Result<Option<ScopeState>> {
        Ok(mutex::lock(&self.state)?.get(&content_type).copied())
    }
}

impl<T: TimeSource> Issuer for ScopedAllocator<T> {
    fn issue(&self, content_type: ContentType) -> Result<Glyph> {
        self.issue(content_type)
    }
}

impl<T: TimeSource + core::fmt::Debug> core::fmt::Debug for ScopedAllocator<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ScopedAllocator")
            .field("scopes", &self.scopes().ok())
            .field("time", &self.time)
            .finish()
    }
}
