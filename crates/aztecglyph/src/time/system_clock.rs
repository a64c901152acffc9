use crate::TimeSource;
use std::time::{SystemTime, UNIX_EPOCH};

/// The operating system's wall clock.
///
/// This is the default clock for glyph construction and issuance. It follows
/// every adjustment of the system time, including backward jumps; use
/// [`crate::MonotonicClock`] when that is not acceptable.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn current_millis(&self) -> u64 {
        // A clock set before 1970 reads as 0, which glyph validation rejects.
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_millis() as u64)
    }
}
