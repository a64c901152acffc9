use crate::{Glyph, RandSource, Result, SystemClock, ThreadRandom, TimeSource};

/// The component form of a [`Glyph`], with every field optional.
///
/// Missing fields are defaulted when the glyph is built:
///
/// - `counter`: a random value in `0..=2047`
/// - `content_type`: a random value in `0..=4095`
/// - `now_millis`: the current time of the [`TimeSource`]
///
/// Explicit values are validated exactly as in [`Glyph::from_components`].
///
/// # Example
/// ```
/// use aztecglyph::{Components, Glyph};
///
/// let glyph = Components::new()
///     .content_type(12)
///     .now_millis(Glyph::EPOCH_MILLIS + 1_000)
///     .build()
///     .unwrap();
/// assert_eq!(glyph.content_type(), 12);
/// assert_eq!(glyph.timestamp_delta(), 1_000);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Components {
    pub counter: Option<u16>,
    pub content_type: Option<u16>,
    pub now_millis: Option<u64>,
}

impl Components {
    pub const fn new() -> Self {
        Self {
            counter: None,
            content_type: None,
            now_millis: None,
        }
    }

    #[must_use]
    pub const fn counter(mut self, counter: u16) -> Self {
        self.counter = Some(counter);
        self
    }

    #[must_use]
    pub const fn content_type(mut self, content_type: u16) -> Self {
        self.content_type = Some(content_type);
        self
    }

    /// Sets the timestamp, in Unix milliseconds.
    #[must_use]
    pub const fn now_millis(mut self, now_millis: u64) -> Self {
        self.now_millis = Some(now_millis);
        self
    }

    /// Whether no field was set.
    pub const fn is_empty(&self) -> bool {
        self.counter.is_none() && self.content_type.is_none() && self.now_millis.is_none()
    }

    /// Builds the glyph, defaulting missing fields from the system clock and
    /// the thread-local RNG.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OutOfRange`] if an explicit field is out of
    /// range, or if the clock lies outside the 41-bit window.
    pub fn build(self) -> Result<Glyph> {
        self.build_with(&SystemClock, &ThreadRandom)
    }

    /// Builds the glyph, defaulting missing fields from the given sources.
    ///
    /// # Errors
    ///
    /// See [`Components::build`].
    pub fn build_with(self, time: &impl TimeSource, rng: &impl RandSource) -> Result<Glyph> {
        let counter = self
            .counter
            .unwrap_or_else(|| (rng.rand() & Glyph::COUNTER_MASK) as u16);
        let content_type = self
            .content_type
            .unwrap_or_else(|| (rng.rand() & Glyph::CONTENT_TYPE_MASK) as u16);
        let now_millis = self.now_millis.unwrap_or_else(|| time.current_millis());
        Glyph::from_components(counter, content_type, now_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, Field};

    struct FixedTime(u64);

    impl TimeSource for FixedTime {
        fn current_millis(&self) -> u64 {
            self.0
        }
    }

    struct FixedRand(u64);

    impl RandSource for FixedRand {
        fn rand(&self) -> u64 {
            self.0
        }
    }

    const NOW: u64 = 1_700_000_000_000;

    #[test]
    fn missing_fields_come_from_sources() {
        let glyph = Components::new()
            .build_with(&FixedTime(NOW), &FixedRand(u64::MAX))
            .unwrap();
        assert_eq!(glyph.counter(), Glyph::MAX_COUNTER);
        assert_eq!(glyph.content_type(), Glyph::MAX_CONTENT_TYPE);
        assert_eq!(glyph.timestamp_millis(), NOW);
    }

    #[test]
    fn random_defaults_are_masked_into_range() {
        let glyph = Components::new()
            .build_with(&FixedTime(NOW), &FixedRand(0xABCD_EF01_2345_6789))
            .unwrap();
        assert_eq!(glyph.counter(), 0x789 & 0x7FF);
        assert_eq!(glyph.content_type(), 0x789);
    }

    #[test]
    fn explicit_fields_win_over_sources() {
        let glyph = Components::new()
            .counter(3)
            .content_type(4)
            .now_millis(NOW + 5)
            .build_with(&FixedTime(NOW), &FixedRand(u64::MAX))
            .unwrap();
        assert_eq!(glyph.counter(), 3);
        assert_eq!(glyph.content_type(), 4);
        assert_eq!(glyph.timestamp_millis(), NOW + 5);
    }

    #[test]
    fn explicit_fields_are_validated() {
        let err = Components::new()
            .counter(2048)
            .build_with(&FixedTime(NOW), &FixedRand(0))
            .unwrap_err();
        assert_eq!(
            err,
            Error::OutOfRange {
                field: Field::Counter,
                value: 2048
            }
        );
    }

    #[test]
    fn clock_outside_window_is_rejected() {
        let err = Components::new()
            .build_with(&FixedTime(0), &FixedRand(0))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::OutOfRange {
                field: Field::Timestamp,
                value: 0
            }
        ));
    }

    #[test]
    fn generate_uses_wall_clock() {
        let before = SystemClock.current_millis();
        let glyph = Glyph::generate().unwrap();
        let after = SystemClock.current_millis();
        assert!((before..=after).contains(&glyph.timestamp_millis()));
    }

    #[test]
    fn is_empty_tracks_fields() {
        assert!(Components::new().is_empty());
        assert!(!Components::new().counter(0).is_empty());
        assert!(!Components::new().now_millis(NOW).is_empty());
    }
}
