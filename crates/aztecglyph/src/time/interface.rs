/// A trait for time sources that return a wall-clock timestamp.
///
/// This abstraction allows you to plug in the real system clock, a monotonic
/// timer, or a mocked time source in tests.
///
/// The unit is **milliseconds since the Unix epoch**. Conversion to the glyph
/// epoch happens when a glyph is packed.
///
/// # Example
///
/// ```
/// use aztecglyph::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1_577_836_800_000
///     }
/// }
///
/// let time = FixedTime;
/// assert_eq!(time.current_millis(), 1_577_836_800_000);
/// ```
pub trait TimeSource {
    /// Returns the current time in milliseconds since the Unix epoch.
    fn current_millis(&self) -> u64;
}
