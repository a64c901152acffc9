/// A trait for random sources that return random integers.
///
/// This abstraction allows you to plug in a real random source or a mocked
/// random source in tests. Glyph construction masks the returned value down
/// to the width of the field it fills, so every bit should be uniformly
/// distributed.
///
/// # Example
/// ```
/// use aztecglyph::RandSource;
///
/// struct FixedRand;
/// impl RandSource for FixedRand {
///     fn rand(&self) -> u64 {
///         1234
///     }
/// }
///
/// let rng = FixedRand;
/// assert_eq!(rng.rand(), 1234);
/// ```
pub trait RandSource {
    /// Returns a random integer.
    fn rand(&self) -> u64;
}
