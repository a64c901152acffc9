use crate::{Components, Error, Glyph, RandSource, Result, SystemClock, ThreadRandom, TimeSource};

/// A one-of construction request, for glue code that receives loosely typed
/// input (command lines, forms, adapter hooks).
///
/// Exactly one form must be set: `string`, `bytes`, `int`, `hex`, or at least
/// one field of `components`. None or several is an
/// [`Error::InvalidArguments`].
///
/// # Example
/// ```
/// use aztecglyph::{Glyph, GlyphInput};
///
/// let input = GlyphInput {
///     hex: Some("1234567890abcdef".into()),
///     ..Default::default()
/// };
/// assert_eq!(input.resolve().unwrap(), Glyph::from_raw(0x1234_5678_90AB_CDEF));
///
/// assert!(GlyphInput::default().resolve().is_err());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GlyphInput {
    pub string: Option<String>,
    pub bytes: Option<Vec<u8>>,
    pub int: Option<i128>,
    pub hex: Option<String>,
    pub components: Components,
}

impl GlyphInput {
    /// Names of the forms that are set, in declaration order.
    pub fn provided(&self) -> Vec<&'static str> {
        [
            ("string", self.string.is_some()),
            ("bytes", self.bytes.is_some()),
            ("int", self.int.is_some()),
            ("hex", self.hex.is_some()),
            ("components", !self.components.is_empty()),
        ]
        .into_iter()
        .filter_map(|(name, set)| set.then_some(name))
        .collect()
    }

    /// Resolves the input, defaulting missing components from the system
    /// clock and the thread-local RNG.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArguments`] when no form or more than one is set.
    /// - Any error of the constructor the form maps to.
    pub fn resolve(&self) -> Result<Glyph> {
        self.resolve_with(&SystemClock, &ThreadRandom)
    }

    /// Resolves the input, defaulting missing components from the given
    /// sources.
    ///
    /// # Errors
    ///
    /// See [`GlyphInput::resolve`].
    pub fn resolve_with(&self, time: &impl TimeSource, rng: &impl RandSource) -> Result<Glyph> {
        match self.provided().as_slice() {
            [] => {
                return Err(Error::invalid_arguments(
                    "one of string, bytes, int, hex or components must be provided",
                ));
            }
            [_] => {}
            many => {
                return Err(Error::invalid_arguments(format!(
                    "conflicting forms provided: {}",
                    many.join(", ")
                )));
            }
        }

        if let Some(string) = &self.string {
            Glyph::from_base58(string)
        } else if let Some(bytes) = &self.bytes {
            Glyph::try_from_bytes(bytes)
        } else if let Some(int) = self.int {
            Glyph::try_from_int(int)
        } else if let Some(hex) = &self.hex {
            Glyph::from_hex(hex)
        } else {
            self.components.build_with(time, rng)
        }
    }
}
