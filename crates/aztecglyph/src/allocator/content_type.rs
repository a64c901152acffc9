use crate::{Error, Field, Glyph, Result};
use core::fmt;

/// A validated 12-bit content-type tag.
///
/// This is the canonical scope key of a [`crate::ScopedAllocator`]: callers
/// with string or table identifiers map them to a `ContentType` first (see
/// [`crate::ContentTypes`]), so counter state is always keyed the same way.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ContentType(u16);

impl ContentType {
    pub const MIN: Self = Self(0);
    pub const MAX: Self = Self(Glyph::MAX_CONTENT_TYPE);

    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if `tag > 4095`.
    pub const fn new(tag: u16) -> Result<Self> {
        if tag > Glyph::MAX_CONTENT_TYPE {
            return Err(Error::OutOfRange {
                field: Field::ContentType,
                value: tag as i128,
            });
        }
        Ok(Self(tag))
    }

    pub const fn get(self) -> u16 {
        self.0
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<ContentType> for u16 {
    fn from(content_type: ContentType) -> Self {
        content_type.0
    }
}

macro_rules! impl_try_from_int {
    ($($ty:ty),* $(,)?) => {
        $(
            impl TryFrom<$ty> for ContentType {
                type Error = Error;

                fn try_from(tag: $ty) -> Result<Self> {
                    u16::try_from(tag)
                        .map_err(|_| Error::out_of_range(Field::ContentType, tag as i128))
                        .and_then(Self::new)
                }
            }
        )*
    };
}

impl_try_from_int!(u16, u32, u64, usize, i32, i64);
