use core::fmt;
use std::sync::PoisonError;

/// A result type defaulting to this crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// The numeric field an [`Error::OutOfRange`] refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    /// A raw integer meant to become a glyph.
    Int,
    /// The 11-bit counter.
    Counter,
    /// The 12-bit content type.
    ContentType,
    /// A Unix timestamp in milliseconds.
    Timestamp,
    /// A value decoded from (or encoded to) text.
    Value,
}

impl Field {
    /// The inclusive range this field accepts.
    pub const fn bounds(self) -> (i128, i128) {
        match self {
            Self::Int | Self::Value => (0, u64::MAX as i128),
            Self::Counter => (0, crate::Glyph::MAX_COUNTER as i128),
            Self::ContentType => (0, crate::Glyph::MAX_CONTENT_TYPE as i128),
            Self::Timestamp => (
                crate::Glyph::EPOCH_MILLIS as i128,
                crate::Glyph::MAX_NOW_MILLIS as i128,
            ),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Int => "int",
            Self::Counter => "counter",
            Self::ContentType => "content_type",
            Self::Timestamp => "now",
            Self::Value => "value",
        };
        f.write_str(name)
    }
}

/// All errors `aztecglyph` can produce.
///
/// Every error is raised synchronously at the point of violation and nothing
/// is retried internally. A glyph either is fully valid or does not exist.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A string, byte slice, or hex string has the wrong width.
    #[error("invalid length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// A character is not part of the expected alphabet. `index` is the byte
    /// offset of the offending character.
    #[error("invalid symbol {symbol:?} at index {index}")]
    InvalidSymbol { symbol: char, index: usize },

    /// A numeric value lies outside the range its field accepts.
    #[error("{field} out of range: {value} (expected {}..={})", .field.bounds().0, .field.bounds().1)]
    OutOfRange { field: Field, value: i128 },

    /// The codec was asked to encode a negative integer.
    #[error("only non-negative values can be encoded, got {value}")]
    NegativeValue { value: i128 },

    /// No construction form, or more than one, was supplied.
    #[error("invalid arguments: {reason}")]
    InvalidArguments { reason: String },

    /// An identifier slot that already holds a value was assigned again.
    #[error("glyph values are immutable once assigned")]
    ImmutableValue,

    /// A shared lock was poisoned by a panicking thread.
    ///
    /// Never produced with the `parking-lot` feature, whose locks do not
    /// poison.
    #[error("lock poisoned")]
    LockPoisoned,
}

impl Error {
    pub(crate) fn out_of_range(field: Field, value: impl Into<i128>) -> Self {
        Self::OutOfRange {
            field,
            value: value.into(),
        }
    }

    pub(crate) fn invalid_arguments(reason: impl Into<String>) -> Self {
        Self::InvalidArguments {
            reason: reason.into(),
        }
    }
}

// Convert all poisoned lock errors to a simplified `LockPoisoned`
impl<G> From<PoisonError<G>> for Error {
    fn from(_: PoisonError<G>) -> Self {
        Self::LockPoisoned
    }
}
