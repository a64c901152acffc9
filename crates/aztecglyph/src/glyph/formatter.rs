use crate::{BASE58, Glyph};
use core::fmt;

/// Owns the 11-byte base58 buffer of a [`Glyph`] and formats it without heap
/// allocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Base58Formatter {
    buf: [u8; Glyph::STRING_LEN],
}

impl Base58Formatter {
    pub fn new(glyph: &Glyph) -> Self {
        let mut buf = [BASE58.zero(); Glyph::STRING_LEN];
        // u64::MAX needs exactly 11 base58 symbols.
        BASE58.fill(glyph.to_raw(), &mut buf);
        Self { buf }
    }

    /// Returns a `&str` view of the base58 encoding.
    #[must_use]
    pub fn as_str(&self) -> &str {
        // SAFETY: `self.buf` holds only base58 ASCII symbols
        unsafe { core::str::from_utf8_unchecked(&self.buf) }
    }

    /// Consumes the formatter and returns the raw buffer.
    pub const fn into_inner(self) -> [u8; Glyph::STRING_LEN] {
        self.buf
    }
}

impl fmt::Display for Base58Formatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for Base58Formatter {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl PartialEq<str> for Base58Formatter {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Base58Formatter {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl PartialEq<String> for Base58Formatter {
    fn eq(&self, other: &String) -> bool {
        self.as_str() == other.as_str()
    }
}
