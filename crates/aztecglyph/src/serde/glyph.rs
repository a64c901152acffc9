use crate::Glyph;
use core::fmt;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// A glyph serializes as its 11-character base58 string.
impl Serialize for Glyph {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        as_base58::serialize(self, s)
    }
}

impl<'de> Deserialize<'de> for Glyph {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        as_base58::deserialize(d)
    }
}

struct TextVisitor {
    expecting: &'static str,
    parse: fn(&str) -> crate::Result<Glyph>,
}

impl de::Visitor<'_> for TextVisitor {
    type Value = Glyph;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.expecting)
    }

    #[inline]
    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        (self.parse)(v).map_err(de::Error::custom)
    }
}

pub mod as_base58 {
    use super::{Deserializer, Glyph, Serializer, TextVisitor};

    /// Serialize a glyph as its base58 string.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<S: Serializer>(glyph: &Glyph, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(glyph.encode().as_str())
    }

    /// Deserialize a glyph from its base58 string.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying deserializer fails, or if the string
    /// is not exactly 11 base58 symbols encoding a 64-bit value.
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Glyph, D::Error> {
        d.deserialize_str(TextVisitor {
            expecting: "an 11-character base58 string",
            parse: Glyph::from_base58,
        })
    }
}

pub mod as_native {
    use super::{Deserialize, Deserializer, Glyph, Serialize, Serializer};

    /// Serialize a glyph as its native integer representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<S: Serializer>(glyph: &Glyph, s: S) -> Result<S::Ok, S::Error> {
        glyph.to_raw().serialize(s)
    }

    /// Deserialize a glyph from its native integer representation. Every
    /// `u64` is a valid glyph.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying deserializer fails.
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Glyph, D::Error> {
        u64::deserialize(d).map(Glyph::from_raw)
    }
}

pub mod as_hex {
    use super::{Deserializer, Glyph, Serializer, TextVisitor};

    /// Serialize a glyph as 16 lowercase hex digits.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<S: Serializer>(glyph: &Glyph, s: S) -> Result<S::Ok, S::Error> {
        let mut buf = [0_u8; Glyph::HEX_LEN];
        // 8 bytes always fit 16 hex digits.
        hex::encode_to_slice(glyph.to_bytes(), &mut buf).map_err(serde::ser::Error::custom)?;
        // SAFETY: hex digits are ASCII
        s.serialize_str(unsafe { core::str::from_utf8_unchecked(&buf) })
    }

    /// Deserialize a glyph from 16 hex digits of either case.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying deserializer fails, or if the string
    /// is not exactly 16 hex digits.
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Glyph, D::Error> {
        d.deserialize_str(TextVisitor {
            expecting: "a 16-character hex string",
            parse: Glyph::from_hex,
        })
    }
}
