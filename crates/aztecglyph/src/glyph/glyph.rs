use crate::{BASE58, Base58Formatter, Components, Error, Field, Result};
use core::{fmt, str::FromStr};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// A 64-bit, time-sortable identifier.
///
/// - 41 bits timestamp (ms since [`Glyph::EPOCH_MILLIS`])
/// - 11 bits counter (per scope, per millisecond)
/// - 12 bits content type
///
/// ```text
///  Bit Index:  63             23 22           12 11                0
///              +----------------+---------------+------------------+
///  Field:      | timestamp (41) | counter (11)  | content type (12)|
///              +----------------+---------------+------------------+
///              |<----- MSB ---------- 64 bits --------- LSB ------>|
/// ```
///
/// A glyph is immutable: there are no setters, and every view (`to_bytes`,
/// `to_hex`, `to_base58`, `counter`, ...) is a pure function of the stored
/// integer. Equality, ordering and hashing are those of the integer, so a
/// glyph with a later timestamp (or the same timestamp and a larger counter)
/// compares greater.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Glyph {
    id: u64,
}

impl Glyph {
    /// Glyph epoch: Wednesday, January 1, 2020 00:00:00 UTC, in Unix
    /// milliseconds.
    pub const EPOCH_MILLIS: u64 = 1_577_836_800_000;

    /// Bitmask for the 41-bit timestamp field. Occupies bits 23 through 63.
    pub const TIMESTAMP_MASK: u64 = (1 << 41) - 1;

    /// Bitmask for the 11-bit counter field. Occupies bits 12 through 22.
    pub const COUNTER_MASK: u64 = (1 << 11) - 1;

    /// Bitmask for the 12-bit content type field. Occupies bits 0 through 11.
    pub const CONTENT_TYPE_MASK: u64 = (1 << 12) - 1;

    pub const TIMESTAMP_SHIFT: u64 = 23;
    pub const COUNTER_SHIFT: u64 = 12;
    pub const CONTENT_TYPE_SHIFT: u64 = 0;

    pub const MAX_COUNTER: u16 = Self::COUNTER_MASK as u16;
    pub const MAX_CONTENT_TYPE: u16 = Self::CONTENT_TYPE_MASK as u16;

    /// Last Unix millisecond representable in the 41-bit window (2089-09-06).
    pub const MAX_NOW_MILLIS: u64 = Self::EPOCH_MILLIS + Self::TIMESTAMP_MASK;

    /// Width of the base58 text form.
    pub const STRING_LEN: usize = 11;
    /// Width of the binary form.
    pub const BYTES_LEN: usize = 8;
    /// Width of the hex form.
    pub const HEX_LEN: usize = 16;

    pub const MIN: Self = Self::from_raw(0);
    pub const MAX: Self = Self::from_raw(u64::MAX);

    const fn pack(timestamp_delta: u64, counter: u64, content_type: u64) -> Self {
        let timestamp = (timestamp_delta & Self::TIMESTAMP_MASK) << Self::TIMESTAMP_SHIFT;
        let counter = (counter & Self::COUNTER_MASK) << Self::COUNTER_SHIFT;
        let content_type = (content_type & Self::CONTENT_TYPE_MASK) << Self::CONTENT_TYPE_SHIFT;
        Self {
            id: timestamp | counter | content_type,
        }
    }

    /// Wraps a raw 64-bit value. Every `u64` is a valid glyph.
    pub const fn from_raw(raw: u64) -> Self {
        Self { id: raw }
    }

    /// Builds a glyph from an integer of any width.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] unless `0 <= value <= u64::MAX`.
    ///
    /// # Example
    /// ```
    /// use aztecglyph::Glyph;
    ///
    /// assert_eq!(Glyph::try_from_int(42).unwrap().to_raw(), 42);
    /// assert!(Glyph::try_from_int(-1).is_err());
    /// assert!(Glyph::try_from_int(1_i128 << 64).is_err());
    /// ```
    pub fn try_from_int(value: impl Into<i128>) -> Result<Self> {
        let value = value.into();
        u64::try_from(value)
            .map(Self::from_raw)
            .map_err(|_| Error::out_of_range(Field::Int, value))
    }

    /// Builds a glyph from its 8-byte big-endian form.
    pub const fn from_be_bytes(bytes: [u8; 8]) -> Self {
        Self::from_raw(u64::from_be_bytes(bytes))
    }

    /// Builds a glyph from a byte slice holding its big-endian form.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLength`] unless the slice is exactly 8 bytes.
    pub fn try_from_bytes(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; 8] = bytes.try_into().map_err(|_| Error::InvalidLength {
            expected: Self::BYTES_LEN,
            actual: bytes.len(),
        })?;
        Ok(Self::from_be_bytes(bytes))
    }

    /// Parses the 11-character base58 text form.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidLength`] unless the text is exactly 11 characters.
    /// - [`Error::InvalidSymbol`] if a character is outside [`BASE58`].
    /// - [`Error::OutOfRange`] if the text encodes a value above `u64::MAX`
    ///   (anything past `"jpXCZedGfVQ"`).
    ///
    /// # Example
    /// ```
    /// use aztecglyph::Glyph;
    ///
    /// let glyph = Glyph::from_base58("11111111112").unwrap();
    /// assert_eq!(glyph.to_raw(), 1);
    /// assert!(Glyph::from_base58("1111111111").is_err());
    /// ```
    pub fn from_base58(text: &str) -> Result<Self> {
        let actual = text.chars().count();
        if actual != Self::STRING_LEN {
            return Err(Error::InvalidLength {
                expected: Self::STRING_LEN,
                actual,
            });
        }
        BASE58.decode(text).map(Self::from_raw)
    }

    /// Parses the 16-character hex form. Upper- and lowercase digits are both
    /// accepted.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidLength`] unless the text is exactly 16 characters.
    /// - [`Error::InvalidSymbol`] if a character is not a hex digit.
    pub fn from_hex(text: &str) -> Result<Self> {
        let actual = text.chars().count();
        if actual != Self::HEX_LEN {
            return Err(Error::InvalidLength {
                expected: Self::HEX_LEN,
                actual,
            });
        }
        if let Some((index, symbol)) = text.char_indices().find(|(_, c)| !c.is_ascii()) {
            return Err(Error::InvalidSymbol { symbol, index });
        }
        let mut bytes = [0_u8; 8];
        hex::decode_to_slice(text, &mut bytes).map_err(|err| match err {
            hex::FromHexError::InvalidHexCharacter { c, index } => Error::InvalidSymbol {
                symbol: c,
                index,
            },
            hex::FromHexError::OddLength | hex::FromHexError::InvalidStringLength => {
                Error::InvalidLength {
                    expected: Self::HEX_LEN,
                    actual,
                }
            }
        })?;
        Ok(Self::from_be_bytes(bytes))
    }

    /// Packs explicit components into a glyph.
    ///
    /// `now_millis` is a Unix timestamp in milliseconds. Use [`Components`]
    /// when some of the values should be defaulted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if `counter > 2047`,
    /// `content_type > 4095`, or `now_millis` lies outside
    /// [`Glyph::EPOCH_MILLIS`]`..=`[`Glyph::MAX_NOW_MILLIS`].
    ///
    /// # Example
    /// ```
    /// use aztecglyph::Glyph;
    ///
    /// let glyph = Glyph::from_components(0, 0, Glyph::EPOCH_MILLIS).unwrap();
    /// assert_eq!(glyph.to_raw(), 0);
    /// assert_eq!(glyph.to_base58(), "11111111111");
    /// ```
    pub fn from_components(counter: u16, content_type: u16, now_millis: u64) -> Result<Self> {
        if counter > Self::MAX_COUNTER {
            return Err(Error::out_of_range(Field::Counter, counter));
        }
        if content_type > Self::MAX_CONTENT_TYPE {
            return Err(Error::out_of_range(Field::ContentType, content_type));
        }
        if !(Self::EPOCH_MILLIS..=Self::MAX_NOW_MILLIS).contains(&now_millis) {
            return Err(Error::out_of_range(Field::Timestamp, now_millis));
        }
        Ok(Self::pack(
            now_millis - Self::EPOCH_MILLIS,
            u64::from(counter),
            u64::from(content_type),
        ))
    }

    /// Creates a glyph stamped with the current wall-clock time and a random
    /// counter and content type.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if the system clock lies outside the
    /// 41-bit window.
    pub fn generate() -> Result<Self> {
        Components::new().build()
    }

    /// The underlying integer.
    pub const fn to_raw(&self) -> u64 {
        self.id
    }

    /// The 8-byte big-endian form.
    pub const fn to_bytes(&self) -> [u8; 8] {
        self.id.to_be_bytes()
    }

    /// The 16-character lowercase hex form.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// The 11-character base58 form, left-padded with `'1'`.
    pub fn to_base58(&self) -> String {
        self.encode().as_str().to_owned()
    }

    /// Returns a stack-allocated formatter holding the base58 form.
    ///
    /// ```
    /// use aztecglyph::Glyph;
    ///
    /// let glyph = Glyph::from_raw(u64::MAX);
    /// assert_eq!(glyph.encode(), "jpXCZedGfVQ");
    /// ```
    pub fn encode(&self) -> Base58Formatter {
        Base58Formatter::new(self)
    }

    /// Milliseconds since [`Glyph::EPOCH_MILLIS`].
    pub const fn timestamp_delta(&self) -> u64 {
        (self.id >> Self::TIMESTAMP_SHIFT) & Self::TIMESTAMP_MASK
    }

    /// The creation time in Unix milliseconds.
    pub const fn timestamp_millis(&self) -> u64 {
        Self::EPOCH_MILLIS + self.timestamp_delta()
    }

    /// The creation time as a [`SystemTime`].
    pub fn system_time(&self) -> SystemTime {
        UNIX_EPOCH + Duration::from_millis(self.timestamp_millis())
    }

    /// The creation time as a UTC calendar time.
    #[cfg(feature = "chrono")]
    pub fn datetime(&self) -> chrono::DateTime<chrono::Utc> {
        // The 41-bit window ends in 2089, well inside chrono's range.
        chrono::DateTime::from_timestamp_millis(self.timestamp_millis() as i64)
            .unwrap_or(chrono::DateTime::UNIX_EPOCH)
    }

    pub const fn counter(&self) -> u16 {
        ((self.id >> Self::COUNTER_SHIFT) & Self::COUNTER_MASK) as u16
    }

    pub const fn content_type(&self) -> u16 {
        ((self.id >> Self::CONTENT_TYPE_SHIFT) & Self::CONTENT_TYPE_MASK) as u16
    }
}

impl fmt::Display for Glyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.encode().as_str())
    }
}

impl fmt::Debug for Glyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Glyph")
            .field("base58", &self.encode().as_str())
            .field("raw", &format_args!("{:#018x}", self.id))
            .field("timestamp_millis", &self.timestamp_millis())
            .field("counter", &self.counter())
            .field("content_type", &self.content_type())
            .finish()
    }
}

impl FromStr for Glyph {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_base58(s)
    }
}

impl TryFrom<&str> for Glyph {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        Self::from_base58(s)
    }
}

impl TryFrom<&[u8]> for Glyph {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        Self::try_from_bytes(bytes)
    }
}

impl TryFrom<i128> for Glyph {
    type Error = Error;

    fn try_from(value: i128) -> Result<Self> {
        Self::try_from_int(value)
    }
}

impl From<u64> for Glyph {
    fn from(raw: u64) -> Self {
        Self::from_raw(raw)
    }
}

impl From<[u8; 8]> for Glyph {
    fn from(bytes: [u8; 8]) -> Self {
        Self::from_be_bytes(bytes)
    }
}

impl From<Glyph> for u64 {
    fn from(glyph: Glyph) -> Self {
        glyph.to_raw()
    }
}

impl From<Glyph> for [u8; 8] {
    fn from(glyph: Glyph) -> Self {
        glyph.to_bytes()
    }
}
