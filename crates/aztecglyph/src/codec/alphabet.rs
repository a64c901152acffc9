use crate::{Error, Field, Result};
use core::fmt;

const NO_VALUE: u8 = u8::MAX;

/// The base58 alphabet used for a glyph's text form.
///
/// It leaves out the visually ambiguous `0`, `O`, `I` and `l`, and its symbols
/// are in ASCII order, so equal-width encodings compare lexicographically in
/// the same order as the values they encode.
pub const BASE58: Alphabet =
    Alphabet::new(b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz");

/// An ordered set of unique ASCII symbols used to write integers in base N.
///
/// The position of a symbol is its digit value; the first symbol is the
/// "zero" symbol, used for `0` and for left padding. A reverse lookup table
/// is computed once at construction (in `const` context for the built-in
/// alphabets) and reused by every [`Alphabet::decode`] call.
#[derive(Clone, Copy)]
pub struct Alphabet {
    symbols: &'static [u8],
    lookup: [u8; 256],
}

impl Alphabet {
    /// Builds an alphabet from its symbols.
    ///
    /// # Panics
    ///
    /// Panics when the symbols are not 2..=128 unique ASCII bytes. Used in a
    /// `const` item, this turns into a compile-time error.
    pub const fn new(symbols: &'static [u8]) -> Self {
        match Self::build(symbols) {
            Some(alphabet) => alphabet,
            None => panic!("alphabet must consist of 2..=128 unique ASCII symbols"),
        }
    }

    /// Fallible counterpart to [`Alphabet::new`] for alphabets only known at
    /// runtime.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArguments`] when the symbols are not 2..=128
    /// unique ASCII bytes.
    pub fn try_new(symbols: &'static [u8]) -> Result<Self> {
        Self::build(symbols).ok_or_else(|| {
            Error::invalid_arguments("alphabet must consist of 2..=128 unique ASCII symbols")
        })
    }

    const fn build(symbols: &'static [u8]) -> Option<Self> {
        if symbols.len() < 2 || symbols.len() > 128 {
            return None;
        }
        let mut lookup = [NO_VALUE; 256];
        let mut i = 0;
        while i < symbols.len() {
            let c = symbols[i];
            if !c.is_ascii() || lookup[c as usize] != NO_VALUE {
                return None;
            }
            lookup[c as usize] = i as u8;
            i += 1;
        }
        Some(Self { symbols, lookup })
    }

    /// Number of symbols, i.e. the numeric base.
    pub const fn base(&self) -> u64 {
        self.symbols.len() as u64
    }

    /// The zero symbol.
    pub const fn zero(&self) -> u8 {
        self.symbols[0]
    }

    pub const fn symbols(&self) -> &'static [u8] {
        self.symbols
    }

    /// Digit value of `symbol`, if it belongs to this alphabet.
    pub const fn index_of(&self, symbol: u8) -> Option<u8> {
        match self.lookup[symbol as usize] {
            NO_VALUE => None,
            digit => Some(digit),
        }
    }

    /// Number of symbols needed to write `value` without padding.
    pub const fn encoded_len(&self, mut value: u64) -> usize {
        let base = self.base();
        let mut len = 1;
        while value >= base {
            value /= base;
            len += 1;
        }
        len
    }

    /// Encodes `value`, left-padding with the zero symbol up to `pad_to`
    /// symbols when the natural encoding is shorter.
    ///
    /// # Errors
    ///
    /// - [`Error::NegativeValue`] if `value` is negative.
    /// - [`Error::OutOfRange`] if `value` does not fit in 64 bits.
    ///
    /// # Example
    /// ```
    /// use aztecglyph::BASE58;
    ///
    /// assert_eq!(BASE58.encode(0, None).unwrap(), "1");
    /// assert_eq!(BASE58.encode(57, Some(3)).unwrap(), "11z");
    /// assert!(BASE58.encode(-1, None).is_err());
    /// ```
    pub fn encode(&self, value: impl Into<i128>, pad_to: Option<usize>) -> Result<String> {
        let value = value.into();
        if value < 0 {
            return Err(Error::NegativeValue { value });
        }
        let value = u64::try_from(value).map_err(|_| Error::out_of_range(Field::Value, value))?;
        Ok(self.encode_u64(value, pad_to))
    }

    /// Infallible [`Alphabet::encode`] for values that are already `u64`.
    pub fn encode_u64(&self, value: u64, pad_to: Option<usize>) -> String {
        let natural = self.encoded_len(value);
        let width = pad_to.map_or(natural, |pad| pad.max(natural));
        let mut buf = vec![self.zero(); width];
        self.fill(value, &mut buf);
        // SAFETY: every byte of `buf` is a symbol of this alphabet, and `build`
        // only accepts ASCII symbols.
        unsafe { String::from_utf8_unchecked(buf) }
    }

    /// Encodes `value` right-aligned into `buf`, padding the remaining
    /// leading bytes with the zero symbol.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLength`] if `buf` is shorter than
    /// [`Alphabet::encoded_len`].
    pub fn encode_to_slice(&self, value: u64, buf: &mut [u8]) -> Result<()> {
        let needed = self.encoded_len(value);
        if buf.len() < needed {
            return Err(Error::InvalidLength {
                expected: needed,
                actual: buf.len(),
            });
        }
        self.fill(value, buf);
        Ok(())
    }

    /// Writes the digits of `value` from the right end of `buf`.
    ///
    /// The caller guarantees `buf.len() >= self.encoded_len(value)`.
    pub(crate) fn fill(&self, mut value: u64, buf: &mut [u8]) {
        let base = self.base();
        for slot in buf.iter_mut().rev() {
            *slot = self.symbols[(value % base) as usize];
            value /= base;
        }
        debug_assert_eq!(value, 0, "buffer too small for encoded value");
    }

    /// Decodes `text` back into an integer.
    ///
    /// Empty input and input made only of zero symbols decode to `0`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidSymbol`] if a character is not in this alphabet.
    /// - [`Error::OutOfRange`] if the value does not fit in 64 bits.
    ///
    /// # Example
    /// ```
    /// use aztecglyph::BASE58;
    ///
    /// assert_eq!(BASE58.decode("11z").unwrap(), 57);
    /// assert_eq!(BASE58.decode("").unwrap(), 0);
    /// assert!(BASE58.decode("10").is_err());
    /// ```
    pub fn decode(&self, text: &str) -> Result<u64> {
        let base = u128::from(self.base());
        let mut acc = 0_u128;
        for (index, byte) in text.bytes().enumerate() {
            let Some(digit) = self.index_of(byte) else {
                return Err(Error::InvalidSymbol {
                    symbol: text[index..].chars().next().unwrap_or(char::REPLACEMENT_CHARACTER),
                    index,
                });
            };
            // Bails out as soon as the value leaves u64, so `acc` stays far
            // below u128::MAX.
            acc = acc * base + u128::from(digit);
            if acc > u128::from(u64::MAX) {
                return Err(Error::out_of_range(Field::Value, acc as i128));
            }
        }
        Ok(acc as u64)
    }
}

impl fmt::Debug for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Alphabet")
            .field("symbols", &String::from_utf8_lossy(self.symbols))
            .field("base", &self.base())
            .finish()
    }
}

impl PartialEq for Alphabet {
    fn eq(&self, other: &Self) -> bool {
        self.symbols == other.symbols
    }
}

impl Eq for Alphabet {}
