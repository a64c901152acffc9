use anyhow::{Context, bail};
use aztecglyph::{Components, ContentType, Error, Field, GlyphInput};
use clap::{Parser, ValueEnum};

/// Command-line arguments of the `aztecglyph` binary.
///
/// Either describes one glyph (exactly one of `--string`, `--bytes`, `--int`,
/// `--hex`, or any of the component flags) or asks for fresh glyphs with
/// `--issue`. Which forms are missing or conflicting is decided by the
/// library, so the error messages match those of the API.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "aztecglyph",
    version,
    about = "Decode, convert and issue 64-bit AztecGlyph identifiers"
)]
pub struct CliArgs {
    /// Base58 encoded string (11 characters).
    #[arg(short, long, value_name = "BASE58")]
    pub string: Option<String>,

    /// Raw big-endian bytes, hex encoded (8 bytes). Whitespace between
    /// digits is ignored.
    #[arg(short, long, value_name = "HEX")]
    pub bytes: Option<String>,

    /// Integer in 0..=18446744073709551615.
    #[arg(short, long, value_name = "INT", allow_negative_numbers = true)]
    pub int: Option<i128>,

    /// Hexadecimal string (16 digits).
    #[arg(short = 'x', long, value_name = "HEX")]
    pub hex: Option<String>,

    /// Counter component in 0..=2047. Random when omitted.
    #[arg(short, long, allow_negative_numbers = true)]
    pub counter: Option<i64>,

    /// Content type component in 0..=4095. Random when omitted.
    #[arg(
        short = 't',
        long = "content-type",
        alias = "content_type",
        allow_negative_numbers = true
    )]
    pub content_type: Option<i64>,

    /// Timestamp component, in Unix milliseconds. Current time when omitted.
    #[arg(short, long, allow_negative_numbers = true)]
    pub now: Option<i64>,

    /// Issue fresh glyphs for this content type instead of decoding one.
    #[arg(long, value_name = "CONTENT_TYPE", allow_negative_numbers = true)]
    pub issue: Option<i64>,

    /// Number of glyphs to issue.
    #[arg(long, default_value_t = 1, requires = "issue")]
    pub count: usize,

    /// Output format.
    ///
    /// Environment variable: `AZTECGLYPH_FORMAT`
    #[arg(short, long, value_enum, env = "AZTECGLYPH_FORMAT", default_value_t = Format::String)]
    pub format: Format,
}

/// How each glyph is printed.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// 11-character base58 string.
    String,
    /// 16 lowercase hex digits.
    Hex,
    /// Unsigned integer.
    Int,
    /// JSON object with every representation and component.
    Json,
    /// Bit-layout view.
    Debug,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Build one glyph from the given input.
    Decode(GlyphInput),
    /// Issue `count` fresh glyphs for one scope.
    Issue {
        content_type: ContentType,
        count: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    pub mode: Mode,
    pub format: Format,
}

impl TryFrom<CliArgs> for CliConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let mode = match args.issue {
            Some(content_type) => {
                let decode_flags = [
                    args.string.is_some(),
                    args.bytes.is_some(),
                    args.int.is_some(),
                    args.hex.is_some(),
                    args.counter.is_some(),
                    args.content_type.is_some(),
                    args.now.is_some(),
                ];
                if decode_flags.contains(&true) {
                    bail!("--issue can not be combined with a glyph to decode");
                }
                if args.count == 0 {
                    bail!("--count must be greater than 0");
                }
                Mode::Issue {
                    content_type: ContentType::try_from(content_type)?,
                    count: args.count,
                }
            }
            None => {
                let bytes = args
                    .bytes
                    .map(|text| decode_bytes(&text).with_context(|| format!("--bytes {text:?}")))
                    .transpose()?;
                let components = Components {
                    counter: component(Field::Counter, args.counter)?,
                    content_type: component(Field::ContentType, args.content_type)?,
                    now_millis: component(Field::Timestamp, args.now)?,
                };
                Mode::Decode(GlyphInput {
                    string: args.string,
                    bytes,
                    int: args.int,
                    hex: args.hex,
                    components,
                })
            }
        };

        Ok(Self {
            mode,
            format: args.format,
        })
    }
}

/// Hex decodes `text`, skipping ASCII whitespace such as `"00 01 02"`.
fn decode_bytes(text: &str) -> Result<Vec<u8>, hex::FromHexError> {
    let digits: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    hex::decode(digits)
}

/// Narrows a component flag to its native width. Values that fit are range
/// checked by the library.
fn component<T: TryFrom<i64>>(field: Field, value: Option<i64>) -> Result<Option<T>, Error> {
    value
        .map(|value| {
            T::try_from(value).map_err(|_| Error::OutOfRange {
                field,
                value: i128::from(value),
            })
        })
        .transpose()
}
