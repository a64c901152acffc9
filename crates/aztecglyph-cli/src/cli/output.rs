use std::io::Write;

use aztecglyph::{Glyph, ScopedAllocator, as_hex, as_native};
use serde::Serialize;

use super::config::{CliConfig, Format, Mode};

/// Every representation and component of one glyph, for `--format json`.
#[derive(Serialize)]
struct GlyphView {
    string: Glyph,
    #[serde(with = "as_hex")]
    hex: Glyph,
    #[serde(with = "as_native")]
    int: Glyph,
    timestamp_millis: u64,
    datetime: String,
    counter: u16,
    content_type: u16,
}

impl From<Glyph> for GlyphView {
    fn from(glyph: Glyph) -> Self {
        Self {
            string: glyph,
            hex: glyph,
            int: glyph,
            timestamp_millis: glyph.timestamp_millis(),
            datetime: glyph.datetime().to_rfc3339(),
            counter: glyph.counter(),
            content_type: glyph.content_type(),
        }
    }
}

/// Renders `glyph` as a single line (without the trailing newline).
pub fn render(glyph: Glyph, format: Format) -> anyhow::Result<String> {
    Ok(match format {
        Format::String => glyph.to_base58(),
        Format::Hex => glyph.to_hex(),
        Format::Int => glyph.to_raw().to_string(),
        Format::Json => serde_json::to_string(&GlyphView::from(glyph))?,
        Format::Debug => format!("{glyph:?}"),
    })
}

/// Executes `config`, writing one line per glyph to `out`.
pub fn run(config: &CliConfig, out: &mut impl Write) -> anyhow::Result<()> {
    match &config.mode {
        Mode::Decode(input) => {
            let glyph = input.resolve()?;
            tracing::debug!(%glyph, "resolved glyph");
            writeln!(out, "{}", render(glyph, config.format)?)?;
        }
        Mode::Issue {
            content_type,
            count,
        } => {
            let allocator = ScopedAllocator::new();
            for _ in 0..*count {
                let glyph = allocator.issue(*content_type)?;
                writeln!(out, "{}", render(glyph, config.format)?)?;
            }
            tracing::debug!(%content_type, count, "issued glyphs");
        }
    }
    Ok(())
}
