mod glyph;

pub use glyph::*;
