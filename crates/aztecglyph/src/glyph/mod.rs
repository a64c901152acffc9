mod components;
mod formatter;
#[allow(clippy::module_inception)]
mod glyph;
mod input;

pub use components::*;
pub use formatter::*;
pub use glyph::*;
pub use input::*;
