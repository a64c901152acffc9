//! Compact, time-sortable 64-bit identifiers.
//!
//! A [`Glyph`] packs three fields into a single `u64`:
//!
//! ```text
//!  Bit Index:  63             23 22           12 11                0
//!              +----------------+---------------+------------------+
//!  Field:      | timestamp (41) | counter (11)  | content type (12)|
//!              +----------------+---------------+------------------+
//!              |<----- MSB ---------- 64 bits --------- LSB ------>|
//! ```
//!
//! The timestamp is measured in milliseconds since [`Glyph::EPOCH_MILLIS`]
//! (2020-01-01T00:00:00Z). Its canonical text form is an 11-character base58
//! string that sorts the same way as the underlying integer.
//!
//! A [`ScopedAllocator`] hands out glyphs per content type, keeping a
//! per-millisecond counter so that glyphs issued for the same scope in the
//! same millisecond never collide.
//!
//! ```
//! use aztecglyph::{ContentType, Glyph, ScopedAllocator};
//!
//! let allocator = ScopedAllocator::new();
//! let posts = ContentType::new(7).unwrap();
//!
//! let a = allocator.issue(posts).unwrap();
//! let b = allocator.issue(posts).unwrap();
//! assert!(a < b);
//! assert_eq!(a.content_type(), 7);
//!
//! let parsed: Glyph = a.to_base58().parse().unwrap();
//! assert_eq!(parsed, a);
//! ```

mod allocator;
mod codec;
mod error;
mod field;
mod glyph;
mod mutex;
mod rand;
mod registry;
#[cfg(feature = "serde")]
mod serde;
mod time;

pub use crate::allocator::*;
pub use crate::codec::*;
pub use crate::error::*;
pub use crate::field::*;
pub use crate::glyph::*;
pub use crate::rand::*;
pub use crate::registry::*;
#[cfg(feature = "serde")]
pub use crate::serde::*;
pub use crate::time::*;
