use crate::{ContentType, Glyph, Result};

/// Anything that can mint a fresh glyph for a scope.
///
/// Implemented by [`crate::ScopedAllocator`]; persistence glue such as
/// [`crate::GlyphField::pre_save`] only depends on this trait, so tests can
/// substitute a deterministic issuer.
pub trait Issuer {
    /// Issues the next glyph for `content_type`.
    ///
    /// # Errors
    ///
    /// Implementation defined. The allocator fails with
    /// [`crate::Error::OutOfRange`] when its clock lies outside the glyph
    /// window, and with [`crate::Error::LockPoisoned`] on a poisoned std lock.
    fn issue(&self, content_type: ContentType) -> Result<Glyph>;
}

impl<I: Issuer + ?Sized> Issuer for &I {
    fn issue(&self, content_type: ContentType) -> Result<Glyph> {
        (**self).issue(content_type)
    }
}

impl<I: Issuer + ?Sized> Issuer for std::sync::Arc<I> {
    fn issue(&self, content_type: ContentType) -> Result<Glyph> {
        (**self).issue(content_type)
    }
}
