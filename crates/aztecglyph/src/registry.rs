use std::collections::HashMap;

use crate::{
    ContentType, Error, Field, Glyph, Model, Result,
    mutex::{self, RwLock},
};

#[derive(Debug, Default)]
struct Registry {
    by_name: HashMap<String, ContentType>,
    by_tag: HashMap<ContentType, String>,
    next_free: u16,
}

impl Registry {
    fn bind(&mut self, name: &str, content_type: ContentType) {
        self.by_name.insert(name.to_owned(), content_type);
        self.by_tag.insert(content_type, name.to_owned());
    }

    fn lowest_free(&mut self) -> Option<ContentType> {
        while self.next_free <= Glyph::MAX_CONTENT_TYPE {
            let candidate = ContentType::new(self.next_free).ok()?;
            if !self.by_tag.contains_key(&candidate) {
                return Some(candidate);
            }
            self.next_free += 1;
        }
        None
    }
}

/// Maps stable entity-category names (model or table names) to
/// [`ContentType`] tags.
///
/// Each name is bound to exactly one tag and each tag to exactly one name, so
/// the allocator scopes derived from it never collide. Names can be bound
/// explicitly with [`ContentTypes::register`], or on first use with
/// [`ContentTypes::get_or_assign`], which hands out the lowest free tag.
///
/// # Example
/// ```
/// use aztecglyph::{ContentType, ContentTypes};
///
/// let registry = ContentTypes::new();
/// registry.register("blog.post", ContentType::new(1).unwrap()).unwrap();
///
/// assert_eq!(registry.get_or_assign("blog.post").unwrap().get(), 1);
/// assert_eq!(registry.get_or_assign("blog.comment").unwrap().get(), 0);
/// assert_eq!(registry.get_or_assign("auth.user").unwrap().get(), 2);
/// ```
#[derive(Debug, Default)]
pub struct ContentTypes {
    inner: RwLock<Registry>,
}

impl ContentTypes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name` to `content_type`. Registering the same pair twice is a
    /// no-op.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArguments`] if `name` is bound to another tag, or
    /// `content_type` to another name.
    pub fn register(&self, name: &str, content_type: ContentType) -> Result<()> {
        let mut registry = mutex::write(&self.inner)?;
        if let Some(&bound) = registry.by_name.get(name) {
            if bound == content_type {
                return Ok(());
            }
            return Err(Error::invalid_arguments(format!(
                "{name:?} is already bound to content type {bound}"
            )));
        }
        if let Some(owner) = registry.by_tag.get(&content_type) {
            return Err(Error::invalid_arguments(format!(
                "content type {content_type} is already bound to {owner:?}"
            )));
        }
        registry.bind(name, content_type);
        Ok(())
    }

    /// The tag bound to `name`, if any.
    ///
    /// # Errors
    ///
    /// [`Error::LockPoisoned`] on a poisoned std lock.
    pub fn get(&self, name: &str) -> Result<Option<ContentType>> {
        Ok(mutex::read(&self.inner)?.by_name.get(name).copied())
    }

    /// The name bound to `content_type`, if any.
    ///
    /// # Errors
    ///
    /// [`Error::LockPoisoned`] on a poisoned std lock.
    pub fn name_of(&self, content_type: ContentType) -> Result<Option<String>> {
        Ok(mutex::read(&self.inner)?.by_tag.get(&content_type).cloned())
    }

    /// Returns the tag bound to `name`, binding the lowest free tag first if
    /// there is none.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfRange`] once all 4096 tags are bound.
    pub fn get_or_assign(&self, name: &str) -> Result<ContentType> {
        if let Some(bound) = self.get(name)? {
            return Ok(bound);
        }

        let mut registry = mutex::write(&self.inner)?;
        // Another thread may have bound it between the two locks.
        if let Some(&bound) = registry.by_name.get(name) {
            return Ok(bound);
        }
        let content_type = registry.lowest_free().ok_or_else(|| {
            Error::out_of_range(Field::ContentType, Glyph::MAX_CONTENT_TYPE + 1)
        })?;
        registry.bind(name, content_type);

        #[cfg(feature = "tracing")]
        tracing::debug!(name, %content_type, "assigned content type");

        Ok(content_type)
    }

    /// [`ContentTypes::get_or_assign`] keyed by [`Model::MODEL_NAME`].
    ///
    /// # Errors
    ///
    /// See [`ContentTypes::get_or_assign`].
    pub fn for_model<M: Model + ?Sized>(&self) -> Result<ContentType> {
        self.get_or_assign(M::MODEL_NAME)
    }

    /// Number of bound names.
    ///
    /// # Errors
    ///
    /// [`Error::LockPoisoned`] on a poisoned std lock.
    pub fn len(&self) -> Result<usize> {
        Ok(mutex::read(&self.inner)?.by_name.len())
    }

    /// # Errors
    ///
    /// [`Error::LockPoisoned`] on a poisoned std lock.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GlyphField;

    fn ct(tag: u16) -> ContentType {
        ContentType::new(tag).unwrap()
    }

    #[test]
    fn register_binds_both_ways() {
        let registry = ContentTypes::new();
        registry.register("blog.post", ct(10)).unwrap();
        assert_eq!(registry.get("blog.post").unwrap(), Some(ct(10)));
        assert_eq!(registry.name_of(ct(10)).unwrap().as_deref(), Some("blog.post"));
        // same pair again is fine
        registry.register("blog.post", ct(10)).unwrap();
        assert_eq!(registry.len().unwrap(), 1);
    }

    #[test]
    fn register_rejects_conflicts() {
        let registry = ContentTypes::new();
        registry.register("blog.post", ct(10)).unwrap();
        assert!(matches!(
            registry.register("blog.post", ct(11)),
            Err(Error::InvalidArguments { .. })
        ));
        assert!(matches!(
            registry.register("blog.comment", ct(10)),
            Err(Error::InvalidArguments { .. })
        ));
    }

    #[test]
    fn get_or_assign_is_stable_and_skips_bound_tags() {
        let registry = ContentTypes::new();
        registry.register("pinned", ct(1)).unwrap();

        let a = registry.get_or_assign("a").unwrap();
        let b = registry.get_or_assign("b").unwrap();
        assert_eq!(a, ct(0));
        assert_eq!(b, ct(2));
        assert_eq!(registry.get_or_assign("a").unwrap(), a);
        assert!(!registry.is_empty().unwrap());
    }

    #[test]
    fn get_or_assign_reports_exhaustion() {
        let registry = ContentTypes::new();
        for i in 0..=Glyph::MAX_CONTENT_TYPE {
            registry.get_or_assign(&format!("model{i}")).unwrap();
        }
        assert_eq!(
            registry.get_or_assign("one.too.many").unwrap_err(),
            Error::OutOfRange {
                field: Field::ContentType,
                value: 4096
            }
        );
    }

    #[test]
    fn for_model_uses_model_name() {
        struct Post {
            id: GlyphField,
        }

        impl Model for Post {
            const MODEL_NAME: &'static str = "blog.post";

            fn glyph_field(&self) -> &GlyphField {
                &self.id
            }

            fn glyph_field_mut(&mut self) -> &mut GlyphField {
                &mut self.id
            }
        }

        let registry = ContentTypes::new();
        registry.register("blog.post", ct(42)).unwrap();
        assert_eq!(registry.for_model::<Post>().unwrap(), ct(42));
    }
}
