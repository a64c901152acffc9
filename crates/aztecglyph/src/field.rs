use crate::{ContentType, ContentTypes, Error, Glyph, Issuer, Result};

/// A write-once glyph slot on a persisted record.
///
/// Storage adapters keep the glyph in a fixed-width text column
/// ([`GlyphField::DB_TYPE`]) holding its base58 form. A primary-key slot
/// that is still empty when the record is first saved receives a freshly
/// issued glyph in [`GlyphField::pre_save`]. Once set, the value can not be
/// replaced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct GlyphField {
    value: Option<Glyph>,
    primary_key: bool,
}

impl GlyphField {
    /// Column type of the base58 form.
    pub const DB_TYPE: &'static str = "char(11)";
    pub const MAX_LENGTH: usize = Glyph::STRING_LEN;

    /// An empty, non-key slot.
    pub const fn new() -> Self {
        Self {
            value: None,
            primary_key: false,
        }
    }

    /// An empty primary-key slot, filled on first save.
    pub const fn primary_key() -> Self {
        Self {
            value: None,
            primary_key: true,
        }
    }

    /// A slot that already holds `glyph`.
    #[must_use]
    pub const fn with_value(mut self, glyph: Glyph) -> Self {
        self.value = Some(glyph);
        self
    }

    pub const fn value(&self) -> Option<Glyph> {
        self.value
    }

    pub const fn is_primary_key(&self) -> bool {
        self.primary_key
    }

    pub const fn is_set(&self) -> bool {
        self.value.is_some()
    }

    /// Loads the column value. `NULL` and the empty string leave an empty
    /// slot empty. Loading the glyph the slot already holds is a no-op.
    ///
    /// # Errors
    ///
    /// Any error of [`Glyph::from_base58`], or [`Error::ImmutableValue`] if
    /// the slot holds a glyph and the column is unset or differs.
    pub fn from_db_value(&mut self, column: Option<&str>) -> Result<()> {
        let loaded = match column {
            None | Some("") => None,
            Some(text) => Some(Glyph::from_base58(text)?),
        };
        match (self.value, loaded) {
            (Some(current), Some(glyph)) if current == glyph => Ok(()),
            (Some(_), _) => Err(Error::ImmutableValue),
            (None, loaded) => {
                self.value = loaded;
                Ok(())
            }
        }
    }

    /// The column value: the base58 form, or `None` for `NULL`.
    pub fn to_db_value(&self) -> Option<String> {
        self.value.map(|glyph| glyph.to_base58())
    }

    /// Stores `glyph`. Setting the value the slot already holds is a no-op.
    ///
    /// # Errors
    ///
    /// [`Error::ImmutableValue`] if the slot holds a different glyph.
    pub fn set(&mut self, glyph: Glyph) -> Result<()> {
        match self.value {
            Some(current) if current != glyph => Err(Error::ImmutableValue),
            _ => {
                self.value = Some(glyph);
                Ok(())
            }
        }
    }

    /// Issues a glyph into an empty primary-key slot. Returns the newly
    /// issued glyph, or `None` when the slot was left unchanged.
    ///
    /// # Errors
    ///
    /// Any error of the issuer.
    pub fn pre_save<I: Issuer + ?Sized>(
        &mut self,
        issuer: &I,
        content_type: ContentType,
    ) -> Result<Option<Glyph>> {
        if !self.primary_key || self.value.is_some() {
            return Ok(None);
        }
        let glyph = issuer.issue(content_type)?;
        self.value = Some(glyph);
        Ok(Some(glyph))
    }
}

/// A persisted record type carrying a [`GlyphField`].
pub trait Model {
    /// Stable name of the record type, e.g. `"app_label.model"`. Used as the
    /// [`ContentTypes`] key.
    const MODEL_NAME: &'static str;

    fn glyph_field(&self) -> &GlyphField;

    fn glyph_field_mut(&mut self) -> &mut GlyphField;
}

/// Runs the insertion hook for `record`: resolves its content type through
/// `registry` and fills its glyph slot if it is an empty primary key.
///
/// # Errors
///
/// Any error of the registry or the issuer.
///
/// # Example
/// ```
/// use aztecglyph::{ContentTypes, GlyphField, Model, ScopedAllocator, assign_on_insert};
///
/// struct Post {
///     id: GlyphField,
/// }
///
/// impl Model for Post {
///     const MODEL_NAME: &'static str = "blog.post";
///
///     fn glyph_field(&self) -> &GlyphField {
///         &self.id
///     }
///
///     fn glyph_field_mut(&mut self) -> &mut GlyphField {
///         &mut self.id
///     }
/// }
///
/// let registry = ContentTypes::new();
/// let allocator = ScopedAllocator::new();
/// let mut post = Post { id: GlyphField::primary_key() };
///
/// let glyph = assign_on_insert(&mut post, &registry, &allocator).unwrap().unwrap();
/// assert_eq!(post.id.value(), Some(glyph));
/// assert_eq!(post.id.to_db_value().unwrap().len(), GlyphField::MAX_LENGTH);
/// ```
pub fn assign_on_insert<M, I>(
    record: &mut M,
    registry: &ContentTypes,
    issuer: &I,
) -> Result<Option<Glyph>>
where
    M: Model,
    I: Issuer + ?Sized,
{
    let field = record.glyph_field();
    if !field.is_primary_key() || field.is_set() {
        return Ok(None);
    }
    let content_type = registry.for_model::<M>()?;
    let issued = record.glyph_field_mut().pre_save(issuer, content_type)?;

    #[cfg(feature = "tracing")]
    {
        if let Some(glyph) = issued {
            tracing::debug!(model = M::MODEL_NAME, %content_type, %glyph, "assigned glyph on insert");
        }
    }

    Ok(issued)
}
