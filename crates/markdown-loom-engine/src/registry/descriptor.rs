use std::{borrow::Cow, fmt, sync::Arc};

/// A contributed behaviour with an identity and ordering constraints.
///
/// `before` and `after` name other descriptors of the same kind. Constraints
/// are only hints for the resolver; the behaviour itself never sees them.
pub struct Descriptor<T: ?Sized> {
    id: Cow<'static, str>,
    before: Vec<Cow<'static, str>>,
    after: Vec<Cow<'static, str>>,
    item: Arc<T>,
}

impl<T: ?Sized> Descriptor<T> {
    pub fn new(id: impl Into<Cow<'static, str>>, item: Arc<T>) -> Self {
        Self {
            id: id.into(),
            before: Vec::new(),
            after: Vec::new(),
            item,
        }
    }

    /// Requires this descriptor to be ordered before `id`.
    pub fn before(&mut self, id: impl Into<Cow<'static, str>>) -> &mut Self {
        self.before.push(id.into());
        self
    }

    /// Requires this descriptor to be ordered after `id`.
    pub fn after(&mut self, id: impl Into<Cow<'static, str>>) -> &mut Self {
        self.after.push(id.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn before_ids(&self) -> impl Iterator<Item = &str> {
        self.before.iter().map(|id| id.as_ref())
    }

    pub fn after_ids(&self) -> impl Iterator<Item = &str> {
        self.after.iter().map(|id| id.as_ref())
    }

    pub fn item(&self) -> &Arc<T> {
        &self.item
    }
}

impl<T: ?Sized> Clone for Descriptor<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            before: self.before.clone(),
            after: self.after.clone(),
            item: Arc::clone(&self.item),
        }
    }
}

impl<T: ?Sized> fmt::Debug for Descriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Descriptor")
            .field("id", &self.id)
            .field("before", &self.before)
            .field("after", &self.after)
            .finish_non_exhaustive()
    }
}
