//! Collection name

/// The name of a collection (table) in the row store.
///
/// # Example
///
/// ```
/// use tabula_lib::model::Collection;
///
/// let products = Collection::new("products");
/// assert_eq!(products.name(), "products");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Collection(String);

impl Collection {
    /// Creates a collection reference from its name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the collection name.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Collection {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Collection {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
