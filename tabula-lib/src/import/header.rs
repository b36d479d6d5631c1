//! Header normalization and the external-to-internal header map

/// Normalizes a header for comparison.
///
/// Strips a leading byte-order mark, turns non-breaking spaces (the U+00A0
/// character and the literal `&nbsp;` entity) into plain spaces, trims,
/// collapses internal whitespace and lower-cases.
///
/// # Example
///
/// ```
/// use tabula_lib::import::normalize_header;
///
/// assert_eq!(normalize_header("\u{feff} Unit&nbsp;Cost\u{a0} (PHP) "), "unit cost (php)");
/// ```
pub fn normalize_header(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}')
        .to_lowercase()
        .replace("&nbsp;", " ")
        .replace('\u{a0}', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Ordered mapping from spreadsheet headers to field keys.
///
/// Declaration order matters: it decides which mapped fields the admission
/// check looks at, and the first matching alias wins when several external
/// headers point at the same key.
///
/// # Example
///
/// ```
/// use tabula_lib::import::HeaderMap;
///
/// let map = HeaderMap::new()
///     .map("Product Name", "name")
///     .map("Qty", "quantity")
///     .map("Quantity", "quantity");
/// assert_eq!(map.len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    entries: Vec<(String, String)>,
}

/// A file column resolved to a field key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    /// Zero-based column index in the file.
    pub index: usize,
    /// The configured external header that matched.
    pub header: String,
    /// Target field key.
    pub key: String,
}

impl HeaderMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a mapping.
    pub fn map(mut self, external: impl Into<String>, key: impl Into<String>) -> Self {
        self.entries.push((external.into(), key.into()));
        self
    }

    /// Returns the configured `(external, key)` pairs in declaration order.
    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Matches file headers against the map.
    ///
    /// Each configured header takes the first file column with the same
    /// normalized text. Configured headers without a column are returned in
    /// the second list. A key that already has a column is not mapped twice.
    pub fn resolve(&self, file_headers: &[String]) -> (Vec<ColumnMapping>, Vec<String>) {
        let normalized: Vec<String> = file_headers.iter().map(|h| normalize_header(h)).collect();
        let mut mapped: Vec<ColumnMapping> = Vec::new();
        let mut unmatched = Vec::new();

        for (external, key) in &self.entries {
            if mapped.iter().any(|m| &m.key == key) {
                continue;
            }
            let wanted = normalize_header(external);
            match normalized.iter().position(|h| *h == wanted) {
                Some(index) => mapped.push(ColumnMapping {
                    index,
                    header: external.clone(),
                    key: key.clone(),
                }),
                None => unmatched.push(external.clone()),
            }
        }

        (mapped, unmatched)
    }
}

impl<E, K> FromIterator<(E, K)> for HeaderMap
where
    E: Into<String>,
    K: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (E, K)>>(iter: T) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(external, key)| (external.into(), key.into()))
                .collect(),
        }
    }
}
