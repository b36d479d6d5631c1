//! Filter conditions for row store queries.

use std::cmp::Ordering;

use regex::RegexBuilder;

use crate::model::Row;
use crate::model::Value;

/// A filter condition for selecting rows.
///
/// Filters can be combined using logical operators (`And`, `Or`, `Not`) to
/// build complex conditions. Store implementations either translate them to
/// their native query language or evaluate them with [`Filter::matches`].
///
/// # Example
///
/// ```
/// use tabula_lib::store::query::Filter;
///
/// // Simple equality filter
/// let filter = Filter::eq("status", "active");
///
/// // Range plus pattern
/// let filter = Filter::and([
///     Filter::ge("quantity", 10i64),
///     Filter::ilike("name", "%bolt%"),
/// ]);
///
/// // Using combinators
/// let filter = Filter::eq("status", "active")
///     .and_also(Filter::lt("quantity", 5i64));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Equality: `field = value`
    Eq(String, Value),
    /// Not equal: `field <> value`
    Ne(String, Value),
    /// Greater than: `field > value`
    Gt(String, Value),
    /// Greater than or equal: `field >= value`
    Ge(String, Value),
    /// Less than: `field < value`
    Lt(String, Value),
    /// Less than or equal: `field <= value`
    Le(String, Value),
    /// Membership: `field in (values)`
    In(String, Vec<Value>),
    /// Case-sensitive pattern, `%` matches any run and `_` any single character.
    Like(String, String),
    /// Case-insensitive variant of [`Filter::Like`].
    ILike(String, String),
    /// Is null (or absent).
    IsNull(String),
    /// Is not null.
    IsNotNull(String),
    /// Logical AND of multiple filters.
    And(Vec<Filter>),
    /// Logical OR of multiple filters.
    Or(Vec<Filter>),
    /// Negation.
    Not(Box<Filter>),
}

impl Filter {
    /// Creates an equality filter.
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Eq(field.into(), value.into())
    }

    /// Creates a not-equal filter.
    pub fn ne(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Ne(field.into(), value.into())
    }

    /// Creates a greater-than filter.
    pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Gt(field.into(), value.into())
    }

    /// Creates a greater-than-or-equal filter.
    pub fn ge(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Ge(field.into(), value.into())
    }

    /// Creates a less-than filter.
    pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Lt(field.into(), value.into())
    }

    /// Creates a less-than-or-equal filter.
    pub fn le(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Le(field.into(), value.into())
    }

    /// Creates a membership filter.
    pub fn is_in<V: Into<Value>>(field: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
        Filter::In(field.into(), values.into_iter().map(Into::into).collect())
    }

    /// Creates a case-sensitive pattern filter.
    pub fn like(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        Filter::Like(field.into(), pattern.into())
    }

    /// Creates a case-insensitive pattern filter.
    pub fn ilike(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        Filter::ILike(field.into(), pattern.into())
    }

    /// Case-insensitive substring match. Pattern characters in `text` are literal.
    pub fn contains(field: impl Into<String>, text: &str) -> Self {
        Filter::ILike(field.into(), format!("%{}%", escape_pattern(text)))
    }

    /// Case-insensitive prefix match.
    pub fn starts_with(field: impl Into<String>, text: &str) -> Self {
        Filter::ILike(field.into(), format!("{}%", escape_pattern(text)))
    }

    /// Case-insensitive suffix match.
    pub fn ends_with(field: impl Into<String>, text: &str) -> Self {
        Filter::ILike(field.into(), format!("%{}", escape_pattern(text)))
    }

    /// Creates an is-null filter.
    pub fn is_null(field: impl Into<String>) -> Self {
        Filter::IsNull(field.into())
    }

    /// Creates an is-not-null filter.
    pub fn is_not_null(field: impl Into<String>) -> Self {
        Filter::IsNotNull(field.into())
    }

    /// Creates a logical AND of multiple filters.
    pub fn and(filters: impl IntoIterator<Item = Filter>) -> Self {
        Filter::And(filters.into_iter().collect())
    }

    /// Creates a logical OR of multiple filters.
    pub fn or(filters: impl IntoIterator<Item = Filter>) -> Self {
        Filter::Or(filters.into_iter().collect())
    }

    /// Negates this filter.
    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Filter::Not(Box::new(self))
    }

    /// Combines this filter with another using logical AND.
    pub fn and_also(self, other: Filter) -> Self {
        match self {
            Filter::And(mut filters) => {
                filters.push(other);
                Filter::And(filters)
            }
            _ => Filter::And(vec![self, other]),
        }
    }

    /// Combines this filter with another using logical OR.
    pub fn or_else(self, other: Filter) -> Self {
        match self {
            Filter::Or(mut filters) => {
                filters.push(other);
                Filter::Or(filters)
            }
            _ => Filter::Or(vec![self, other]),
        }
    }

    /// Evaluates the filter against a row.
    ///
    /// Comparisons against null or absent fields never match, the same as
    /// SQL three-valued logic collapsed to `false`.
    pub fn matches(&self, row: &Row) -> bool {
        match self {
            Filter::Eq(field, value) => compare(row, field, value) == Some(Ordering::Equal),
            Filter::Ne(field, value) => {
                matches!(compare(row, field, value), Some(o) if o != Ordering::Equal)
            }
            Filter::Gt(field, value) => compare(row, field, value) == Some(Ordering::Greater),
            Filter::Ge(field, value) => {
                matches!(compare(row, field, value), Some(Ordering::Greater | Ordering::Equal))
            }
            Filter::Lt(field, value) => compare(row, field, value) == Some(Ordering::Less),
            Filter::Le(field, value) => {
                matches!(compare(row, field, value), Some(Ordering::Less | Ordering::Equal))
            }
            Filter::In(field, values) => values
                .iter()
                .any(|v| compare(row, field, v) == Some(Ordering::Equal)),
            Filter::Like(field, pattern) => pattern_matches(row, field, pattern, false),
            Filter::ILike(field, pattern) => pattern_matches(row, field, pattern, true),
            Filter::IsNull(field) => row.get(field).is_none_or(Value::is_null),
            Filter::IsNotNull(field) => row.get(field).is_some_and(|v| !v.is_null()),
            Filter::And(filters) => filters.iter().all(|f| f.matches(row)),
            Filter::Or(filters) => filters.iter().any(|f| f.matches(row)),
            Filter::Not(inner) => !inner.matches(row),
        }
    }
}

fn compare(row: &Row, field: &str, value: &Value) -> Option<Ordering> {
    row.get(field)?.compare(value)
}

fn pattern_matches(row: &Row, field: &str, pattern: &str, case_insensitive: bool) -> bool {
    let Some(value) = row.get(field).filter(|v| !v.is_null()) else {
        return false;
    };

    let mut re = String::with_capacity(pattern.len() + 2);
    re.push('^');
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        match c {
            '%' => re.push_str(".*"),
            '_' => re.push('.'),
            '\\' => {
                if let Some(next) = chars.next() {
                    re.push_str(&regex::escape(next.encode_utf8(&mut [0; 4])));
                }
            }
            c => re.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
        }
    }
    re.push('$');

    match RegexBuilder::new(&re)
        .case_insensitive(case_insensitive)
        .dot_matches_new_line(true)
        .build()
    {
        Ok(re) => re.is_match(&value.to_display_string()),
        Err(_) => false,
    }
}

/// Escapes `%`, `_` and `\\` so they match literally inside a pattern.
fn escape_pattern(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
