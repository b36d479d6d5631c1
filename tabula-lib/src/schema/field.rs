//! Field declarations

use std::fmt;
use std::sync::Arc;

use crate::error::FieldValidationError;
use crate::model::Value;

/// Type alias for custom validation rule closures.
type Rule = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// The primitive kind of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Free text.
    Text,
    /// Whole number.
    Integer,
    /// Decimal number with preserved scale.
    Decimal,
    /// One value out of a fixed set of display values.
    Choice,
    /// Point in time.
    Timestamp,
}

impl FieldKind {
    /// Returns `true` for integer and decimal kinds.
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Integer | Self::Decimal)
    }

    /// Returns `true` if a value of the given variant is acceptable for this kind.
    fn accepts(self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Null) => true,
            (Self::Text | Self::Choice, Value::Text(_)) => true,
            (Self::Integer, Value::Int(_)) => true,
            (Self::Decimal, Value::Int(_) | Value::Decimal(_)) => true,
            (Self::Timestamp, Value::Timestamp(_)) => true,
            _ => false,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Decimal => "decimal",
            Self::Choice => "choice",
            Self::Timestamp => "timestamp",
        };
        f.write_str(name)
    }
}

/// One field of a [`FieldSchema`](super::FieldSchema).
#[derive(Clone)]
pub struct Field {
    /// Storage key, unique within the schema.
    pub key: String,
    /// Display label.
    pub label: String,
    /// Primitive kind.
    pub kind: FieldKind,
    /// Allowed display values, in order. Only used by [`FieldKind::Choice`].
    pub choices: Vec<String>,
    /// Whether a non-null value is required.
    pub required: bool,
    /// Value used when a row leaves this field empty.
    pub default_value: Option<Value>,
    rules: Vec<(Rule, String)>,
}

impl Field {
    /// Creates an optional field with no default.
    pub fn new(key: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            kind,
            choices: Vec::new(),
            required: false,
            default_value: None,
            rules: Vec::new(),
        }
    }

    /// Marks the field as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the default value.
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Sets the allowed choices.
    pub fn choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.choices = choices.into_iter().map(Into::into).collect();
        self
    }

    /// Adds a custom rule. The predicate only sees non-null values.
    ///
    /// # Example
    ///
    /// ```
    /// use tabula_lib::model::Value;
    /// use tabula_lib::schema::{Field, FieldKind};
    ///
    /// let qty = Field::new("quantity", "Qty", FieldKind::Integer)
    ///     .rule(|v| matches!(v, Value::Int(n) if *n >= 0), "Quantity cannot be negative");
    ///
    /// assert!(qty.check(&Value::Int(-1)).is_err());
    /// ```
    pub fn rule<F>(mut self, predicate: F, msg: impl Into<String>) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.rules.push((Arc::new(predicate), msg.into()));
        self
    }

    /// Checks a single value against this field's declared rules.
    ///
    /// Stops at the first failure.
    pub fn check(&self, value: &Value) -> Result<(), FieldValidationError> {
        if value.is_blank() {
            if self.required {
                return Err(FieldValidationError::with_code(
                    &self.key,
                    format!("{} is required", self.label),
                    "required",
                ));
            }
            return Ok(());
        }

        if !self.kind.accepts(value) {
            return Err(FieldValidationError::with_code(
                &self.key,
                format!("{} must be a {} value, got {}", self.label, self.kind, value.type_name()),
                "kind",
            ));
        }

        if self.kind == FieldKind::Choice {
            let text = value.as_text().unwrap_or_default();
            if !self.choices.iter().any(|c| c == text) {
                return Err(FieldValidationError::with_code(
                    &self.key,
                    format!("{} must be one of: {}", self.label, self.choices.join(", ")),
                    "choice",
                ));
            }
        }

        for (rule, msg) in &self.rules {
            if !rule(value) {
                return Err(FieldValidationError::with_code(&self.key, msg.clone(), "rule"));
            }
        }

        Ok(())
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("kind", &self.kind)
            .field("choices", &self.choices)
            .field("required", &self.required)
            .field("default_value", &self.default_value)
            .field("rules", &self.rules.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_required_rejects_blank() {
        let field = Field::new("name", "Name", FieldKind::Text).required();
        let err = field.check(&Value::from("  ")).unwrap_err();
        assert_eq!(err.code.as_deref(), Some("required"));
        assert!(field.check(&Value::from("Bolt")).is_ok());
    }

    #[test]
    fn test_optional_accepts_null() {
        let field = Field::new("qty", "Qty", FieldKind::Integer);
        assert!(field.check(&Value::Null).is_ok());
    }

    #[test]
    fn test_decimal_accepts_integer() {
        let field = Field::new("price", "Price", FieldKind::Decimal);
        assert!(field.check(&Value::Int(3)).is_ok());
        assert!(field.check(&Value::Decimal(Decimal::new(310, 2))).is_ok());
        assert!(field.check(&Value::from("3.10")).is_err());
    }

    #[test]
    fn test_choice_membership() {
        let field = Field::new("unit", "Unit", FieldKind::Choice).choices(["pcs", "box"]);
        assert!(field.check(&Value::from("box")).is_ok());
        let err = field.check(&Value::from("crate")).unwrap_err();
        assert_eq!(err.code.as_deref(), Some("choice"));
    }

    #[test]
    fn test_custom_rule_message() {
        let field = Field::new("qty", "Qty", FieldKind::Integer)
            .rule(|v| matches!(v, Value::Int(n) if *n >= 0), "Quantity cannot be negative");
        let err = field.check(&Value::Int(-5)).unwrap_err();
        assert_eq!(err.message, "Quantity cannot be negative");
    }
}
