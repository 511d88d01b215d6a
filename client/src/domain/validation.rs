//! Field-level validation primitives shared by the form schemas.
//!
//! Validation is synchronous and runs before any call to the data service.
//! Failures are collected per field so forms can render every inline message
//! at once.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};

use super::DomainError;

/// One inline message attached to a form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    field: &'static str,
    message: String,
}

impl FieldError {
    /// Name of the field, matching the form's field identifier.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        self.field
    }

    /// Message shown next to the field.
    #[must_use]
    pub const fn message(&self) -> &str {
        self.message.as_str()
    }
}

/// Ordered set of inline messages keyed by field name.
///
/// ## Invariants
/// - At most one message per field; the first recorded message wins.
/// - Iteration order follows the order in which fields were checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    /// Empty error set.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Record `message` for `field` unless the field already has one.
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        if self.get(field).is_none() {
            self.0.push(FieldError {
                field,
                message: message.into(),
            });
        }
    }

    /// Message for `field`, if it failed.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|error| error.field == field)
            .map(FieldError::message)
    }

    /// True when every field passed.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of failing fields.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate failures in check order.
    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// Names of failing fields in check order.
    #[must_use]
    pub fn fields(&self) -> Vec<&'static str> {
        self.0.iter().map(FieldError::field).collect()
    }

    /// Return `value` when no field failed, otherwise `self`.
    ///
    /// # Errors
    ///
    /// Returns the collected errors when at least one field failed.
    pub fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }

    /// JSON object mapping field names to messages.
    #[must_use]
    pub fn to_details(&self) -> Value {
        let map = self
            .0
            .iter()
            .map(|error| (error.field.to_owned(), Value::String(error.message.clone())))
            .collect::<Map<String, Value>>();
        Value::Object(map)
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for error in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", error.field, error.message)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

impl From<FieldErrors> for DomainError {
    fn from(value: FieldErrors) -> Self {
        let details = value.to_details();
        Self::invalid_request("Please correct the highlighted fields").with_details(details)
    }
}

/// True when `value` holds at least `min` Unicode scalar values.
#[must_use]
pub fn has_min_chars(value: &str, min: usize) -> bool {
    value.chars().count() >= min
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        let pattern = r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9](?:[A-Za-z0-9\-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9\-]*[A-Za-z0-9])?)*\.[A-Za-z]{2,}$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// True when `value` looks like `local@domain.tld`.
#[must_use]
pub fn is_email_shaped(value: &str) -> bool {
    email_regex().is_match(value)
}

/// Trimmed value, or `None` when blank.
#[must_use]
pub fn optional_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

#[cfg(test)]
mod tests {
    //! Validation primitive coverage.

    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("ada@example.com", true)]
    #[case("ada.lovelace+teams@mail.example.co.uk", true)]
    #[case("ada@example", false)]
    #[case("ada example.com", false)]
    #[case("@example.com", false)]
    #[case("ada@-example.com", false)]
    #[case("", false)]
    fn recognises_email_shape(#[case] value: &str, #[case] expected: bool) {
        assert_eq!(is_email_shaped(value), expected);
    }

    #[rstest]
    fn counts_characters_not_bytes() {
        assert!(has_min_chars("ééééé", 5));
        assert!(!has_min_chars("éééé", 5));
    }

    #[rstest]
    #[case("", None)]
    #[case("   ", None)]
    #[case(" https://ada.dev ", Some("https://ada.dev"))]
    fn optional_text_drops_blank_values(#[case] value: &str, #[case] expected: Option<&str>) {
        assert_eq!(optional_text(value).as_deref(), expected);
    }

    #[rstest]
    fn keeps_first_message_per_field() {
        let mut errors = FieldErrors::new();
        errors.push("email", "Email is required");
        errors.push("email", "Please enter a valid email address");
        errors.push("motivation", "too short");

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("email"), Some("Email is required"));
        assert_eq!(errors.fields(), vec!["email", "motivation"]);
    }

    #[rstest]
    fn converts_into_domain_error_with_details() {
        let mut errors = FieldErrors::new();
        errors.push("title", "Title must be at least 3 characters");

        let error = DomainError::from(errors);
        assert_eq!(error.code(), crate::domain::ErrorCode::InvalidRequest);
        assert_eq!(
            error.details(),
            Some(&json!({"title": "Title must be at least 3 characters"}))
        );
    }
}
