//! Field-level validation for catalog records
//!
//! Validation is an explicit step: the catalog service calls
//! [`Validate::validate`] on every record before handing it to a repository.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use crate::db::{AuthorRecord, BookRecord, CreateAuthor, CreateBook};

/// Maximum length of an author name
pub const AUTHOR_NAME_MAX_LEN: usize = 100;
/// Maximum length of a book title
pub const BOOK_TITLE_MAX_LEN: usize = 255;

pub const TITLE_EMPTY: &str = "Title cannot be empty.";
pub const AUTHOR_EMPTY: &str = "Author cannot be empty.";
pub const NAME_EMPTY: &str = "Name cannot be empty.";
pub const FIELD_REQUIRED: &str = "This field is required.";

/// Field name → messages for every rule a record broke
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Error)]
#[serde(transparent)]
#[error("{}", describe(.fields))]
pub struct ValidationError {
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationError {
    pub fn new() -> Self {
        Self::default()
    }

    /// Error with a single message on one field
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut err = Self::new();
        err.add(field, message);
        err
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &BTreeMap<String, Vec<String>> {
        &self.fields
    }

    /// Flat list of messages, in field order
    pub fn messages(&self) -> Vec<String> {
        self.fields.values().flatten().cloned().collect()
    }

    /// `Ok(())` if nothing was added
    pub fn into_result(self) -> Result<(), ValidationError> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

fn describe(fields: &BTreeMap<String, Vec<String>>) -> String {
    fields
        .iter()
        .map(|(field, messages)| format!("{}: {}", field, messages.join(" ")))
        .collect::<Vec<_>>()
        .join("; ")
}

/// A record that can be checked before persistence
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

fn check_text(
    errors: &mut ValidationError,
    field: &str,
    value: &str,
    empty_message: &str,
    max_len: usize,
) {
    if value.trim().is_empty() {
        errors.add(field, empty_message);
    } else if value.chars().count() > max_len {
        errors.add(
            field,
            format!("Ensure this field has no more than {} characters.", max_len),
        );
    }
}

fn check_author_ref(errors: &mut ValidationError, author_id: i64) {
    if author_id < 1 {
        errors.add("author", AUTHOR_EMPTY);
    }
}

fn validate_book(title: &str, author_id: i64) -> Result<(), ValidationError> {
    let mut errors = ValidationError::new();
    check_text(&mut errors, "title", title, TITLE_EMPTY, BOOK_TITLE_MAX_LEN);
    check_author_ref(&mut errors, author_id);
    errors.into_result()
}

fn validate_author(name: &str) -> Result<(), ValidationError> {
    let mut errors = ValidationError::new();
    check_text(&mut errors, "name", name, NAME_EMPTY, AUTHOR_NAME_MAX_LEN);
    errors.into_result()
}

impl Validate for CreateBook {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_book(&self.title, self.author_id)
    }
}

impl Validate for BookRecord {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_book(&self.title, self.author_id)
    }
}

impl Validate for CreateAuthor {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_author(&self.name)
    }
}

impl Validate for AuthorRecord {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_author(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 5, 1).unwrap()
    }

    fn book(title: &str, author_id: i64) -> CreateBook {
        CreateBook {
            title: title.to_string(),
            author_id,
            published_date: date(),
        }
    }

    #[test]
    fn test_valid_book() {
        assert!(book("T", 1).validate().is_ok());
    }

    #[test]
    fn test_empty_title_rejected() {
        let err = book("", 1).validate().unwrap_err();
        assert_eq!(err.messages(), vec![TITLE_EMPTY.to_string()]);
        assert!(err.fields().contains_key("title"));
    }

    #[test]
    fn test_blank_title_rejected() {
        assert!(book("   ", 1).validate().is_err());
    }

    #[test]
    fn test_missing_author_rejected() {
        let err = book("T", 0).validate().unwrap_err();
        assert_eq!(err.fields()["author"], vec![AUTHOR_EMPTY.to_string()]);
    }

    #[test]
    fn test_both_fields_reported() {
        let err = book("", 0).validate().unwrap_err();
        assert_eq!(err.fields().len(), 2);
        assert_eq!(
            err.to_string(),
            "author: Author cannot be empty.; title: Title cannot be empty."
        );
    }

    #[test]
    fn test_title_length_limit() {
        let long = "x".repeat(BOOK_TITLE_MAX_LEN + 1);
        let err = book(&long, 1).validate().unwrap_err();
        assert_eq!(
            err.messages(),
            vec!["Ensure this field has no more than 255 characters.".to_string()]
        );
        assert!(book(&"x".repeat(BOOK_TITLE_MAX_LEN), 1).validate().is_ok());
    }

    #[test]
    fn test_author_name_rules() {
        let ok = CreateAuthor {
            name: "A. Author".to_string(),
            birth_date: date(),
        };
        assert!(ok.validate().is_ok());

        let empty = CreateAuthor {
            name: String::new(),
            birth_date: date(),
        };
        assert_eq!(
            empty.validate().unwrap_err().messages(),
            vec![NAME_EMPTY.to_string()]
        );
    }

    #[test]
    fn test_serializes_as_field_map() {
        let err = ValidationError::single("title", TITLE_EMPTY);
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json, serde_json::json!({ "title": ["Title cannot be empty."] }));
    }
}
