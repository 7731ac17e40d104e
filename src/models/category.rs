//! Category models
//!
//! Every user sees the built-in default categories plus any custom ones they
//! have added. Only the custom ones are stored.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::storage::Record;

/// Categories every user starts with, in display order
pub const DEFAULT_CATEGORIES: &[&str] = &[
    "Food",
    "Transport",
    "Bills",
    "Shopping",
    "Health",
    "Entertainment",
    "Salary",
    "Other",
];

/// Fallback category when nothing more specific applies
pub const FALLBACK_CATEGORY: &str = "Other";

/// Check whether a name is one of the built-in categories (case-insensitive)
pub fn is_default_category(name: &str) -> bool {
    DEFAULT_CATEGORIES
        .iter()
        .any(|d| d.eq_ignore_ascii_case(name.trim()))
}

/// A user-defined category tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomCategory {
    pub username: String,
    pub name: String,
}

impl CustomCategory {
    /// Create a new custom category
    pub fn new(username: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            name: name.into(),
        }
    }

    /// Validate the category
    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(CategoryValidationError::EmptyName);
        }

        if name.chars().count() > 50 {
            return Err(CategoryValidationError::NameTooLong(name.chars().count()));
        }

        Ok(())
    }
}

impl Record for CustomCategory {
    const TABLE: &'static str = "categories";
    const COLUMNS: &'static [&'static str] = &["username", "name"];

    fn username(&self) -> &str {
        &self.username
    }
}

impl fmt::Display for CustomCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Merge the defaults with a user's custom categories
///
/// Defaults come first, then custom names in insertion order. Names are
/// de-duplicated case-insensitively, keeping the first spelling seen.
pub fn merge_categories(custom: &[CustomCategory]) -> Vec<String> {
    let mut merged: Vec<String> = DEFAULT_CATEGORIES.iter().map(|s| s.to_string()).collect();

    for category in custom {
        let name = category.name.trim();
        if !merged.iter().any(|m| m.eq_ignore_ascii_case(name)) {
            merged.push(name.to_string());
        }
    }

    merged
}

/// Validation errors for categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    EmptyName,
    NameTooLong(usize),
}

impl fmt::Display for CategoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Category name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Category name too long ({} chars, max 50)", len)
            }
        }
    }
}

impl std::error::Error for CategoryValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_default_category() {
        assert!(is_default_category("food"));
        assert!(is_default_category(" Other "));
        assert!(!is_default_category("Gym"));
    }

    #[test]
    fn test_merge_keeps_defaults_first() {
        let custom = vec![
            CustomCategory::new("kasun", "Gym"),
            CustomCategory::new("kasun", "FOOD"),
            CustomCategory::new("kasun", "gym"),
            CustomCategory::new("kasun", "පොත්"),
        ];

        let merged = merge_categories(&custom);
        assert_eq!(merged.len(), DEFAULT_CATEGORIES.len() + 2);
        assert_eq!(merged[0], "Food");
        assert_eq!(merged[DEFAULT_CATEGORIES.len()], "Gym");
        assert_eq!(merged[DEFAULT_CATEGORIES.len() + 1], "පොත්");
    }

    #[test]
    fn test_validate() {
        assert_eq!(
            CustomCategory::new("kasun", " ").validate(),
            Err(CategoryValidationError::EmptyName)
        );
        let long = "x".repeat(51);
        assert_eq!(
            CustomCategory::new("kasun", long).validate(),
            Err(CategoryValidationError::NameTooLong(51))
        );
    }
}
