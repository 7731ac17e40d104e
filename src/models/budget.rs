//! Budget limit model
//!
//! A budget is the single spending limit a user sets for one category. There
//! is at most one row per (username, category); setting it again replaces it.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;
use crate::storage::Record;

/// A spending limit for a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub username: String,
    pub category: String,
    pub limit: Money,
}

impl Budget {
    /// Create a new budget limit
    pub fn new(username: impl Into<String>, category: impl Into<String>, limit: Money) -> Self {
        Self {
            username: username.into(),
            category: category.into(),
            limit,
        }
    }

    /// Whether two rows address the same (username, category) key
    pub fn same_key(&self, other: &Budget) -> bool {
        self.username == other.username && self.category.eq_ignore_ascii_case(&other.category)
    }

    /// Validate the budget
    pub fn validate(&self) -> Result<(), BudgetValidationError> {
        if self.limit.is_negative() {
            return Err(BudgetValidationError::NegativeLimit);
        }

        if !self.limit.in_range() {
            return Err(BudgetValidationError::LimitTooLarge);
        }

        if self.category.trim().is_empty() {
            return Err(BudgetValidationError::EmptyCategory);
        }

        Ok(())
    }
}

impl Record for Budget {
    const TABLE: &'static str = "budget";
    const COLUMNS: &'static [&'static str] = &["username", "category", "limit"];

    fn username(&self) -> &str {
        &self.username
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} limit: {}", self.category, self.limit)
    }
}

/// Validation errors for budgets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BudgetValidationError {
    NegativeLimit,
    LimitTooLarge,
    EmptyCategory,
}

impl fmt::Display for BudgetValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeLimit => write!(f, "Budget limit cannot be negative"),
            Self::LimitTooLarge => write!(f, "Budget limit cannot exceed {}", Money::MAX),
            Self::EmptyCategory => write!(f, "Budget category cannot be empty"),
        }
    }
}

impl std::error::Error for BudgetValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_key() {
        let a = Budget::new("kasun", "Food", Money::from_units(1000));
        let b = Budget::new("kasun", "Food", Money::from_units(2000));
        let c = Budget::new("nimal", "Food", Money::from_units(1000));

        assert!(a.same_key(&b));
        assert!(!a.same_key(&c));
        assert!(a.same_key(&Budget::new("kasun", "FOOD", Money::zero())));
    }

    #[test]
    fn test_zero_limit_is_valid() {
        let budget = Budget::new("kasun", "Food", Money::zero());
        assert!(budget.validate().is_ok());
    }

    #[test]
    fn test_negative_limit_is_invalid() {
        let budget = Budget::new("kasun", "Food", Money::from_units(-5));
        assert_eq!(budget.validate(), Err(BudgetValidationError::NegativeLimit));
    }
}
