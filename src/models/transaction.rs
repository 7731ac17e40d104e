//! Transaction model
//!
//! Represents a single income or expense entry. Amounts are always stored as
//! non-negative values; the direction comes from the transaction type.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;
use crate::storage::Record;

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionKind {
    #[serde(alias = "income", alias = "INCOME")]
    Income,
    #[serde(alias = "expense", alias = "EXPENSE")]
    Expense,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => write!(f, "Income"),
            Self::Expense => write!(f, "Expense"),
        }
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = TransactionValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" | "in" => Ok(Self::Income),
            "expense" | "out" => Ok(Self::Expense),
            other => Err(TransactionValidationError::UnknownKind(other.to_string())),
        }
    }
}

/// A financial transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Owner of the row
    pub username: String,

    /// Transaction date
    pub date: NaiveDate,

    pub category: String,

    /// Free-text note
    #[serde(default)]
    pub description: String,

    /// Non-negative amount
    pub amount: Money,

    #[serde(rename = "type")]
    pub kind: TransactionKind,
}

impl Transaction {
    /// Create a new transaction
    pub fn new(
        username: impl Into<String>,
        date: NaiveDate,
        category: impl Into<String>,
        amount: Money,
        kind: TransactionKind,
    ) -> Self {
        Self {
            username: username.into(),
            date,
            category: category.into(),
            description: String::new(),
            amount,
            kind,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }

    /// Amount with its sign applied (income positive, expense negative)
    pub fn signed_amount(&self) -> Money {
        match self.kind {
            TransactionKind::Income => self.amount,
            TransactionKind::Expense => -self.amount,
        }
    }

    /// Validate the transaction
    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        if self.amount.is_negative() {
            return Err(TransactionValidationError::NegativeAmount);
        }

        if !self.amount.in_range() {
            return Err(TransactionValidationError::AmountTooLarge);
        }

        if self.category.trim().is_empty() {
            return Err(TransactionValidationError::EmptyCategory);
        }

        Ok(())
    }
}

impl Record for Transaction {
    const TABLE: &'static str = "transactions";
    const COLUMNS: &'static [&'static str] =
        &["username", "date", "category", "description", "amount", "type"];

    fn username(&self) -> &str {
        &self.username
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.date, self.category, self.kind, self.amount
        )?;
        if !self.description.is_empty() {
            write!(f, " ({})", self.description)?;
        }
        Ok(())
    }
}

/// Validation errors for transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    NegativeAmount,
    AmountTooLarge,
    EmptyCategory,
    UnknownKind(String),
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeAmount => write!(f, "Transaction amount cannot be negative"),
            Self::AmountTooLarge => {
                write!(f, "Transaction amount cannot exceed {}", Money::MAX)
            }
            Self::EmptyCategory => write!(f, "Transaction category cannot be empty"),
            Self::UnknownKind(kind) => {
                write!(f, "Unknown transaction type '{}' (use income or expense)", kind)
            }
        }
    }
}

impl std::error::Error for TransactionValidationError {}
