//! Task model
//!
//! Simple to-do items kept alongside the ledger. A task moves from Pending to
//! Done and never back.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::storage::Record;

/// Status of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TaskStatus {
    #[default]
    #[serde(alias = "pending", alias = "PENDING")]
    Pending,
    #[serde(alias = "done", alias = "DONE")]
    Done,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::Done => write!(f, "Done"),
        }
    }
}

/// Priority of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum Priority {
    #[serde(alias = "low", alias = "LOW")]
    Low,
    #[default]
    #[serde(alias = "medium", alias = "MEDIUM")]
    Medium,
    #[serde(alias = "high", alias = "HIGH")]
    High,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = TaskValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" | "med" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(TaskValidationError::UnknownPriority(other.to_string())),
        }
    }
}

/// A to-do item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub username: String,
    pub name: String,
    pub status: TaskStatus,
    pub priority: Priority,
    /// Due date
    pub date: NaiveDate,
}

impl Task {
    /// Create a new pending task
    pub fn new(
        username: impl Into<String>,
        name: impl Into<String>,
        priority: Priority,
        date: NaiveDate,
    ) -> Self {
        Self {
            username: username.into(),
            name: name.into(),
            status: TaskStatus::Pending,
            priority,
            date,
        }
    }

    pub fn is_done(&self) -> bool {
        self.status == TaskStatus::Done
    }

    /// Mark the task done. Returns false if it already was.
    pub fn complete(&mut self) -> bool {
        if self.is_done() {
            return false;
        }
        self.status = TaskStatus::Done;
        true
    }

    /// Validate the task
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.name.trim().is_empty() {
            return Err(TaskValidationError::EmptyName);
        }
        Ok(())
    }
}

impl Record for Task {
    const TABLE: &'static str = "tasks";
    const COLUMNS: &'static [&'static str] = &["username", "name", "status", "priority", "date"];

    fn username(&self) -> &str {
        &self.username
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.is_done() { "x" } else { " " };
        write!(f, "[{}] {} ({}, due {})", mark, self.name, self.priority, self.date)
    }
}

/// Validation errors for tasks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    EmptyName,
    UnknownPriority(String),
}

impl fmt::Display for TaskValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Task name cannot be empty"),
            Self::UnknownPriority(p) => {
                write!(f, "Unknown priority '{}' (use low, medium or high)", p)
            }
        }
    }
}

impl std::error::Error for TaskValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
    }

    #[test]
    fn test_new_task_is_pending() {
        let task = Task::new("kasun", "Pay rent", Priority::High, date());
        assert_eq!(task.status, TaskStatus::Pending);
        assert!(!task.is_done());
    }

    #[test]
    fn test_complete_is_one_way() {
        let mut task = Task::new("kasun", "Pay rent", Priority::High, date());
        assert!(task.complete());
        assert!(task.is_done());
        assert!(!task.complete());
        assert!(task.is_done());
    }

    #[test]
    fn test_priority_parse_and_order() {
        assert_eq!("HIGH".parse::<Priority>().unwrap(), Priority::High);
        assert!("urgent".parse::<Priority>().is_err());
        assert!(Priority::High > Priority::Low);
    }

    #[test]
    fn test_display() {
        let task = Task::new("kasun", "Pay rent", Priority::Low, date());
        assert_eq!(task.to_string(), "[ ] Pay rent (Low, due 2025-03-01)");
    }
}
