//! Audit entry data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{Role, User};

/// Kind of change recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Update => write!(f, "UPDATE"),
            Operation::Delete => write!(f, "DELETE"),
        }
    }
}

/// Table a change was applied to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    User,
    Transaction,
    Budget,
    Goal,
    Task,
    Category,
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityType::User => write!(f, "User"),
            EntityType::Transaction => write!(f, "Transaction"),
            EntityType::Budget => write!(f, "Budget"),
            EntityType::Goal => write!(f, "Goal"),
            EntityType::Task => write!(f, "Task"),
            EntityType::Category => write!(f, "Category"),
        }
    }
}

/// A user row without its password hash
#[derive(Debug, Clone, Serialize)]
pub struct UserView<'a> {
    pub username: &'a str,
    pub role: Role,
    pub approved: bool,
}

impl<'a> From<&'a User> for UserView<'a> {
    fn from(user: &'a User) -> Self {
        Self {
            username: &user.username,
            role: user.role,
            approved: user.approved,
        }
    }
}

/// One line of the audit log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,

    pub operation: Operation,

    pub entity_type: EntityType,

    /// Key of the affected row, e.g. `kasun/Food` for a budget
    pub entity_key: String,

    /// Who performed the change
    pub actor: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl AuditEntry {
    fn new(
        operation: Operation,
        entity_type: EntityType,
        entity_key: impl Into<String>,
        actor: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            entity_type,
            entity_key: entity_key.into(),
            actor: actor.into(),
            before: None,
            after: None,
            summary: None,
        }
    }

    pub fn create<T: Serialize>(
        entity_type: EntityType,
        entity_key: impl Into<String>,
        actor: impl Into<String>,
        row: &T,
    ) -> Self {
        let mut entry = Self::new(Operation::Create, entity_type, entity_key, actor);
        entry.after = serde_json::to_value(row).ok();
        entry
    }

    pub fn update<T: Serialize>(
        entity_type: EntityType,
        entity_key: impl Into<String>,
        actor: impl Into<String>,
        before: &T,
        after: &T,
    ) -> Self {
        let mut entry = Self::new(Operation::Update, entity_type, entity_key, actor);
        entry.before = serde_json::to_value(before).ok();
        entry.after = serde_json::to_value(after).ok();
        entry
    }

    pub fn delete<T: Serialize>(
        entity_type: EntityType,
        entity_key: impl Into<String>,
        actor: impl Into<String>,
        row: &T,
    ) -> Self {
        let mut entry = Self::new(Operation::Delete, entity_type, entity_key, actor);
        entry.before = serde_json::to_value(row).ok();
        entry
    }

    /// Attach a short description of the change
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Format the entry for terminal output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {} {} by {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.entity_type,
            self.entity_key,
            self.actor
        );

        if let Some(summary) = &self.summary {
            output.push_str(&format!(": {}", summary));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Budget, Money};

    #[test]
    fn test_create_entry_has_only_after() {
        let budget = Budget::new("kasun", "Food", Money::from_units(1000));
        let entry = AuditEntry::create(EntityType::Budget, "kasun/Food", "kasun", &budget);

        assert_eq!(entry.operation, Operation::Create);
        assert!(entry.before.is_none());
        assert_eq!(entry.after.unwrap()["limit"], "1000.00");
    }

    #[test]
    fn test_update_entry_keeps_both_sides() {
        let before = Budget::new("kasun", "Food", Money::from_units(1000));
        let after = Budget::new("kasun", "Food", Money::from_units(1500));
        let entry = AuditEntry::update(EntityType::Budget, "kasun/Food", "kasun", &before, &after)
            .with_summary("limit: 1000.00 -> 1500.00");

        assert_eq!(entry.before.unwrap()["limit"], "1000.00");
        assert_eq!(entry.after.unwrap()["limit"], "1500.00");
        assert_eq!(entry.summary.as_deref(), Some("limit: 1000.00 -> 1500.00"));
    }

    #[test]
    fn test_user_view_hides_hash() {
        let user = User::pending("nimal", "$argon2id$secret");
        let entry = AuditEntry::create(EntityType::User, "nimal", "nimal", &UserView::from(&user));

        let json = serde_json::to_string(&entry).unwrap();
        assert!(!json.contains("argon2"));
        assert!(json.contains("\"approved\":false"));
    }

    #[test]
    fn test_human_readable_format() {
        let user = User::pending("nimal", "hash");
        let entry = AuditEntry::update(
            EntityType::User,
            "nimal",
            "admin",
            &UserView::from(&user),
            &UserView::from(&user),
        )
        .with_summary("approved");

        let formatted = entry.format_human_readable();
        assert!(formatted.contains("UPDATE User nimal by admin: approved"));
    }
}
