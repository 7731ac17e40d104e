//! User account model
//!
//! A user row carries the password hash, the role and the approval flag that
//! drives the account-approval workflow.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::storage::Record;

/// Role of an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Role {
    #[default]
    #[serde(alias = "user", alias = "USER")]
    User,
    #[serde(alias = "admin", alias = "ADMIN")]
    Admin,
}

impl Role {
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "User"),
            Self::Admin => write!(f, "Admin"),
        }
    }
}

/// A registered account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Case-sensitive, globally unique login name
    pub username: String,

    /// Argon2 PHC string
    pub password_hash: String,

    pub role: Role,

    /// Whether an admin has approved the account
    #[serde(with = "bool_text")]
    pub approved: bool,
}

impl User {
    /// A freshly registered account awaiting approval
    pub fn pending(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password_hash: password_hash.into(),
            role: Role::User,
            approved: false,
        }
    }

    /// An approved admin account
    pub fn admin(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password_hash: password_hash.into(),
            role: Role::Admin,
            approved: true,
        }
    }

    /// Session identity for this account
    pub fn session(&self) -> Session {
        Session {
            username: self.username.clone(),
            role: self.role,
        }
    }
}

impl Record for User {
    const TABLE: &'static str = "users";
    const COLUMNS: &'static [&'static str] = &["username", "password_hash", "role", "approved"];

    fn username(&self) -> &str {
        &self.username
    }
}

/// Identity handed to the presentation layer after a successful login
///
/// Every per-user read and write is scoped by `username`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub username: String,
    pub role: Role,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.username, self.role)
    }
}

/// Booleans stored as `true`/`false`, read case-insensitively
mod bool_text {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(if *value { "true" } else { "false" })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        let text = String::deserialize(deserializer)?;
        match text.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "expected true or false, found '{}'",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Flag {
        #[serde(with = "bool_text")]
        approved: bool,
    }

    #[test]
    fn test_pending_user_defaults() {
        let user = User::pending("nimal", "hash");
        assert_eq!(user.role, Role::User);
        assert!(!user.approved);
    }

    #[test]
    fn test_admin_is_approved() {
        let admin = User::admin("admin", "hash");
        assert!(admin.approved);
        assert!(admin.session().is_admin());
    }

    #[test]
    fn test_bool_text_is_case_insensitive() {
        let flag: Flag = serde_json::from_str(r#"{"approved": "TRUE"}"#).unwrap();
        assert!(flag.approved);
        let flag: Flag = serde_json::from_str(r#"{"approved": "False"}"#).unwrap();
        assert!(!flag.approved);
        assert!(serde_json::from_str::<Flag>(r#"{"approved": "yes"}"#).is_err());
    }

    #[test]
    fn test_session_display() {
        let session = User::pending("kasun", "hash").session();
        assert_eq!(session.to_string(), "kasun (User)");
    }
}
