//! Category service
//!
//! Every user sees the built-in categories followed by their own. Only the
//! user's own categories can be added or removed.

use crate::audit::EntityType;
use crate::error::{LedgerError, LedgerResult};
use crate::models::category::is_default_category;
use crate::models::{merge_categories, CustomCategory, Session};
use crate::storage::Storage;

/// Service for category management
pub struct CategoryService<'a> {
    storage: &'a Storage,
    session: &'a Session,
}

impl<'a> CategoryService<'a> {
    /// Create a new category service for the session user
    pub fn new(storage: &'a Storage, session: &'a Session) -> Self {
        Self { storage, session }
    }

    /// Built-in categories first, then the user's own in the order added
    pub fn list(&self) -> LedgerResult<Vec<String>> {
        Ok(merge_categories(&self.list_custom()?))
    }

    /// Only the user's own categories
    pub fn list_custom(&self) -> LedgerResult<Vec<CustomCategory>> {
        self.storage
            .tables
            .filter::<CustomCategory>(&self.session.username)
    }

    /// The stored spelling of `name` when it matches a default or custom
    /// category case-insensitively, otherwise `name` trimmed
    pub fn canonical_name(&self, name: &str) -> LedgerResult<String> {
        let name = name.trim();
        Ok(self
            .list()?
            .into_iter()
            .find(|known| known.eq_ignore_ascii_case(name))
            .unwrap_or_else(|| name.to_string()))
    }

    /// Add a custom category
    ///
    /// Names are compared case-insensitively against both the built-in set
    /// and the user's existing categories.
    pub fn add(&self, name: &str) -> LedgerResult<CustomCategory> {
        let category = CustomCategory::new(&self.session.username, name.trim());
        category
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        let duplicate = || LedgerError::Duplicate {
            entity_type: "Category",
            identifier: category.name.clone(),
        };

        if is_default_category(&category.name) {
            return Err(duplicate());
        }

        let written = self.storage.tables.append_unique(
            category.clone(),
            |existing: &CustomCategory, new: &CustomCategory| {
                existing.username == new.username && existing.name.eq_ignore_ascii_case(&new.name)
            },
        )?;
        if !written {
            return Err(duplicate());
        }

        self.storage.log_create(
            EntityType::Category,
            self.key(&category.name),
            &self.session.username,
            &category,
        );

        Ok(category)
    }

    /// Remove a custom category
    ///
    /// Transactions already filed under it keep their category text.
    pub fn remove(&self, name: &str) -> LedgerResult<CustomCategory> {
        let name = name.trim();
        if is_default_category(name) {
            return Err(LedgerError::Validation(format!(
                "'{}' is a built-in category and cannot be removed",
                name
            )));
        }

        let username = self.session.username.as_str();
        let removed = self.storage.tables.rewrite::<CustomCategory, _, _>(|rows| {
            let position = rows
                .iter()
                .position(|c| c.username == username && c.name.eq_ignore_ascii_case(name))
                .ok_or_else(|| LedgerError::category_not_found(name))?;
            Ok((rows.remove(position), true))
        })?;

        self.storage.log_delete(
            EntityType::Category,
            self.key(&removed.name),
            username,
            &removed,
        );

        Ok(removed)
    }

    fn key(&self, name: &str) -> String {
        format!("{}/{}", self.session.username, name)
    }
}
