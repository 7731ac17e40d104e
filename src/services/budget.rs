//! Budget service
//!
//! One spending limit per (user, category). Setting a limit replaces the
//! previous one; no history is kept.

use super::CategoryService;
use crate::audit::EntityType;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Budget, Money, Session};
use crate::reports::aggregator::{BudgetUtilization, LedgerAggregator};
use crate::storage::Storage;

/// Service for budget management
pub struct BudgetService<'a> {
    storage: &'a Storage,
    session: &'a Session,
}

impl<'a> BudgetService<'a> {
    /// Create a new budget service for the session user
    pub fn new(storage: &'a Storage, session: &'a Session) -> Self {
        Self { storage, session }
    }

    /// Set the limit for a category, replacing any earlier limit
    ///
    /// The category is stored in the spelling of the matching default or
    /// custom category. Returns the replaced budget, if there was one.
    pub fn set_limit(&self, category: &str, limit: Money) -> LedgerResult<Option<Budget>> {
        let category = CategoryService::new(self.storage, self.session).canonical_name(category)?;
        let budget = Budget::new(&self.session.username, category, limit);
        budget
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        let previous = self.storage.tables.upsert(budget.clone(), Budget::same_key)?;

        let key = self.key(&budget.category);
        match &previous {
            Some(before) => self.storage.log_update(
                EntityType::Budget,
                key,
                &self.session.username,
                before,
                &budget,
                Some(format!("limit: {} -> {}", before.limit, budget.limit)),
            ),
            None => {
                self.storage
                    .log_create(EntityType::Budget, key, &self.session.username, &budget)
            }
        }

        Ok(previous)
    }

    /// The user's budgets in the order they were first set
    pub fn list(&self) -> LedgerResult<Vec<Budget>> {
        self.storage.tables.filter::<Budget>(&self.session.username)
    }

    /// Spending against every budget
    pub fn utilization(&self) -> LedgerResult<Vec<BudgetUtilization>> {
        LedgerAggregator::new(self.storage).budget_utilization(&self.session.username)
    }

    /// Budgets whose spending is above `threshold` of the limit
    pub fn alerts(&self, threshold: f64) -> LedgerResult<Vec<BudgetUtilization>> {
        LedgerAggregator::new(self.storage).budget_alert(&self.session.username, threshold)
    }

    /// Remove the limit for a category
    pub fn remove(&self, category: &str) -> LedgerResult<Budget> {
        let category = category.trim();
        let username = self.session.username.as_str();

        let removed = self.storage.tables.rewrite::<Budget, _, _>(|rows| {
            let position = rows
                .iter()
                .position(|b| b.username == username && b.category.eq_ignore_ascii_case(category))
                .ok_or_else(|| LedgerError::budget_not_found(category))?;
            Ok((rows.remove(position), true))
        })?;

        self.storage.log_delete(
            EntityType::Budget,
            self.key(category),
            username,
            &removed,
        );

        Ok(removed)
    }

    fn key(&self, category: &str) -> String {
        format!("{}/{}", self.session.username, category)
    }
}
