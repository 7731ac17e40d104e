//! Goal service

use tracing::debug;

use crate::audit::EntityType;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Goal, Money, Session};
use crate::storage::Storage;

/// Service for savings goals, keyed by name within a user
pub struct GoalService<'a> {
    storage: &'a Storage,
    session: &'a Session,
}

impl<'a> GoalService<'a> {
    pub fn new(storage: &'a Storage, session: &'a Session) -> Self {
        Self { storage, session }
    }

    /// Create a goal with nothing saved yet
    pub fn add(&self, name: &str, target: Money) -> LedgerResult<Goal> {
        let goal = Goal::new(&self.session.username, name.trim(), target);
        goal.validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        let written = self
            .storage
            .tables
            .append_unique(goal.clone(), |existing: &Goal, new: &Goal| {
                existing.username == new.username && existing.name == new.name
            })?;
        if !written {
            return Err(LedgerError::Duplicate {
                entity_type: "Goal",
                identifier: goal.name,
            });
        }

        self.storage.log_create(
            EntityType::Goal,
            self.key(&goal.name),
            &self.session.username,
            &goal,
        );

        Ok(goal)
    }

    /// Put money towards a goal
    ///
    /// Deposits must be positive and may not take the goal past its target.
    pub fn deposit(&self, name: &str, amount: Money) -> LedgerResult<Goal> {
        let name = name.trim();
        let username = self.session.username.as_str();

        let (before, after) = self.storage.tables.rewrite::<Goal, _, _>(|rows| {
            let goal = rows
                .iter_mut()
                .find(|g| g.username == username && g.name == name)
                .ok_or_else(|| LedgerError::goal_not_found(name))?;

            let before = goal.clone();
            goal.deposit(amount)
                .map_err(|e| LedgerError::Validation(e.to_string()))?;
            Ok(((before, goal.clone()), true))
        })?;

        debug!(goal = name, progress = after.progress(), "deposit recorded");
        self.storage.log_update(
            EntityType::Goal,
            self.key(name),
            username,
            &before,
            &after,
            Some(format!("deposit {}: {} -> {}", amount, before.current, after.current)),
        );

        Ok(after)
    }

    pub fn list(&self) -> LedgerResult<Vec<Goal>> {
        self.storage.tables.filter::<Goal>(&self.session.username)
    }

    /// Look up a goal by name
    pub fn get(&self, name: &str) -> LedgerResult<Goal> {
        let name = name.trim();
        self.list()?
            .into_iter()
            .find(|g| g.name == name)
            .ok_or_else(|| LedgerError::goal_not_found(name))
    }

    pub fn delete(&self, name: &str) -> LedgerResult<Goal> {
        let name = name.trim();
        let username = self.session.username.as_str();

        let removed = self.storage.tables.rewrite::<Goal, _, _>(|rows| {
            let position = rows
                .iter()
                .position(|g| g.username == username && g.name == name)
                .ok_or_else(|| LedgerError::goal_not_found(name))?;
            Ok((rows.remove(position), true))
        })?;

        self.storage
            .log_delete(EntityType::Goal, self.key(name), username, &removed);

        Ok(removed)
    }

    fn key(&self, name: &str) -> String {
        format!("{}/{}", self.session.username, name)
    }
}
