//! Task service
//!
//! Tasks are addressed by their index within the user's list.

use chrono::NaiveDate;

use crate::audit::EntityType;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Priority, Session, Task};
use crate::storage::{Record, Storage};

/// Service for the user's to-do list
pub struct TaskService<'a> {
    storage: &'a Storage,
    session: &'a Session,
}

impl<'a> TaskService<'a> {
    pub fn new(storage: &'a Storage, session: &'a Session) -> Self {
        Self { storage, session }
    }

    /// Add a pending task
    pub fn add(&self, name: &str, priority: Priority, date: NaiveDate) -> LedgerResult<(usize, Task)> {
        let task = Task::new(&self.session.username, name.trim(), priority, date);
        task.validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        let username = self.session.username.as_str();
        let index = self.storage.tables.rewrite::<Task, _, _>(|rows| {
            let index = rows.iter().filter(|t| t.username == username).count();
            rows.push(task.clone());
            Ok((index, true))
        })?;

        self.storage
            .log_create(EntityType::Task, self.key(index), username, &task);

        Ok((index, task))
    }

    /// Mark a task done
    ///
    /// Returns false, without writing, if it was already done.
    pub fn complete(&self, index: usize) -> LedgerResult<bool> {
        let username = self.session.username.as_str();

        let change = self.storage.tables.rewrite::<Task, _, _>(|rows| {
            let task = rows
                .iter_mut()
                .filter(|t| t.username == username)
                .nth(index)
                .ok_or_else(|| LedgerError::row_not_found(Task::TABLE, index))?;

            let before = task.clone();
            if !task.complete() {
                return Ok((None, false));
            }
            Ok((Some((before, task.clone())), true))
        })?;

        match change {
            Some((before, after)) => {
                self.storage.log_update(
                    EntityType::Task,
                    self.key(index),
                    username,
                    &before,
                    &after,
                    Some("status: Pending -> Done".to_string()),
                );
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// The user's tasks with their indices, in the order they were added
    pub fn list(&self, include_done: bool) -> LedgerResult<Vec<(usize, Task)>> {
        Ok(self
            .storage
            .tables
            .filter::<Task>(&self.session.username)?
            .into_iter()
            .enumerate()
            .filter(|(_, task)| include_done || !task.is_done())
            .collect())
    }

    pub fn delete(&self, index: usize) -> LedgerResult<Task> {
        let removed = self
            .storage
            .tables
            .remove_in_view::<Task>(&self.session.username, index)?;

        self.storage.log_delete(
            EntityType::Task,
            self.key(index),
            &self.session.username,
            &removed,
        );

        Ok(removed)
    }

    fn key(&self, index: usize) -> String {
        format!("{}#{}", self.session.username, index)
    }
}
