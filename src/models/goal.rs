//! Savings goal model

use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;
use crate::storage::Record;

/// A savings goal, keyed by (username, name)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub username: String,
    pub name: String,
    pub target: Money,
    pub current: Money,
}

impl Goal {
    /// Create a new goal with nothing saved yet
    pub fn new(username: impl Into<String>, name: impl Into<String>, target: Money) -> Self {
        Self {
            username: username.into(),
            name: name.into(),
            target,
            current: Money::zero(),
        }
    }

    /// `current / target`, unclamped
    ///
    /// Rows written before overshoot was rejected may exceed 1.0. A zero
    /// target (only possible in hand-edited files) reports 0.0.
    pub fn progress(&self) -> f64 {
        self.current.ratio(self.target).unwrap_or(0.0)
    }

    /// Progress clamped to [0, 1] for display
    pub fn display_progress(&self) -> f64 {
        self.progress().clamp(0.0, 1.0)
    }

    /// Amount still needed to reach the target
    pub fn remaining(&self) -> Money {
        if self.current >= self.target {
            Money::zero()
        } else {
            self.target - self.current
        }
    }

    pub fn is_reached(&self) -> bool {
        self.current >= self.target
    }

    /// Add a deposit, refusing to exceed the target
    pub fn deposit(&mut self, amount: Money) -> Result<(), GoalValidationError> {
        if !amount.is_positive() {
            return Err(GoalValidationError::NonPositiveDeposit);
        }

        let next = self
            .current
            .checked_add(amount)
            .filter(|next| *next <= self.target);
        let Some(next) = next else {
            return Err(GoalValidationError::Overshoot {
                remaining: self.remaining(),
            });
        };

        self.current = next;
        Ok(())
    }

    /// Validate the goal
    pub fn validate(&self) -> Result<(), GoalValidationError> {
        if self.name.trim().is_empty() {
            return Err(GoalValidationError::EmptyName);
        }

        if !self.target.is_positive() {
            return Err(GoalValidationError::NonPositiveTarget);
        }

        if !self.target.in_range() {
            return Err(GoalValidationError::TargetTooLarge);
        }

        if self.current.is_negative() {
            return Err(GoalValidationError::NegativeCurrent);
        }

        Ok(())
    }
}

impl Record for Goal {
    const TABLE: &'static str = "goals";
    const COLUMNS: &'static [&'static str] = &["username", "name", "target", "current"];

    fn username(&self) -> &str {
        &self.username
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} / {} ({:.0}%)",
            self.name,
            self.current,
            self.target,
            self.display_progress() * 100.0
        )
    }
}

/// Validation errors for goals
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoalValidationError {
    EmptyName,
    NonPositiveTarget,
    TargetTooLarge,
    NegativeCurrent,
    NonPositiveDeposit,
    Overshoot { remaining: Money },
}

impl fmt::Display for GoalValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Goal name cannot be empty"),
            Self::NonPositiveTarget => write!(f, "Goal target must be greater than zero"),
            Self::TargetTooLarge => write!(f, "Goal target cannot exceed {}", Money::MAX),
            Self::NegativeCurrent => write!(f, "Goal savings cannot be negative"),
            Self::NonPositiveDeposit => write!(f, "Deposit must be greater than zero"),
            Self::Overshoot { remaining } => {
                write!(f, "Deposit exceeds goal target (only {} remaining)", remaining)
            }
        }
    }
}

impl std::error::Error for GoalValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress() {
        let mut goal = Goal::new("kasun", "Laptop", Money::from_units(200));
        assert_eq!(goal.progress(), 0.0);

        goal.deposit(Money::from_units(50)).unwrap();
        assert_eq!(goal.progress(), 0.25);
        assert_eq!(goal.remaining(), Money::from_units(150));
    }

    #[test]
    fn test_deposit_rejects_overshoot() {
        let mut goal = Goal::new("kasun", "Laptop", Money::from_units(100));
        goal.deposit(Money::from_units(80)).unwrap();

        let err = goal.deposit(Money::from_units(30)).unwrap_err();
        assert_eq!(
            err,
            GoalValidationError::Overshoot {
                remaining: Money::from_units(20)
            }
        );
        assert_eq!(goal.current, Money::from_units(80));

        goal.deposit(Money::from_units(20)).unwrap();
        assert!(goal.is_reached());
    }

    #[test]
    fn test_deposit_rejects_zero() {
        let mut goal = Goal::new("kasun", "Laptop", Money::from_units(100));
        assert_eq!(
            goal.deposit(Money::zero()),
            Err(GoalValidationError::NonPositiveDeposit)
        );
    }

    #[test]
    fn test_legacy_overshoot_is_unclamped_but_displays_clamped() {
        let mut goal = Goal::new("kasun", "Trip", Money::from_units(100));
        goal.current = Money::from_units(150);

        assert_eq!(goal.progress(), 1.5);
        assert_eq!(goal.display_progress(), 1.0);
        assert_eq!(goal.remaining(), Money::zero());
    }

    #[test]
    fn test_validate_target() {
        let goal = Goal::new("kasun", "Trip", Money::zero());
        assert_eq!(goal.validate(), Err(GoalValidationError::NonPositiveTarget));

        let goal = Goal::new("kasun", "Trip", Money::from_cents(Money::MAX.cents() + 1));
        assert_eq!(goal.validate(), Err(GoalValidationError::TargetTooLarge));
    }

    #[test]
    fn test_deposit_overflow_is_an_overshoot() {
        let mut goal = Goal::new("kasun", "Trip", Money::from_cents(i64::MAX));
        goal.current = Money::from_cents(i64::MAX - 5);

        let err = goal.deposit(Money::from_cents(i64::MAX)).unwrap_err();
        assert!(matches!(err, GoalValidationError::Overshoot { .. }));
        assert_eq!(goal.current, Money::from_cents(i64::MAX - 5));
    }
}
