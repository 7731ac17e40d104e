//! Transaction service
//!
//! Adds, lists and deletes the session user's income and expense rows.
//! Rows are addressed by their index within the user's own list, in the
//! order they were added.

use chrono::NaiveDate;

use super::{categorizer, CategoryService};
use crate::audit::EntityType;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Money, Session, Transaction, TransactionKind};
use crate::reports::aggregator::{self, Totals};
use crate::storage::Storage;

/// Service for transaction management
pub struct TransactionService<'a> {
    storage: &'a Storage,
    session: &'a Session,
}

/// Options for filtering transactions
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Filter by category (case-insensitive)
    pub category: Option<String>,
    /// Filter by income or expense
    pub kind: Option<TransactionKind>,
    /// Filter by date range start
    pub start_date: Option<NaiveDate>,
    /// Filter by date range end
    pub end_date: Option<NaiveDate>,
    /// Keep only the most recent N rows
    pub limit: Option<usize>,
}

impl TransactionFilter {
    /// Create a new empty filter
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by category
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Filter by kind
    pub fn kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Filter by date range
    pub fn date_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    /// Limit results
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn matches(&self, txn: &Transaction) -> bool {
        if let Some(category) = &self.category {
            if !txn.category.eq_ignore_ascii_case(category) {
                return false;
            }
        }
        if let Some(kind) = self.kind {
            if txn.kind != kind {
                return false;
            }
        }
        if let Some(start) = self.start_date {
            if txn.date < start {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if txn.date > end {
                return false;
            }
        }
        true
    }
}

impl<'a> TransactionService<'a> {
    /// Create a new transaction service for the session user
    pub fn new(storage: &'a Storage, session: &'a Session) -> Self {
        Self { storage, session }
    }

    /// Record a transaction
    ///
    /// A category matching a known one case-insensitively is stored in that
    /// spelling. Returns the row's index in the user's list with the stored row.
    pub fn add(
        &self,
        date: NaiveDate,
        category: &str,
        description: &str,
        amount: Money,
        kind: TransactionKind,
    ) -> LedgerResult<(usize, Transaction)> {
        let category = CategoryService::new(self.storage, self.session).canonical_name(category)?;
        let txn = Transaction::new(&self.session.username, date, category, amount, kind)
            .with_description(description.trim());

        self.insert(txn)
    }

    /// Record an expense from a free-text note such as `"bus 50"`
    pub fn add_quick(&self, text: &str, date: NaiveDate) -> LedgerResult<(usize, Transaction)> {
        let txn = categorizer::parse(text, &self.session.username, date)?;
        self.insert(txn)
    }

    /// The user's transactions with their indices, oldest first
    pub fn list(&self, filter: &TransactionFilter) -> LedgerResult<Vec<(usize, Transaction)>> {
        let mut rows: Vec<(usize, Transaction)> = self
            .storage
            .tables
            .filter::<Transaction>(&self.session.username)?
            .into_iter()
            .enumerate()
            .filter(|(_, txn)| filter.matches(txn))
            .collect();

        if let Some(limit) = filter.limit {
            let skip = rows.len().saturating_sub(limit);
            rows.drain(..skip);
        }

        Ok(rows)
    }

    /// Delete the `index`-th transaction of the user
    pub fn delete(&self, index: usize) -> LedgerResult<Transaction> {
        let removed = self
            .storage
            .tables
            .remove_in_view::<Transaction>(&self.session.username, index)?;

        self.storage.log_delete(
            EntityType::Transaction,
            self.key(index),
            &self.session.username,
            &removed,
        );

        Ok(removed)
    }

    /// Income, expense and net for the user
    pub fn totals(&self) -> LedgerResult<Totals> {
        let rows = self
            .storage
            .tables
            .filter::<Transaction>(&self.session.username)?;
        Ok(aggregator::totals(&rows))
    }

    fn insert(&self, txn: Transaction) -> LedgerResult<(usize, Transaction)> {
        txn.validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        let username = self.session.username.as_str();
        let index = self.storage.tables.rewrite::<Transaction, _, _>(|rows| {
            let index = rows.iter().filter(|r| r.username == username).count();
            rows.push(txn.clone());
            Ok((index, true))
        })?;

        self.storage.log_create(
            EntityType::Transaction,
            self.key(index),
            username,
            &txn,
        );

        Ok((index, txn))
    }

    fn key(&self, index: usize) -> String {
        format!("{}#{}", self.session.username, index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LedgerPaths, Settings};
    use crate::models::Role;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths, &Settings::default()).unwrap();
        (temp_dir, storage)
    }

    fn session(username: &str) -> Session {
        Session {
            username: username.into(),
            role: Role::User,
        }
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, day).unwrap()
    }

    #[test]
    fn test_add_and_list() {
        let (_temp, storage) = create_test_storage();
        let kasun = session("kasun");
        let service = TransactionService::new(&storage, &kasun);

        let (index, txn) = service
            .add(date(1), " salary ", "", Money::from_units(1000), TransactionKind::Income)
            .unwrap();
        assert_eq!(index, 0);
        assert_eq!(txn.category, "Salary");

        let (index, _) = service
            .add(date(2), "Food", "rice", Money::from_units(300), TransactionKind::Expense)
            .unwrap();
        assert_eq!(index, 1);

        let rows = service.list(&TransactionFilter::new()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].1.description, "rice");
    }

    #[test]
    fn test_negative_amount_rejected() {
        let (_temp, storage) = create_test_storage();
        let kasun = session("kasun");
        let service = TransactionService::new(&storage, &kasun);

        let err = service
            .add(date(1), "Food", "", Money::from_units(-5), TransactionKind::Expense)
            .unwrap_err();
        assert!(err.is_validation());
        assert!(service.list(&TransactionFilter::new()).unwrap().is_empty());
    }

    #[test]
    fn test_users_see_only_their_rows() {
        let (_temp, storage) = create_test_storage();
        let kasun = session("kasun");
        let nimal = session("nimal");
        let for_kasun = TransactionService::new(&storage, &kasun);
        let for_nimal = TransactionService::new(&storage, &nimal);

        for_kasun
            .add(date(1), "Food", "", Money::from_units(10), TransactionKind::Expense)
            .unwrap();
        let (index, _) = for_nimal
            .add(date(1), "Food", "", Money::from_units(20), TransactionKind::Expense)
            .unwrap();
        assert_eq!(index, 0);

        let rows = for_nimal.list(&TransactionFilter::new()).unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows.iter().all(|(_, t)| t.username == "nimal"));

        // Index 0 for nimal is nimal's row, not kasun's
        let removed = for_nimal.delete(0).unwrap();
        assert_eq!(removed.amount, Money::from_units(20));
        assert_eq!(for_kasun.list(&TransactionFilter::new()).unwrap().len(), 1);
    }

    #[test]
    fn test_delete_out_of_range() {
        let (_temp, storage) = create_test_storage();
        let kasun = session("kasun");
        let service = TransactionService::new(&storage, &kasun);

        assert!(service.delete(0).unwrap_err().is_not_found());
    }

    #[test]
    fn test_add_quick() {
        let (_temp, storage) = create_test_storage();
        let kasun = session("kasun");
        let service = TransactionService::new(&storage, &kasun);

        let (_, txn) = service.add_quick("bus 50", date(3)).unwrap();
        assert_eq!(txn.category, "Transport");
        assert_eq!(txn.kind, TransactionKind::Expense);

        let err = service.add_quick("no numbers here", date(3)).unwrap_err();
        assert!(matches!(err, LedgerError::NoAmountFound(_)));
        assert_eq!(service.list(&TransactionFilter::new()).unwrap().len(), 1);
    }

    #[test]
    fn test_filter() {
        let (_temp, storage) = create_test_storage();
        let kasun = session("kasun");
        let service = TransactionService::new(&storage, &kasun);

        for day in 1..=5 {
            service
                .add(date(day), "Food", "", Money::from_units(day as i64), TransactionKind::Expense)
                .unwrap();
        }
        service
            .add(date(6), "Salary", "", Money::from_units(100), TransactionKind::Income)
            .unwrap();

        let food = service
            .list(&TransactionFilter::new().category("food"))
            .unwrap();
        assert_eq!(food.len(), 5);

        let ranged = service
            .list(&TransactionFilter::new().date_range(date(2), date(3)))
            .unwrap();
        assert_eq!(ranged.iter().map(|(i, _)| *i).collect::<Vec<_>>(), vec![1, 2]);

        let recent = service
            .list(&TransactionFilter::new().kind(TransactionKind::Expense).limit(2))
            .unwrap();
        assert_eq!(recent.iter().map(|(i, _)| *i).collect::<Vec<_>>(), vec![3, 4]);
    }

    #[test]
    fn test_totals() {
        let (_temp, storage) = create_test_storage();
        let kasun = session("kasun");
        let service = TransactionService::new(&storage, &kasun);

        service
            .add(date(1), "Salary", "", Money::from_units(1000), TransactionKind::Income)
            .unwrap();
        service
            .add(date(2), "Food", "", Money::from_units(300), TransactionKind::Expense)
            .unwrap();
        service
            .add(date(3), "Bills", "", Money::from_units(200), TransactionKind::Expense)
            .unwrap();

        let totals = service.totals().unwrap();
        assert_eq!(totals.net(), Money::from_units(500));
    }

    #[test]
    fn test_large_amounts_do_not_overflow_totals() {
        let (_temp, storage) = create_test_storage();
        let kasun = session("kasun");
        let service = TransactionService::new(&storage, &kasun);

        let too_big = Money::from_cents(500_000_000_000_000_000);
        let err = service
            .add(date(1), "Salary", "", too_big, TransactionKind::Income)
            .unwrap_err();
        assert!(err.is_validation());

        service
            .add(date(1), "Salary", "", Money::MAX, TransactionKind::Income)
            .unwrap();
        service
            .add(date(2), "Salary", "", Money::MAX, TransactionKind::Income)
            .unwrap();

        let totals = service.totals().unwrap();
        assert_eq!(totals.income.cents(), Money::MAX.cents() * 2);
        assert_eq!(totals.net(), totals.income);
    }

    #[test]
    fn test_changes_are_audited() {
        let (_temp, storage) = create_test_storage();
        let kasun = session("kasun");
        let service = TransactionService::new(&storage, &kasun);

        service
            .add(date(1), "Food", "", Money::from_units(10), TransactionKind::Expense)
            .unwrap();
        service.delete(0).unwrap();

        let keys: Vec<_> = storage
            .audit()
            .read_all()
            .unwrap()
            .into_iter()
            .filter(|e| e.entity_type == EntityType::Transaction)
            .map(|e| (e.operation.to_string(), e.entity_key))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("CREATE".to_string(), "kasun#0".to_string()),
                ("DELETE".to_string(), "kasun#0".to_string())
            ]
        );
    }
}
