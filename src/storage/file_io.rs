//! File I/O utilities with atomic writes
//!
//! Tables are header-plus-rows CSV files encoded as UTF-8. Every write goes to
//! a temp file in the same directory, is synced, then renamed over the target
//! so a reader sees either the old file or the complete new one.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use csv::StringRecord;
use serde::Serialize;

use super::Record;
use crate::error::{LedgerError, LedgerResult};

/// Read every row of a table, in file order
pub fn read_table<R: Record>(path: &Path) -> LedgerResult<Vec<R>> {
    let mut reader = open_reader(path)?;
    let headers = read_headers(&mut reader, path)?;
    check_header::<R>(&headers)?;

    let mut rows = Vec::new();
    for (line, result) in reader.deserialize::<R>().enumerate() {
        let row = result.map_err(|e| {
            LedgerError::StorageUnavailable(format!(
                "Failed to parse {} row {}: {}",
                path.display(),
                line + 1,
                e
            ))
        })?;
        rows.push(row);
    }

    Ok(rows)
}

/// Check that an existing table file carries the expected columns
pub fn verify_table_header<R: Record>(path: &Path) -> LedgerResult<()> {
    let mut reader = open_reader(path)?;
    let headers = read_headers(&mut reader, path)?;
    check_header::<R>(&headers)
}

/// Write a whole table atomically (write to temp, then rename)
pub fn write_table_atomic<R: Record>(path: &Path, rows: &[R]) -> LedgerResult<()> {
    let temp_path = temp_path_for(path);

    let result = write_rows(&temp_path, rows).and_then(|_| {
        fs::rename(&temp_path, path).map_err(|e| {
            LedgerError::StorageUnavailable(format!(
                "Failed to replace {}: {}",
                path.display(),
                e
            ))
        })
    });

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }

    result
}

/// Write JSON to a file atomically (write to temp, then rename)
pub fn write_json_atomic<T, P>(path: P, data: &T) -> LedgerResult<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            LedgerError::Io(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    let temp_path = temp_path_for(path);

    let file = File::create(&temp_path)
        .map_err(|e| LedgerError::Io(format!("Failed to create temp file: {}", e)))?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)
        .map_err(|e| LedgerError::Json(format!("Failed to serialize data: {}", e)))?;

    writer
        .flush()
        .map_err(|e| LedgerError::Io(format!("Failed to flush data: {}", e)))?;

    writer
        .get_ref()
        .sync_all()
        .map_err(|e| LedgerError::Io(format!("Failed to sync data: {}", e)))?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        LedgerError::Io(format!("Failed to rename temp file: {}", e))
    })?;

    Ok(())
}

/// Temp file next to `path`, unique per process
fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(format!(".{}.tmp", std::process::id()));
    path.with_file_name(name)
}

fn open_reader(path: &Path) -> LedgerResult<csv::Reader<File>> {
    let file = File::open(path).map_err(|e| {
        LedgerError::StorageUnavailable(format!("Failed to open {}: {}", path.display(), e))
    })?;

    Ok(csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(file))
}

fn read_headers(reader: &mut csv::Reader<File>, path: &Path) -> LedgerResult<StringRecord> {
    reader.headers().cloned().map_err(|e| {
        LedgerError::StorageUnavailable(format!(
            "Failed to read header of {}: {}",
            path.display(),
            e
        ))
    })
}

fn check_header<R: Record>(found: &StringRecord) -> LedgerResult<()> {
    let matches = found.len() == R::COLUMNS.len()
        && found.iter().zip(R::COLUMNS).all(|(f, e)| f == *e);

    if matches {
        Ok(())
    } else {
        Err(LedgerError::SchemaMismatch {
            table: R::TABLE,
            expected: R::COLUMNS.join(","),
            found: found.iter().collect::<Vec<_>>().join(","),
        })
    }
}

fn write_rows<R: Record>(temp_path: &Path, rows: &[R]) -> LedgerResult<()> {
    let storage_err = |what: &str, e: &dyn std::fmt::Display| {
        LedgerError::StorageUnavailable(format!(
            "Failed to {} {}: {}",
            what,
            temp_path.display(),
            e
        ))
    };

    let file = File::create(temp_path).map_err(|e| storage_err("create", &e))?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);

    writer
        .write_record(R::COLUMNS)
        .map_err(|e| storage_err("write header to", &e))?;

    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| storage_err("serialize row into", &e))?;
    }

    writer.flush().map_err(|e| storage_err("flush", &e))?;
    writer
        .get_ref()
        .sync_all()
        .map_err(|e| storage_err("sync", &e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, Transaction, TransactionKind, User};
    use chrono::NaiveDate;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
    struct TestData {
        name: String,
        value: i32,
    }

    fn txn(amount: i64, description: &str) -> Transaction {
        Transaction::new(
            "kasun",
            NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            "කෑම බීම",
            Money::from_units(amount),
            TransactionKind::Expense,
        )
        .with_description(description)
    }

    #[test]
    fn test_write_and_read_table() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("transactions.csv");

        let rows = vec![txn(300, "lunch, with friends"), txn(200, "")];
        write_table_atomic(&path, &rows).unwrap();

        let loaded: Vec<Transaction> = read_table(&path).unwrap();
        assert_eq!(loaded, rows);
    }

    #[test]
    fn test_header_matches_column_names() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("transactions.csv");

        write_table_atomic::<Transaction>(&path, &[]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.trim(), "username,date,category,description,amount,type");
    }

    #[test]
    fn test_booleans_read_case_insensitively() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("users.csv");
        fs::write(
            &path,
            "username,password_hash,role,approved\nadmin,h1,Admin,TRUE\nnimal,h2,User,False\n",
        )
        .unwrap();

        let users: Vec<User> = read_table(&path).unwrap();
        assert!(users[0].approved);
        assert!(!users[1].approved);
    }

    #[test]
    fn test_schema_mismatch_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("users.csv");
        fs::write(&path, "username,password\nadmin,secret\n").unwrap();

        let err = read_table::<User>(&path).unwrap_err();
        assert!(matches!(err, LedgerError::SchemaMismatch { table: "users", .. }));
        assert!(verify_table_header::<User>(&path).is_err());
    }

    #[test]
    fn test_missing_table_is_unavailable() {
        let temp_dir = TempDir::new().unwrap();
        let err = read_table::<User>(&temp_dir.path().join("users.csv")).unwrap_err();
        assert!(err.is_storage_unavailable());
    }

    #[test]
    fn test_malformed_row_is_unavailable() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("users.csv");
        fs::write(&path, "username,password_hash,role,approved\nadmin,h1,Admin,maybe\n").unwrap();

        let err = read_table::<User>(&path).unwrap_err();
        assert!(matches!(err, LedgerError::StorageUnavailable(_)));
    }

    #[test]
    fn test_atomic_write_no_temp_file_left() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("transactions.csv");

        write_table_atomic(&path, &[txn(1, "x")]).unwrap();

        let leftovers: Vec<_> = fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_write_json_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("dir").join("test.json");

        let data = TestData {
            name: "test".to_string(),
            value: 42,
        };

        write_json_atomic(&path, &data).unwrap();
        let loaded: TestData = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded, data);
    }
}
