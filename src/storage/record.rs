//! The row contract every table type implements

use serde::{de::DeserializeOwned, Serialize};

/// A fixed-schema row stored in a named table
///
/// `COLUMNS` is the exact header written to and expected from the backing
/// file, in order. Every row is owned by exactly one user.
pub trait Record: Serialize + DeserializeOwned + Clone {
    /// Table name, also the file stem on disk
    const TABLE: &'static str;

    /// Column names, in file order
    const COLUMNS: &'static [&'static str];

    /// Partition key
    fn username(&self) -> &str;
}
