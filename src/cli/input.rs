//! Parsing and prompting helpers shared by the command handlers

use chrono::{Local, NaiveDate};
use zeroize::Zeroizing;

use crate::error::{LedgerError, LedgerResult};
use crate::models::Money;

/// Parse a non-negative amount such as `500`, `12.50` or `1,000.00`
pub fn parse_amount(input: &str) -> LedgerResult<Money> {
    let amount = Money::parse(input).map_err(|e| LedgerError::Validation(e.to_string()))?;
    if amount.is_negative() {
        return Err(LedgerError::Validation(format!(
            "Amount cannot be negative: {}",
            input
        )));
    }
    Ok(amount)
}

/// Parse a `YYYY-MM-DD` date, defaulting to today
pub fn parse_date(input: Option<&str>) -> LedgerResult<NaiveDate> {
    match input {
        None => Ok(Local::now().date_naive()),
        Some("today") => Ok(Local::now().date_naive()),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
            LedgerError::Validation(format!("Invalid date '{}', expected YYYY-MM-DD", s))
        }),
    }
}

/// Prompt for a password without echoing it
pub fn prompt_password(prompt: &str) -> LedgerResult<Zeroizing<String>> {
    rpassword::prompt_password(prompt)
        .map(Zeroizing::new)
        .map_err(|e| LedgerError::Io(format!("Failed to read password: {}", e)))
}

/// Prompt for a new password twice until both entries match
pub fn prompt_new_password() -> LedgerResult<Zeroizing<String>> {
    loop {
        let first = prompt_password("New password: ")?;
        if first.is_empty() {
            eprintln!("Password cannot be empty. Please try again.");
            continue;
        }

        let second = prompt_password("Confirm password: ")?;
        if *first != *second {
            eprintln!("Passwords do not match. Please try again.");
            continue;
        }

        return Ok(first);
    }
}
