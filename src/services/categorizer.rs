//! Quick-entry parsing
//!
//! Turns a free-text note such as `"bus 50"` or `"lunch with team 1,250.00"`
//! into an expense. The amount is the leftmost run of digits, optionally
//! grouped in thousands (`1,250`) and followed by a `.` fraction. The
//! category comes from the first keyword rule with a matching word in the
//! note, falling back to `Other`. Quick entries are always expenses.

use chrono::NaiveDate;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Money, Transaction, TransactionKind, FALLBACK_CATEGORY};

/// Keyword rules in priority order; the first match wins
const RULES: &[(&str, &[&str])] = &[
    (
        "Food",
        &[
            "food", "lunch", "dinner", "breakfast", "rice", "tea", "coffee", "snack", "kottu",
            "කෑම",
        ],
    ),
    (
        "Transport",
        &[
            "bus", "train", "taxi", "uber", "pickme", "tuk", "fuel", "petrol", "diesel", "bike",
            "පෙට්‍රල්", "බයික්",
        ],
    ),
    (
        "Bills",
        &[
            "bill", "electricity", "water", "phone", "internet", "rent", "reload", "බිල්",
        ],
    ),
    (
        "Shopping",
        &[
            "shop", "shopping", "clothes", "shoes", "market", "grocery", "groceries",
            "supermarket",
        ],
    ),
    (
        "Health",
        &["doctor", "medicine", "pharmacy", "hospital", "clinic", "dental"],
    ),
    (
        "Entertainment",
        &["movie", "cinema", "netflix", "game", "concert", "trip"],
    ),
];

/// Amount and category read from a note
#[derive(Debug, Clone, PartialEq)]
pub struct QuickEntry {
    pub amount: Money,
    pub category: &'static str,
}

/// Read the amount and category out of a note
pub fn parse_entry(text: &str) -> LedgerResult<QuickEntry> {
    let raw = extract_amount(text).ok_or_else(|| LedgerError::NoAmountFound(text.to_string()))?;
    let amount = Money::parse(raw)
        .map_err(|_| LedgerError::Validation(format!("Amount '{}' is too large", raw)))?;

    Ok(QuickEntry {
        amount,
        category: infer_category(text),
    })
}

/// Build an expense for `username` on `date` from a note
///
/// The whole note is kept as the description. Nothing is stored.
pub fn parse(text: &str, username: &str, date: NaiveDate) -> LedgerResult<Transaction> {
    let entry = parse_entry(text)?;

    Ok(
        Transaction::new(username, date, entry.category, entry.amount, TransactionKind::Expense)
            .with_description(text.trim()),
    )
}

/// Category of the first matching rule, or the fallback
///
/// The lowered note is split into words at whitespace, ASCII punctuation and
/// digits. An English keyword matches a word exactly or with a plural `s`/`es`;
/// a Sinhala keyword matches any word it begins, so inflected forms count.
pub fn infer_category(text: &str) -> &'static str {
    let lowered = text.to_lowercase();
    let words: Vec<&str> = lowered
        .split(|c: char| c.is_whitespace() || c.is_ascii_punctuation() || c.is_ascii_digit())
        .filter(|w| !w.is_empty())
        .collect();

    RULES
        .iter()
        .find(|(_, keywords)| {
            keywords
                .iter()
                .any(|k| words.iter().any(|w| keyword_matches(w, k)))
        })
        .map(|(category, _)| *category)
        .unwrap_or(FALLBACK_CATEGORY)
}

fn keyword_matches(word: &str, keyword: &str) -> bool {
    match word.strip_prefix(keyword) {
        None => false,
        Some(rest) if keyword.is_ascii() => matches!(rest, "" | "s" | "es"),
        Some(_) => true,
    }
}

/// The leftmost amount-like substring
///
/// A run of one to three digits may continue in `,ddd` thousands groups, so
/// `1,250` reads as one number but `2,3` is just `2`. A `.` followed by a
/// digit extends the run into the fraction.
fn extract_amount(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    let start = bytes.iter().position(u8::is_ascii_digit)?;

    let digit_at = |i: usize| bytes.get(i).map_or(false, u8::is_ascii_digit);

    let mut end = start;
    while digit_at(end) {
        end += 1;
    }

    if end - start <= 3 {
        while bytes.get(end) == Some(&b',')
            && (1..=3).all(|k| digit_at(end + k))
            && !digit_at(end + 4)
        {
            end += 4;
        }
    }

    if end < bytes.len() && bytes[end] == b'.' && digit_at(end + 1) {
        end += 1;
        while digit_at(end) {
            end += 1;
        }
    }

    Some(&text[start..end])
}
