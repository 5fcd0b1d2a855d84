//! Payment status derivation
//!
//! An expense's status is never stored. It is computed from the paid flag
//! and the due date against a caller-supplied `today`, so every list,
//! summary and card that shows a status agrees with the others and with the
//! calendar. Nothing in this module reads the clock.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::expense::Expense;

/// Placeholder rendered where a due date could not be parsed
pub const INVALID_DATE_LABEL: &str = "Invalid date";

/// Derived payment state of an expense
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Paid,
    Pending,
    Overdue,
    /// Unpaid, and the due date is not a date we can read
    InvalidDate,
}

impl PaymentStatus {
    /// Parse a status selector (English or Portuguese)
    ///
    /// `InvalidDate` is not selectable.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "paid" | "pago" | "pagas" => Some(Self::Paid),
            "pending" | "pendente" | "pendentes" => Some(Self::Pending),
            "overdue" | "atrasado" | "atrasadas" | "vencido" => Some(Self::Overdue),
            _ => None,
        }
    }

    /// True for statuses that still need a payment
    pub fn is_unpaid(&self) -> bool {
        !matches!(self, Self::Paid)
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Paid => write!(f, "Paid"),
            Self::Pending => write!(f, "Pending"),
            Self::Overdue => write!(f, "Overdue"),
            Self::InvalidDate => f.write_str(INVALID_DATE_LABEL),
        }
    }
}

const DATE_TIME_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%d/%m/%Y %H:%M:%S",
];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d/%m/%Y"];

/// Parse a due date into a calendar date
///
/// Accepts ISO dates, RFC 3339 timestamps, naive ISO date-times and the
/// Brazilian `dd/mm/yyyy` forms. The time of day is dropped; timestamps keep
/// the calendar date as written in their own offset.
pub fn parse_due_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local().date());
    }

    for format in DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.date());
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
}

/// Derive the payment status of an expense as of `today`
///
/// Paid wins over everything, including an unreadable due date. An unpaid
/// expense is overdue only when its due date is strictly before today; an
/// expense due today is still pending.
pub fn classify(expense: &Expense, today: NaiveDate) -> PaymentStatus {
    if expense.is_paid {
        return PaymentStatus::Paid;
    }

    match parse_due_date(&expense.due_date) {
        Some(due) if due < today => PaymentStatus::Overdue,
        Some(_) => PaymentStatus::Pending,
        None => PaymentStatus::InvalidDate,
    }
}

/// Days from `today` until the due date (negative when past due)
pub fn days_until_due(expense: &Expense, today: NaiveDate) -> Option<i64> {
    parse_due_date(&expense.due_date).map(|due| (due - today).num_days())
}

/// Render a due date for display, or the invalid-date placeholder
pub fn format_due_date(raw: &str, format: &str) -> String {
    match parse_due_date(raw) {
        Some(date) => date.format(format).to_string(),
        None => INVALID_DATE_LABEL.to_string(),
    }
}
