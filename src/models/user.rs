//! User model and the account summary shown on the home screen

use serde::{Deserialize, Serialize};

use super::ids::UserId;
use super::money::Money;

/// The logged-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

impl User {
    pub fn new(id: impl Into<UserId>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
        }
    }
}

/// Aggregate figures the backend computes for a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub name: String,
    pub property_count: u32,
    pub total_expenses: Money,
    pub pending_expense_count: u32,
    /// Next due date as sent by the backend; may be empty
    pub next_due_date: Option<String>,
}

/// Data entered on the registration form
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}
