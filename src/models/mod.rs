//! Core data models for Rubik
//!
//! Properties, the expenses and documents attached to them, the user, and
//! the derived payment status of an expense. These types use the canonical
//! English schema; the backend's Portuguese field names are handled in
//! [`crate::api::wire`].

pub mod document;
pub mod expense;
pub mod ids;
pub mod money;
pub mod property;
pub mod status;
pub mod user;

pub use document::{Document, DocumentType};
pub use expense::{Expense, ExpenseDraft, ExpenseType, Installments};
pub use ids::{DocumentId, ExpenseId, PropertyId, UserId};
pub use money::Money;
pub use property::{Property, PropertyDraft, PropertyType, Utilities, UtilityRegistration};
pub use status::{classify, parse_due_date, PaymentStatus};
pub use user::{Registration, User, UserSummary};
