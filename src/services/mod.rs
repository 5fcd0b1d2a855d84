//! Service layer for Rubik
//!
//! The service layer provides business logic on top of the data gateway:
//! the login lifecycle, the home screen summary, list filtering and form
//! validation.

pub mod auth;
pub mod dashboard;
pub mod filter;
pub mod validation;

pub use auth::{AuthService, SessionState};
pub use dashboard::{Dashboard, DashboardService};
pub use filter::{filter, ExpenseFilters, ItemFilter, PropertyFilters, Searchable};
