//! Display formatting for terminal output
//!
//! Turns models into the tables and detail views the CLI prints.

pub mod dashboard;
pub mod document;
pub mod expense;
pub mod property;

pub use dashboard::format_dashboard;
pub use document::format_document_list;
pub use expense::{format_expense_line, format_expense_list, status_label};
pub use property::{format_property_details, format_property_list};
