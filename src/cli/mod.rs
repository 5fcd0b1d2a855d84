//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod auth;
pub mod document;
pub mod expense;
pub mod property;

pub use auth::{handle_login, handle_logout, handle_register, handle_whoami};
pub use document::{handle_document_command, DocumentCommands};
pub use expense::{handle_expense_command, ExpenseCommands};
pub use property::{handle_property_command, PropertyCommands};
