//! Custom error types for Rubik
//!
//! Errors fall into four families: validation (caught before any request),
//! session (no user or token), network (transport failure or non-2xx reply)
//! and parse (a reply that does not have the expected shape). Date parsing
//! never produces an error; see [`crate::models::status`].

use std::fmt;

use thiserror::Error;

/// A single invalid form field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Per-field validation failures collected from one form submission
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure for `field`
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Message for a field, if that field failed
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// Convert into a result: `Ok(())` when nothing failed
    pub fn into_result(self) -> Result<(), RubikError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(RubikError::Form(self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// The main error type for Rubik operations
#[derive(Error, Debug)]
pub enum RubikError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Single-value validation errors (bad CLI argument, unknown category)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Form validation errors, one message per field
    #[error("Invalid form: {0}")]
    Form(FieldErrors),

    /// No active session, or the backend rejected the credentials
    #[error("Session error: {0}")]
    Session(String),

    /// Transport failure or non-2xx response
    #[error("Network error: {0}")]
    Network(String),

    /// Response body did not have the expected shape
    #[error("Unexpected response: {0}")]
    Parse(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Operation the backend does not offer
    #[error("Not supported: {0}")]
    Unsupported(String),

    /// Local storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl RubikError {
    /// Create a "not found" error for properties
    pub fn property_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Property",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for expenses
    pub fn expense_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Expense",
            identifier: identifier.into(),
        }
    }

    /// Error returned when an accessor runs without a logged-in user
    pub fn no_session() -> Self {
        Self::Session("not logged in".into())
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error (either kind)
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Form(_))
    }

    pub fn is_session(&self) -> bool {
        matches!(self, Self::Session(_))
    }

    /// Network and parse failures are reported to the user the same way
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Parse(_))
    }
}

impl From<std::io::Error> for RubikError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for RubikError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for Rubik operations
pub type RubikResult<T> = Result<T, RubikError>;
