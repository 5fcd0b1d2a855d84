//! Rubik - property and expense management client
//!
//! This library provides the core of the Rubik client: the domain model for
//! real-estate properties and the expenses and documents attached to them,
//! a REST client for the Rubik backend, the persisted login session, and the
//! engines that derive payment status and filter the list screens.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (properties, expenses, documents, status)
//! - `storage`: Persisted session store
//! - `api`: HTTP client and the backend's wire schema
//! - `gateway`: Session-aware data access over a pluggable backend
//! - `services`: Authentication, dashboard, filtering and form validation
//! - `cli`, `display`: Command-line front end
//!
//! # Example
//!
//! ```rust,ignore
//! use rubik::config::{paths::RubikPaths, settings::Settings};
//!
//! let paths = RubikPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{RubikError, RubikResult};
