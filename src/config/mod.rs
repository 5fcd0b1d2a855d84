//! Configuration module for Rubik
//!
//! This module provides configuration management including:
//! - Platform path resolution
//! - User settings persistence (backend URL, display preferences)

pub mod paths;
pub mod settings;

pub use paths::RubikPaths;
pub use settings::Settings;
