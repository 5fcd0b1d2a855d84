//! Backend REST API
//!
//! [`client`] does HTTP; [`wire`] translates the backend's payloads into
//! the domain model.

pub mod client;
pub mod wire;

pub use client::{ApiClient, ApiError, DEFAULT_ERROR_MESSAGE, NETWORK_ERROR_MESSAGE};
