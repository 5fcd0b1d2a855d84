//! Local storage for Rubik
//!
//! Everything the application owns lives on the backend except the login
//! session, which is kept in a JSON key-value file written atomically.

pub mod file_io;
pub mod session;

pub use file_io::{read_json, write_json_atomic};
pub use session::{
    FileKeyValueStore, KeyValueStore, MemoryKeyValueStore, Session, SessionStore, TOKEN_KEY,
    USER_KEY,
};
