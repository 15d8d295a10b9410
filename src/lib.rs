//! Student, course and result records served as JSON over HTTP.
//!
//! Writes are validated and appended to a SQLite store; the course and result
//! listings are computed views that join across collections at read time.

pub mod aggregate;
pub mod api;
pub mod config;
mod db;
pub mod model;
pub mod store;
pub mod validate;

pub use api::{router, AppState};
pub use config::{Config, MissingReferencePolicy, Options};
pub use store::Store;
