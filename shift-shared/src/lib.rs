//! # Shift Shared Library
//!
//! Domain types and logic shared by the Shift API server.
//!
//! ## Module Organization
//!
//! - `store`: document store abstraction with in-memory and PostgreSQL backends
//! - `live`: realtime collection subscriptions
//! - `models`: companies, employees, locations, shifts, time off, users
//! - `tenancy`: resolving the signed-in user's company
//! - `forms`: validated employee and location forms
//! - `dashboard`: dialog state and mutations for the company screen
//! - `schedule`, `leave`, `swaps`: read models behind the schedule, time off and swap views
//! - `auth`: JWT, password hashing and request authentication
//! - `db`: connection pool and migrations

pub mod auth;
pub mod dashboard;
pub mod db;
pub mod forms;
pub mod leave;
pub mod live;
pub mod models;
pub mod sample;
pub mod schedule;
pub mod store;
pub mod swaps;
pub mod tenancy;

/// Current version of the Shift shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
