//! # Shift API Server Library
//!
//! HTTP surface for Shift: authentication, the company dashboard's employee
//! and location CRUD, time-off and swap views, the weekly schedule, live
//! collection streams and AI shift suggestions.
//!
//! ## Modules
//!
//! - `app`: application state and router builder
//! - `config`: layered configuration
//! - `error`: error handling and HTTP response mapping
//! - `middleware`: security headers
//! - `routes`: route handlers
//! - `tenant`: per-request tenant resolution

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod tenant;
