//! Sendero console service library crate.
//!
//! # Purpose
//! Exposes the console API surface, configuration, and observability wiring
//! for use by the binary and tests.
//!
//! # Notes
//! Every permission decision made here goes through `sendero_authz`; handlers
//! never inspect the matrix directly.
pub mod api;
pub mod app;
pub mod config;
pub mod observability;
