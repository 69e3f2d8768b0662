//! Console HTTP API module.
//!
//! # Purpose
//! Exposes route handler modules, the request actor extractor, and the route
//! guard placed in front of page handlers.
pub mod actor;
pub mod error;
pub mod guard;
pub mod navigation;
pub mod openapi;
pub mod pages;
pub mod permissions;
pub mod system;
pub mod types;
