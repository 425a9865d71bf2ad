//! Canteen Core - Shared types library.
//!
//! This crate provides common types used across the canteen components:
//! - `server` - HTTP API for guests and the shopkeeper dashboard
//! - `integration-tests` - end-to-end tests driving the server
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no file access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, phone numbers, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
