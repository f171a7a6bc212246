//! PC House Core - Shared domain types.
//!
//! This crate provides the types used across all PC House components:
//! - `api` - The HTTP/JSON backend for the parts storefront
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no database
//! access, no HTTP clients. `sqlx` encodings are available behind the
//! `postgres` feature.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, keys, emails, prices, roles, statuses and ratings

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
