//! Menen Core - Shared types library.
//!
//! This crate provides common types used across all Menen components:
//! - `storefront` - Cart store, checkout glue and backend API client
//! - `cli` - Command-line front end bound to the cart store
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no storage access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices and order statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
