//! Menen Storefront library.
//!
//! The shopping cart state manager of the Menen handmade-goods storefront,
//! plus the thin checkout layer and backend API client that surround it.
//!
//! # Modules
//!
//! - [`cart`] - Cart state, the persisting cart store and order summaries
//! - [`checkout`] - Stock-checked quantity changes and order placement
//! - [`api`] - Backend REST client (stock lookup, order submission)
//! - [`config`] - Environment-driven configuration
//! - [`error`] - Unified error type and Sentry reporting
//! - [`telemetry`] - Tracing and Sentry setup for binaries

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod checkout;
pub mod config;
pub mod error;
pub mod telemetry;
