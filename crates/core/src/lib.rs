//! Sentra Core - Shared domain types.
//!
//! This crate provides the types used across all Sentra components:
//! - `server` - Storefront API, order API and admin back office
//! - `cli` - Command-line tools for migrations, seeding and admin accounts
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP clients. Everything here can be tested without a runtime.
//!
//! # Modules
//!
//! - [`types`] - Typed IDs, prices, statuses, order numbers, phone numbers and
//!   the batch (ordering window) calculation

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
