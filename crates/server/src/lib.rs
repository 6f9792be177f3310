//! Sentra server library.
//!
//! Storefront and admin API for the Sentra order-taking shop: catalog,
//! batch-gated checkout with WhatsApp confirmation, order lookup, and an
//! admin back office. The binary in `main.rs` wires this into a server.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

pub use config::ServerConfig;
pub use state::AppState;
