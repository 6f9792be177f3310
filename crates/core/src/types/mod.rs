//! Core types for Sentra.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod batch;
pub mod id;
pub mod order_number;
pub mod phone;
pub mod price;
pub mod status;

pub use batch::{BatchStatus, BatchWindow, parse_instant};
pub use id::*;
pub use order_number::OrderNumber;
pub use phone::{PhoneQuery, normalize_whatsapp_number};
pub use price::Rupiah;
pub use status::*;
