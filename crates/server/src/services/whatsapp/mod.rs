//! WhatsApp gateway integration.
//!
//! Order confirmations and follow-up reminders are relayed through an
//! Evolution-style send-text API. Delivery is best effort: callers only get
//! a boolean back.

mod client;
mod error;
pub mod messages;

pub use client::WhatsAppClient;
pub use error::WhatsAppError;
pub use messages::{format_follow_up_message, format_order_message};
