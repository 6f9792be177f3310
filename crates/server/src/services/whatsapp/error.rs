//! WhatsApp gateway errors.

use thiserror::Error;

/// Errors that can occur when talking to the WhatsApp gateway.
#[derive(Debug, Error)]
pub enum WhatsAppError {
    /// HTTP request failed before a response arrived.
    #[error("gateway request failed: {0}")]
    Request(String),

    /// Gateway answered with a non-success status.
    #[error("gateway API error ({status}): {body}")]
    Api { status: u16, body: String },
}
