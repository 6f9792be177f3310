//! WhatsApp send-text client.

use reqwest::Client;
use secrecy::ExposeSecret;
use serde::Serialize;
use tracing::{debug, error, info, instrument};

use sentra_core::normalize_whatsapp_number;

use super::error::WhatsAppError;
use crate::config::GatewayConfig;

#[derive(Debug, Serialize)]
struct SendTextRequest<'a> {
    number: &'a str,
    text: &'a str,
}

/// Client for the WhatsApp gateway.
///
/// Gateway configuration is passed per call because it may come from the
/// settings table and change at runtime.
#[derive(Debug, Clone, Default)]
pub struct WhatsAppClient {
    client: Client,
}

impl WhatsAppClient {
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Send a text message. Returns whether the gateway accepted it.
    ///
    /// Fails closed when no gateway is configured. The number is normalized
    /// to the `62` international form before sending. Failures are logged,
    /// never retried.
    #[instrument(skip(self, gateway, text))]
    pub async fn send_message(
        &self,
        gateway: Option<&GatewayConfig>,
        number: &str,
        text: &str,
    ) -> bool {
        let Some(gateway) = gateway else {
            error!("WhatsApp gateway not configured, message not sent");
            return false;
        };

        let normalized = normalize_whatsapp_number(number);
        match self.send_text(gateway, &normalized, text).await {
            Ok(()) => {
                info!(number = %normalized, "WhatsApp message sent");
                true
            }
            Err(e) => {
                error!(error = %e, number = %normalized, "Failed to send WhatsApp message");
                false
            }
        }
    }

    async fn send_text(
        &self,
        gateway: &GatewayConfig,
        number: &str,
        text: &str,
    ) -> Result<(), WhatsAppError> {
        let endpoint = gateway.send_text_endpoint();
        debug!(endpoint = %endpoint, "Posting to WhatsApp gateway");

        let response = self
            .client
            .post(&endpoint)
            .header("apikey", gateway.api_key.expose_secret())
            .json(&SendTextRequest { number, text })
            .send()
            .await
            .map_err(|e| WhatsAppError::Request(e.to_string()))?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(WhatsAppError::Api {
                status: status.as_u16(),
                body,
            });
        }

        debug!(response = %body.chars().take(100).collect::<String>(), "Gateway accepted message");
        Ok(())
    }
}
