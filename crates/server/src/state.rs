//! Application state shared across handlers.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Utc};
use sqlx::PgPool;
use tracing::warn;

use crate::config::{GatewayConfig, ServerConfig};
use crate::db::SettingsRepository;
use crate::models::StoreSettings;
use crate::services::auth::TokenSigner;
use crate::services::whatsapp::WhatsAppClient;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    pool: PgPool,
    whatsapp: WhatsAppClient,
    tokens: TokenSigner,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: ServerConfig, pool: PgPool) -> Self {
        let tokens = TokenSigner::new(config.admin_secret.clone());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                whatsapp: WhatsAppClient::new(),
                tokens,
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the WhatsApp gateway client.
    #[must_use]
    pub fn whatsapp(&self) -> &WhatsAppClient {
        &self.inner.whatsapp
    }

    /// Get a reference to the admin token signer.
    #[must_use]
    pub fn tokens(&self) -> &TokenSigner {
        &self.inner.tokens
    }

    /// Current instant in the store's wall-clock offset.
    #[must_use]
    pub fn local_now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.inner.config.utc_offset)
    }

    /// Read and parse all settings.
    ///
    /// A failed read is logged and yields defaults, so callers that only need
    /// optional values keep working while the database is degraded.
    pub async fn store_settings(&self) -> StoreSettings {
        match SettingsRepository::new(self.pool()).get_all().await {
            Ok(map) => StoreSettings::from_map(&map, self.inner.config.utc_offset),
            Err(e) => {
                warn!(error = %e, "Failed to read settings, using defaults");
                StoreSettings::default()
            }
        }
    }

    /// Gateway to send through: environment configuration first, then settings.
    #[must_use]
    pub fn gateway_for<'a>(&'a self, settings: &'a StoreSettings) -> Option<&'a GatewayConfig> {
        self.inner
            .config
            .gateway
            .as_ref()
            .or(settings.gateway.as_ref())
    }
}
