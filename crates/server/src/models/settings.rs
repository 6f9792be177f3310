//! Typed view over the key/value settings table.

use std::collections::BTreeMap;

use chrono::FixedOffset;

use sentra_core::{BatchWindow, parse_instant};

use crate::config::GatewayConfig;

/// Setting keys.
pub mod keys {
    pub const STORE_NAME: &str = "store_name";
    pub const STORE_PHONE: &str = "store_phone";
    pub const PAYMENT_INFO: &str = "payment_info";
    pub const EVOLUTION_API_URL: &str = "evolution_api_url";
    pub const EVOLUTION_API_KEY: &str = "evolution_api_key";
    pub const EVOLUTION_INSTANCE: &str = "evolution_instance";
    pub const BATCH_ACTIVE: &str = "batch_active";
    pub const BATCH_START: &str = "batch_start";
    pub const BATCH_END: &str = "batch_end";
    pub const BATCH_NAME: &str = "batch_name";
}

/// Store settings parsed in one pass from the raw key/value map.
///
/// Blank values are treated as absent.
#[derive(Debug, Clone, Default)]
pub struct StoreSettings {
    pub payment_info: Option<String>,
    pub batch: BatchWindow,
    pub batch_name: String,
    /// Stored start value, echoed back verbatim by the batch status endpoint.
    pub batch_start_raw: String,
    pub batch_end_raw: String,
    /// Gateway configured through settings, if all three keys are non-blank.
    pub gateway: Option<GatewayConfig>,
}

impl StoreSettings {
    /// Parse settings, reading offset-less batch instants at `offset`.
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>, offset: FixedOffset) -> Self {
        let get = |key: &str| map.get(key).map_or("", String::as_str);
        let non_blank = |key: &str| {
            let value = get(key);
            (!value.trim().is_empty()).then(|| value.to_owned())
        };

        let batch_start_raw = get(keys::BATCH_START).to_owned();
        let batch_end_raw = get(keys::BATCH_END).to_owned();

        Self {
            payment_info: non_blank(keys::PAYMENT_INFO),
            batch: BatchWindow {
                active: get(keys::BATCH_ACTIVE) == "true",
                start: parse_instant(&batch_start_raw, offset),
                end: parse_instant(&batch_end_raw, offset),
            },
            batch_name: get(keys::BATCH_NAME).to_owned(),
            batch_start_raw,
            batch_end_raw,
            gateway: GatewayConfig::from_parts(
                get(keys::EVOLUTION_API_URL),
                get(keys::EVOLUTION_API_KEY),
                get(keys::EVOLUTION_INSTANCE),
            ),
        }
    }
}
