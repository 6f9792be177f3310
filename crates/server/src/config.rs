//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SENTRA_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `ADMIN_SECRET` - Admin token signing secret (min 32 chars, high entropy)
//!
//! ## Optional
//! - `SENTRA_HOST` - Bind address (default: 127.0.0.1)
//! - `SENTRA_PORT` - Listen port (default: 4321)
//! - `SENTRA_UTC_OFFSET` - Store wall-clock offset in hours (default: 7, WIB)
//! - `SENTRA_ADMIN_DIR` - Static admin pages (default: crates/server/static/admin)
//! - `SENTRA_PUBLIC_DIR` - Static public assets served at `/`
//! - `SENTRA_LOG_JSON` - Emit JSON logs when set
//! - `ADMIN_USERNAME` / `ADMIN_PASSWORD` - Bootstrap super admin for an empty admin table
//! - `EVOLUTION_API_URL` / `EVOLUTION_API_KEY` / `EVOLUTION_INSTANCE` - WhatsApp gateway
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.1)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use chrono::FixedOffset;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_ADMIN_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
    "swasembada",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Admin token signing secret
    pub admin_secret: SecretString,
    /// Store wall-clock offset from UTC
    pub utc_offset: FixedOffset,
    /// Directory of static admin pages
    pub admin_dir: PathBuf,
    /// Directory of public static assets
    pub public_dir: Option<PathBuf>,
    /// Super admin created when the admin table is empty
    pub bootstrap_admin: Option<BootstrapAdmin>,
    /// WhatsApp gateway configured through the environment
    pub gateway: Option<GatewayConfig>,
    /// Emit JSON logs
    pub log_json: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate
    pub sentry_sample_rate: f32,
    /// Sentry transaction sample rate
    pub sentry_traces_sample_rate: f32,
}

/// Credentials for the bootstrap super admin.
#[derive(Clone)]
pub struct BootstrapAdmin {
    pub username: String,
    pub password: SecretString,
}

impl std::fmt::Debug for BootstrapAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapAdmin")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Evolution API (WhatsApp gateway) configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct GatewayConfig {
    /// Gateway base URL, without a trailing slash
    pub url: String,
    /// API key sent in the `apikey` header
    pub api_key: SecretString,
    /// Gateway instance name
    pub instance: String,
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("url", &self.url)
            .field("api_key", &"[REDACTED]")
            .field("instance", &self.instance)
            .finish()
    }
}

impl GatewayConfig {
    /// Build a gateway configuration when all three parts are non-blank.
    #[must_use]
    pub fn from_parts(url: &str, api_key: &str, instance: &str) -> Option<Self> {
        let url = url.trim().trim_end_matches('/');
        let api_key = api_key.trim();
        let instance = instance.trim();
        if url.is_empty() || api_key.is_empty() || instance.is_empty() {
            return None;
        }
        Some(Self {
            url: url.to_owned(),
            api_key: SecretString::from(api_key.to_owned()),
            instance: instance.to_owned(),
        })
    }

    /// Full `sendText` endpoint for this gateway.
    #[must_use]
    pub fn send_text_endpoint(&self) -> String {
        format!("{}/message/sendText/{}", self.url, self.instance)
    }

    fn from_env() -> Option<Self> {
        let url = get_optional_env("EVOLUTION_API_URL").unwrap_or_default();
        let api_key = get_optional_env("EVOLUTION_API_KEY").unwrap_or_default();
        let instance = get_optional_env("EVOLUTION_INSTANCE").unwrap_or_default();
        let gateway = Self::from_parts(&url, &api_key, &instance);
        if gateway.is_none() && !(url.is_empty() && api_key.is_empty() && instance.is_empty()) {
            tracing::warn!(
                has_api_url = !url.trim().is_empty(),
                has_api_key = !api_key.trim().is_empty(),
                has_instance = !instance.trim().is_empty(),
                "Evolution API partially configured, ignoring environment values"
            );
        }
        gateway
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the admin secret fails validation (length, placeholder, entropy).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("SENTRA_DATABASE_URL")?;
        let host = get_env_or_default("SENTRA_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("SENTRA_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("SENTRA_PORT", "4321")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("SENTRA_PORT".to_string(), e.to_string()))?;
        let admin_secret = get_validated_secret("ADMIN_SECRET")?;
        validate_secret_length(&admin_secret, "ADMIN_SECRET")?;
        let utc_offset = parse_utc_offset(&get_env_or_default("SENTRA_UTC_OFFSET", "7"))?;

        let admin_dir = PathBuf::from(get_env_or_default(
            "SENTRA_ADMIN_DIR",
            "crates/server/static/admin",
        ));
        let public_dir = get_optional_env("SENTRA_PUBLIC_DIR").map(PathBuf::from);

        let bootstrap_admin = match (
            get_optional_env("ADMIN_USERNAME"),
            get_optional_env("ADMIN_PASSWORD"),
        ) {
            (Some(username), Some(password))
                if !username.trim().is_empty() && !password.is_empty() =>
            {
                Some(BootstrapAdmin {
                    username: username.trim().to_owned(),
                    password: SecretString::from(password),
                })
            }
            _ => None,
        };

        let gateway = GatewayConfig::from_env();
        let log_json = get_optional_env("SENTRA_LOG_JSON").is_some();

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(0.1);

        Ok(Self {
            database_url,
            host,
            port,
            admin_secret,
            utc_offset,
            admin_dir,
            public_dir,
            bootstrap_admin,
            gateway,
            log_json,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a whole-hour UTC offset such as `7` or `-3`.
fn parse_utc_offset(raw: &str) -> Result<FixedOffset, ConfigError> {
    let invalid = |msg: String| ConfigError::InvalidEnvVar("SENTRA_UTC_OFFSET".to_string(), msg);
    let hours: i32 = raw
        .trim()
        .parse()
        .map_err(|e: std::num::ParseIntError| invalid(e.to_string()))?;
    FixedOffset::east_opt(hours * 3600)
        .ok_or_else(|| invalid(format!("offset out of range: {hours}")))
}

/// Validate that a secret meets minimum length requirements.
fn validate_secret_length(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_ADMIN_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_ADMIN_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        // "ab" has entropy of 1 bit per char (50% a, 50% b)
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_validate_secret_strength_rejects_legacy_default() {
        let result = validate_secret_strength("swasembada-dk-secret-2024", "ADMIN_SECRET");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "ADMIN_SECRET");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        let result = validate_secret_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6", "ADMIN_SECRET");
        assert!(result.is_ok());
    }

    #[test]
    fn test_validate_secret_length() {
        assert!(validate_secret_length(&SecretString::from("short"), "ADMIN_SECRET").is_err());
        assert!(validate_secret_length(&SecretString::from("a".repeat(32)), "ADMIN_SECRET").is_ok());
    }

    #[test]
    fn test_parse_utc_offset() {
        assert_eq!(parse_utc_offset("7").unwrap().local_minus_utc(), 7 * 3600);
        assert_eq!(parse_utc_offset(" -3 ").unwrap().local_minus_utc(), -3 * 3600);
        assert!(parse_utc_offset("WIB").is_err());
        assert!(parse_utc_offset("30").is_err());
    }

    #[test]
    fn test_gateway_requires_all_parts() {
        assert!(GatewayConfig::from_parts("https://wa.example.com", "key", "").is_none());
        assert!(GatewayConfig::from_parts("  ", "key", "sentra").is_none());

        let gateway = GatewayConfig::from_parts(" https://wa.example.com/ ", " key ", "sentra")
            .unwrap();
        assert_eq!(
            gateway.send_text_endpoint(),
            "https://wa.example.com/message/sendText/sentra"
        );
        assert_eq!(gateway.api_key.expose_secret(), "key");
    }

    #[test]
    fn test_gateway_debug_redacts_key() {
        let gateway =
            GatewayConfig::from_parts("https://wa.example.com", "super_secret_api_key", "sentra")
                .unwrap();
        let debug_output = format!("{gateway:?}");
        assert!(debug_output.contains("wa.example.com"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_api_key"));
    }

    #[test]
    fn test_socket_addr() {
        let config = ServerConfig {
            database_url: SecretString::from("postgres://localhost/test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 4321,
            admin_secret: SecretString::from("x".repeat(32)),
            utc_offset: FixedOffset::east_opt(7 * 3600).unwrap(),
            admin_dir: PathBuf::from("static/admin"),
            public_dir: None,
            bootstrap_admin: None,
            gateway: None,
            log_json: false,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.1,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 4321);
    }
}
