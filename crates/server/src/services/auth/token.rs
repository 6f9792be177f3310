//! Signed admin tokens.
//!
//! Format: `base64url(claims JSON) "." hex(HMAC-SHA256(payload))`. The claims
//! carry the admin identity plus issue and expiry times in Unix seconds.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use super::AuthError;
use crate::models::CurrentAdmin;

type HmacSha256 = Hmac<Sha256>;

/// Token lifetime: seven days.
pub const TOKEN_TTL_SECS: i64 = 7 * 24 * 60 * 60;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    #[serde(flatten)]
    admin: CurrentAdmin,
    iat: i64,
    exp: i64,
}

/// Issues and validates admin tokens with a server-side secret.
#[derive(Clone)]
pub struct TokenSigner {
    key: SecretString,
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

impl TokenSigner {
    #[must_use]
    pub const fn new(key: SecretString) -> Self {
        Self { key }
    }

    fn mac(&self) -> Result<HmacSha256, AuthError> {
        HmacSha256::new_from_slice(self.key.expose_secret().as_bytes())
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    /// Issue a token for `admin` valid for [`TOKEN_TTL_SECS`] from `now`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Signing` if the claims cannot be encoded.
    pub fn generate(&self, admin: &CurrentAdmin, now: DateTime<Utc>) -> Result<String, AuthError> {
        let iat = now.timestamp();
        let claims = Claims {
            admin: admin.clone(),
            iat,
            exp: iat + TOKEN_TTL_SECS,
        };

        let json = serde_json::to_vec(&claims).map_err(|e| AuthError::Signing(e.to_string()))?;
        let payload = URL_SAFE_NO_PAD.encode(json);

        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        let signature = hex::encode(mac.finalize().into_bytes());

        Ok(format!("{payload}.{signature}"))
    }

    /// Verify a token and return the identity it carries.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` for malformed or tampered tokens and
    /// `AuthError::TokenExpired` once `now` is past the expiry.
    pub fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<CurrentAdmin, AuthError> {
        let (payload, signature) = token.split_once('.').ok_or(AuthError::InvalidToken)?;
        let signature = hex::decode(signature).map_err(|_| AuthError::InvalidToken)?;

        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| AuthError::InvalidToken)?;

        let json = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| AuthError::InvalidToken)?;
        let claims: Claims = serde_json::from_slice(&json).map_err(|_| AuthError::InvalidToken)?;

        if claims.admin.username.is_empty() {
            return Err(AuthError::InvalidToken);
        }
        if now.timestamp() > claims.exp {
            return Err(AuthError::TokenExpired);
        }

        Ok(claims.admin)
    }
}
