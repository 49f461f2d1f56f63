//! Explicit session context handed to every backend call.
//!
//! A session without a token, or whose token has expired, fails fast with
//! `ServiceError::Unauthorized` before any request is made.

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use skyport_shared::Masked;

use crate::repository::ServiceError;

#[derive(Debug, Clone, Default)]
pub struct Session {
    token: Option<Masked<String>>,
    expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct ExpiryClaims {
    exp: Option<i64>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Build a session from a bearer token. A JWT `exp` claim, when present,
    /// becomes the session expiry. Opaque tokens never expire client-side.
    pub fn from_token(token: impl Into<String>) -> Self {
        let token = token.into().trim().to_string();
        if token.is_empty() {
            return Self::anonymous();
        }
        let expires_at = token_expiry(&token);
        Self {
            token: Some(Masked::new(token)),
            expires_at,
        }
    }

    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    pub fn is_authenticated(&self) -> bool {
        self.bearer().is_ok()
    }

    /// The token to send as `Authorization: Bearer ...`.
    pub fn bearer(&self) -> Result<&str, ServiceError> {
        self.bearer_at(Utc::now())
    }

    pub fn bearer_at(&self, now: DateTime<Utc>) -> Result<&str, ServiceError> {
        let token = self
            .token
            .as_ref()
            .ok_or_else(|| ServiceError::Unauthorized("no session token".to_string()))?;

        match self.expires_at {
            Some(expiry) if expiry <= now => Err(ServiceError::Unauthorized(format!(
                "session expired at {}",
                expiry.to_rfc3339()
            ))),
            _ => Ok(token.expose().as_str()),
        }
    }
}

/// Reads `exp` without verifying the signature; the backend is the verifier.
fn token_expiry(token: &str) -> Option<DateTime<Utc>> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data = decode::<ExpiryClaims>(token, &DecodingKey::from_secret(&[]), &validation).ok()?;
    data.claims
        .exp
        .and_then(|exp| DateTime::<Utc>::from_timestamp(exp, 0))
}
