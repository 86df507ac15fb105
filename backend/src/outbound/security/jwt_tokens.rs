//! HS256 JSON Web Token adapter.
//!
//! Tokens carry only the subject and the issue/expiry instants. Expiry is
//! checked against the injected clock with zero leeway, so a token is
//! rejected from the instant `exp` is reached.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::signing_secret::SigningSecret;
use crate::domain::ports::{TokenError, TokenService};
use crate::domain::{IssuedToken, UserId};

/// Token lifetime in seconds used when none is configured.
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 7_200;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// Signs and validates bearer tokens with a shared secret.
pub struct JwtTokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl JwtTokenService {
    /// Build a token service signing with `secret`, issuing tokens valid for
    /// `ttl` as measured by `clock`.
    pub fn new(secret: &SigningSecret, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against the injected clock instead.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp"]);
        Self {
            encoding: EncodingKey::from_secret(secret.expose()),
            decoding: DecodingKey::from_secret(secret.expose()),
            validation,
            ttl,
            clock,
        }
    }

    /// Configured token lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, subject: &UserId) -> Result<IssuedToken, TokenError> {
        let issued_at = self.clock.utc();
        let expires_at: DateTime<Utc> = issued_at
            .checked_add_signed(self.ttl)
            .filter(|expires_at| *expires_at > issued_at)
            .ok_or_else(|| TokenError::encode(format!("unusable token TTL: {}", self.ttl)))?;
        let claims = Claims {
            sub: subject.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| TokenError::encode(err.to_string()))?;
        Ok(IssuedToken { token, expires_at })
    }

    fn validate(&self, token: &str) -> Result<UserId, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|err| {
            debug!(error = %err, "bearer token rejected");
            TokenError::invalid()
        })?;
        if data.claims.exp <= self.clock.utc().timestamp() {
            debug!("bearer token expired");
            return Err(TokenError::invalid());
        }
        UserId::new(&data.claims.sub).map_err(|_| TokenError::invalid())
    }
}
