//! Token Service
//!
//! Issues and verifies the stateless HS256 identity tokens handed out by
//! `/register` and `/login`. There is no revocation list and no refresh;
//! expiry is the only invalidation mechanism.

use std::collections::HashSet;

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::JwtSettings;
use crate::shared::error::AppError;

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Account id
    pub user_id: i64,
    /// Account name at issue time
    pub name: String,
    /// Issuer tag
    pub iss: String,
    /// Issued at (Unix seconds)
    pub iat: i64,
    /// Not before (Unix seconds), equal to `iat`
    pub nbf: i64,
    /// Expiration time (Unix seconds)
    pub exp: i64,
}

/// Outcome of checking a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenVerdict {
    Valid(Claims),
    Expired,
    Malformed,
}

/// Signs and checks identity tokens with the configured secret.
///
/// Built once at startup from [`JwtSettings`] and shared behind an `Arc`;
/// holds no mutable state.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
    ttl_seconds: i64,
}

impl TokenService {
    pub fn new(settings: &JwtSettings) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Time-based claims are checked against an explicit clock in `verify_at`.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.leeway = 0;
        validation.required_spec_claims =
            HashSet::from(["exp".to_string(), "iss".to_string()]);
        validation.set_issuer(&[settings.issuer.as_str()]);

        Self {
            encoding_key: EncodingKey::from_secret(settings.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(settings.secret.as_bytes()),
            validation,
            issuer: settings.issuer.clone(),
            ttl_seconds: settings.token_ttl_seconds,
        }
    }

    /// Configured token lifetime in seconds.
    pub fn ttl_seconds(&self) -> i64 {
        self.ttl_seconds
    }

    /// Issue a token for an account, valid from now.
    pub fn issue(&self, user_id: i64, name: &str) -> Result<String, AppError> {
        self.issue_at(user_id, name, Utc::now().timestamp())
    }

    /// Issue a token as if the current time were `now` (Unix seconds).
    pub fn issue_at(&self, user_id: i64, name: &str, now: i64) -> Result<String, AppError> {
        let claims = Claims {
            user_id,
            name: name.to_string(),
            iss: self.issuer.clone(),
            iat: now,
            nbf: now,
            exp: now + self.ttl_seconds,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
    }

    /// Check a token against the current time.
    pub fn verify(&self, token: &str) -> Result<i64, AppError> {
        match self.verify_at(token, Utc::now().timestamp()) {
            TokenVerdict::Valid(claims) => Ok(claims.user_id),
            TokenVerdict::Expired => Err(AppError::TokenExpired),
            TokenVerdict::Malformed => Err(AppError::InvalidToken),
        }
    }

    /// Check a token as if the current time were `now` (Unix seconds).
    ///
    /// A token is valid through the second named by `exp` and expired from
    /// the next second on.
    pub fn verify_at(&self, token: &str, now: i64) -> TokenVerdict {
        let claims = match decode::<Claims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => data.claims,
            Err(e) => {
                tracing::debug!(error = %e, "Rejected token");
                return TokenVerdict::Malformed;
            }
        };

        if claims.nbf > claims.exp || now < claims.nbf {
            return TokenVerdict::Malformed;
        }
        if now > claims.exp {
            return TokenVerdict::Expired;
        }

        TokenVerdict::Valid(claims)
    }
}
