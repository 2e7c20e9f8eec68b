//! Bearer token verification. Tokens are issued by the external identity provider
//! (HS256, numeric user id in `sub`); this service only verifies them.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Caller's user id.
    pub sub: String,
    pub exp: u64,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TokenError {
    #[error("invalid authorization header")]
    MalformedHeader,
    #[error("token expired")]
    Expired,
    #[error("invalid token: {0}")]
    Invalid(String),
    #[error("subject is not a user id: {0}")]
    BadSubject(String),
}

#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn from_secret(secret: &[u8]) -> Self {
        TokenVerifier {
            decoding_key: DecodingKey::from_secret(secret),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Token from an `Authorization: Bearer <token>` header value.
    pub fn extract_bearer(header: &str) -> Result<&str, TokenError> {
        let (scheme, token) = header.trim().split_once(' ').ok_or(TokenError::MalformedHeader)?;
        if !scheme.eq_ignore_ascii_case("bearer") || token.trim().is_empty() {
            return Err(TokenError::MalformedHeader);
        }
        Ok(token.trim())
    }

    /// Verify signature and expiry, returning the caller's user id.
    pub fn verify(&self, token: &str) -> Result<i64, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            }
        })?;
        data.claims
            .sub
            .parse::<i64>()
            .map_err(|_| TokenError::BadSubject(data.claims.sub.clone()))
    }
}
