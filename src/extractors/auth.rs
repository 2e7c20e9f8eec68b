//! Authenticated caller extracted from the `Authorization: Bearer` header.

use crate::auth::TokenVerifier;
use crate::error::AppError;
use crate::state::AppState;
use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

/// The caller's user id. Handlers taking this reject unauthenticated requests with 401.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: i64,
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(*user);
        }

        let Some(value) = parts.headers.get(header::AUTHORIZATION) else {
            tracing::debug!(uri = %parts.uri, "missing credentials");
            return Err(AppError::Unauthorized(
                "Authentication credentials were not provided.".into(),
            ));
        };
        let token = value
            .to_str()
            .map_err(|_| AppError::Unauthorized("Invalid token header.".into()))
            .and_then(|v| {
                TokenVerifier::extract_bearer(v)
                    .map_err(|_| AppError::Unauthorized("Invalid token header.".into()))
            })?;

        match state.tokens.verify(token) {
            Ok(id) => {
                let user = CurrentUser { id };
                parts.extensions.insert(user);
                Ok(user)
            }
            Err(e) => {
                tracing::warn!(error = %e, uri = %parts.uri, "token rejected");
                Err(AppError::Unauthorized("Invalid token.".into()))
            }
        }
    }
}
