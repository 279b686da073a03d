//! Bearer-token session extraction.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use engine::SessionContext;

use crate::error::ApiError;
use crate::state::AppState;

/// The caller's session, resolved from `Authorization: Bearer <token>`.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: String,
    pub context: SessionContext,
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}

#[async_trait]
impl FromRequestParts<AppState> for AuthSession {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(ApiError::Unauthorized)?;
        let context = state
            .sessions
            .get(token)
            .await
            .ok_or(ApiError::Unauthorized)?;
        Ok(Self {
            token: token.to_string(),
            context,
        })
    }
}
