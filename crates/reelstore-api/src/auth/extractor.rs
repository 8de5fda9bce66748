use crate::error::HttpAppError;
use crate::state::AppState;
use axum::extract::FromRequestParts;
use axum::http::{header::AUTHORIZATION, request::Parts};
use reelstore_core::AppError;
use std::sync::Arc;
use uuid::Uuid;

/// Verified principal resolved from the `Authorization: Bearer` header.
///
/// Implemented on request parts so it composes with `Multipart`.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
}

pub(crate) fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or_else(|| AppError::Unauthenticated("Missing Authorization header".to_string()))?
        .to_str()
        .map_err(|_| AppError::Unauthenticated("Malformed Authorization header".to_string()))?;

    match header.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() => {
            Ok(token.trim())
        }
        _ => Err(AppError::Unauthenticated(
            "Authorization header must use the Bearer scheme".to_string(),
        )),
    }
}

impl FromRequestParts<Arc<AppState>> for AuthenticatedUser {
    type Rejection = HttpAppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let user_id = state.jwt.verify(token)?;
        Ok(AuthenticatedUser { user_id })
    }
}
