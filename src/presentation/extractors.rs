use crate::domain::auth::{AccessTokenService, Claims, ClientMeta};
use crate::infrastructure::state::AppState;
use crate::shared::error::AppError;
use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};

/// Authenticated user extractor.
/// Validates the JWT from the Authorization header against the state-held
/// token service.
pub struct AuthUser {
    pub claims: Claims,
}

fn bearer_token(parts: &Parts) -> Result<Option<&str>, AppError> {
    let Some(auth_header) = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    else {
        return Ok(None);
    };

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        AppError::unauthorized("Invalid Authorization header format")
    })?;

    Ok(Some(token))
}

fn validate(state: &AppState, token: &str) -> Result<Claims, AppError> {
    state
        .token_service
        .validate_token(token)
        .map_err(|_| AppError::unauthorized("Invalid or expired token"))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?
            .ok_or_else(|| AppError::unauthorized("Missing Authorization header"))?;

        let claims = validate(state, token)?;

        Ok(AuthUser { claims })
    }
}

/// Like [`AuthUser`] but tolerates an absent Authorization header; a header
/// that is present but invalid is still rejected. Used where guest access is
/// allowed, e.g. booking creation.
pub struct OptionalAuthUser(pub Option<Claims>);

impl FromRequestParts<AppState> for OptionalAuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match bearer_token(parts)? {
            Some(token) => Ok(OptionalAuthUser(Some(validate(state, token)?))),
            None => Ok(OptionalAuthUser(None)),
        }
    }
}

/// Client metadata recorded alongside refresh tokens for audit
pub fn client_meta(headers: &HeaderMap) -> ClientMeta {
    ClientMeta {
        user_agent: headers
            .get(header::USER_AGENT)
            .and_then(|h| h.to_str().ok())
            .map(str::to_string),
        ip_address: headers
            .get("x-forwarded-for")
            .and_then(|h| h.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(|v| v.trim().to_string()),
    }
}
