use crate::domain::auth::{
    AccessTokenService, ClientMeta, Clock, NewRefreshToken, RefreshTokenRepository,
};
use crate::domain::users::User;
use crate::shared::error::AppError;
use rand::RngCore;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt::Write;
use std::sync::Arc;
use time::OffsetDateTime;
use uuid::Uuid;

/// User fields safe to expose in auth responses
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserPublic {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
}

impl From<&User> for UserPublic {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role.clone(),
        }
    }
}

/// Tokens minted for a login or registration. The refresh token is raw here;
/// it must only ever leave the server inside the scoped cookie.
#[derive(Debug)]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub refresh_expires_at: OffsetDateTime,
}

/// SHA-256 hash of a token string; what actually gets persisted.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Opaque refresh token: 40 bytes of OS randomness, hex encoded.
pub fn generate_opaque_token() -> String {
    let mut bytes = [0u8; 40];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().fold(String::with_capacity(80), |mut out, b| {
        let _ = write!(out, "{:02x}", b);
        out
    })
}

/// Mint an access token and a persisted refresh token for a user. Expired
/// refresh rows are purged on the way in, standing in for a TTL index.
pub async fn issue_session(
    user_id: Uuid,
    meta: ClientMeta,
    token_service: &Arc<dyn AccessTokenService>,
    refresh_token_repo: &Arc<dyn RefreshTokenRepository>,
    clock: &Arc<dyn Clock>,
    refresh_expiry_days: i64,
) -> Result<SessionTokens, AppError> {
    let access_token = token_service
        .generate_access_token(user_id)
        .map_err(AppError::InternalServerError)?;

    let refresh_token = generate_opaque_token();
    let expires_at = clock.now() + time::Duration::days(refresh_expiry_days);

    if let Err(e) = refresh_token_repo.delete_expired().await {
        tracing::warn!("Failed to purge expired refresh tokens: {:?}", e);
    }

    refresh_token_repo
        .create(NewRefreshToken {
            user_id,
            token_hash: hash_token(&refresh_token),
            expires_at,
            user_agent: meta.user_agent,
            ip_address: meta.ip_address,
        })
        .await
        .map_err(AppError::InternalServerError)?;

    Ok(SessionTokens {
        access_token,
        refresh_token,
        refresh_expires_at: expires_at,
    })
}
