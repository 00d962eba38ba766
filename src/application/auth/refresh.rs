use crate::application::auth::token_utils::{UserPublic, hash_token};
use crate::domain::auth::{AccessTokenService, Clock, RefreshTokenRepository};
use crate::domain::users::UserRepository;
use crate::shared::error::{AppError, AuthErrorCode};
use std::sync::Arc;

#[derive(Debug)]
pub struct RefreshOutput {
    pub user: UserPublic,
    pub access_token: String,
}

/// Exchange a valid refresh token for a new access token. The refresh token
/// itself is not rotated; it stays usable until its own expiry.
pub struct RefreshTokenUseCase {
    refresh_token_repo: Arc<dyn RefreshTokenRepository>,
    user_repo: Arc<dyn UserRepository>,
    token_service: Arc<dyn AccessTokenService>,
    clock: Arc<dyn Clock>,
}

impl RefreshTokenUseCase {
    pub fn new(
        refresh_token_repo: Arc<dyn RefreshTokenRepository>,
        user_repo: Arc<dyn UserRepository>,
        token_service: Arc<dyn AccessTokenService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            refresh_token_repo,
            user_repo,
            token_service,
            clock,
        }
    }

    pub async fn execute(&self, raw_token: Option<&str>) -> Result<RefreshOutput, AppError> {
        let raw_token = match raw_token {
            Some(token) if !token.is_empty() => token,
            _ => {
                return Err(AppError::auth(
                    AuthErrorCode::RefreshTokenMissing,
                    "Refresh token not found",
                ));
            }
        };

        let stored = self
            .refresh_token_repo
            .find_by_hash(&hash_token(raw_token))
            .await
            .map_err(AppError::InternalServerError)?
            .ok_or_else(|| {
                AppError::auth(AuthErrorCode::InvalidRefreshToken, "Invalid refresh token")
            })?;

        if stored.is_revoked {
            return Err(AppError::auth(
                AuthErrorCode::InvalidRefreshToken,
                "Invalid refresh token",
            ));
        }

        // Lazy expiry detection: the row may outlive its expiry until the
        // passive purge runs, so the check happens here, on use.
        if stored.expires_at < self.clock.now() {
            self.refresh_token_repo
                .revoke(stored.id)
                .await
                .map_err(AppError::InternalServerError)?;
            return Err(AppError::auth(
                AuthErrorCode::RefreshTokenExpired,
                "Refresh token expired",
            ));
        }

        let user = self
            .user_repo
            .find_by_id(stored.user_id)
            .await
            .map_err(AppError::InternalServerError)?
            .ok_or_else(|| AppError::auth(AuthErrorCode::UserNotFound, "User not found"))?;

        let access_token = self
            .token_service
            .generate_access_token(user.id)
            .map_err(AppError::InternalServerError)?;

        Ok(RefreshOutput {
            user: UserPublic::from(&user),
            access_token,
        })
    }
}
