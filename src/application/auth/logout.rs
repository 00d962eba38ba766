use crate::application::auth::token_utils::hash_token;
use crate::domain::auth::RefreshTokenRepository;
use crate::shared::error::AppError;
use std::sync::Arc;

pub struct LogoutUseCase {
    refresh_token_repo: Arc<dyn RefreshTokenRepository>,
}

impl LogoutUseCase {
    pub fn new(refresh_token_repo: Arc<dyn RefreshTokenRepository>) -> Self {
        Self { refresh_token_repo }
    }

    /// Revoke the presented refresh token. Succeeds even without a cookie or
    /// for an unknown token; logout must not fail for an already-dead session.
    pub async fn execute(&self, raw_token: Option<&str>) -> Result<(), AppError> {
        let Some(raw_token) = raw_token.filter(|t| !t.is_empty()) else {
            return Ok(());
        };

        self.refresh_token_repo
            .revoke_by_hash(&hash_token(raw_token))
            .await
            .map_err(AppError::InternalServerError)?;

        Ok(())
    }
}
