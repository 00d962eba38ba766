use crate::application::auth::token_utils::{SessionTokens, UserPublic, issue_session};
use crate::domain::auth::{AccessTokenService, ClientMeta, Clock, RefreshTokenRepository};
use crate::domain::password::PasswordHashingService;
use crate::domain::users::UserRepository;
use crate::shared::error::{AppError, AuthErrorCode};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "maria@example.com")]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug)]
pub struct LoginOutput {
    pub user: UserPublic,
    pub tokens: SessionTokens,
}

pub struct LoginUseCase {
    user_repo: Arc<dyn UserRepository>,
    refresh_token_repo: Arc<dyn RefreshTokenRepository>,
    token_service: Arc<dyn AccessTokenService>,
    password_service: Arc<dyn PasswordHashingService>,
    clock: Arc<dyn Clock>,
    refresh_expiry_days: i64,
}

impl LoginUseCase {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        refresh_token_repo: Arc<dyn RefreshTokenRepository>,
        token_service: Arc<dyn AccessTokenService>,
        password_service: Arc<dyn PasswordHashingService>,
        clock: Arc<dyn Clock>,
        refresh_expiry_days: i64,
    ) -> Self {
        Self {
            user_repo,
            refresh_token_repo,
            token_service,
            password_service,
            clock,
            refresh_expiry_days,
        }
    }

    #[tracing::instrument(skip(self, req, meta), fields(email = %req.email))]
    pub async fn execute(&self, req: LoginRequest, meta: ClientMeta) -> Result<LoginOutput, AppError> {
        let user = self
            .user_repo
            .find_by_email(&req.email)
            .await
            .map_err(AppError::InternalServerError)?
            .ok_or_else(|| {
                AppError::auth(AuthErrorCode::InvalidCredentials, "Invalid credentials")
            })?;

        let valid_password = self
            .password_service
            .verify_password(&req.password, &user.password_hash)
            .map_err(AppError::InternalServerError)?;

        if !valid_password {
            return Err(AppError::auth(
                AuthErrorCode::InvalidCredentials,
                "Invalid credentials",
            ));
        }

        let tokens = issue_session(
            user.id,
            meta,
            &self.token_service,
            &self.refresh_token_repo,
            &self.clock,
            self.refresh_expiry_days,
        )
        .await?;

        Ok(LoginOutput {
            user: UserPublic::from(&user),
            tokens,
        })
    }
}
