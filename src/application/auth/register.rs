use crate::application::auth::token_utils::{SessionTokens, UserPublic, issue_session};
use crate::domain::auth::{AccessTokenService, ClientMeta, Clock, RefreshTokenRepository};
use crate::domain::password::PasswordHashingService;
use crate::domain::users::{NewUser, UserRepository};
use crate::shared::error::AppError;
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    #[schema(example = "Maria Santos")]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "maria@example.com")]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

pub struct RegisterOutput {
    pub user: UserPublic,
    pub tokens: SessionTokens,
}

pub struct RegisterUseCase {
    user_repo: Arc<dyn UserRepository>,
    refresh_token_repo: Arc<dyn RefreshTokenRepository>,
    token_service: Arc<dyn AccessTokenService>,
    password_service: Arc<dyn PasswordHashingService>,
    clock: Arc<dyn Clock>,
    refresh_expiry_days: i64,
}

impl RegisterUseCase {
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
    pub async fn execute(
        &self,
        req: RegisterRequest,
        meta: ClientMeta,
    ) -> Result<RegisterOutput, AppError> {
        let existing = self
            .user_repo
            .find_by_email(&req.email)
            .await
            .map_err(AppError::InternalServerError)?;

        if existing.is_some() {
            return Err(AppError::ValidationError(
                "User already exists".to_string(),
            ));
        }

        let password_hash = self
            .password_service
            .hash_password(&req.password)
            .map_err(AppError::InternalServerError)?;

        let user = self
            .user_repo
            .create(NewUser {
                name: req.name,
                email: req.email,
                password_hash,
            })
            .await
            .map_err(AppError::InternalServerError)?;

        let tokens = issue_session(
            user.id,
            meta,
            &self.token_service,
            &self.refresh_token_repo,
            &self.clock,
            self.refresh_expiry_days,
        )
        .await?;

        Ok(RegisterOutput {
            user: UserPublic::from(&user),
            tokens,
        })
    }
}
