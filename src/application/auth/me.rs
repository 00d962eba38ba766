use crate::application::auth::token_utils::UserPublic;
use crate::domain::users::UserRepository;
use crate::shared::error::AppError;
use std::sync::Arc;
use uuid::Uuid;

pub struct GetMeUseCase {
    user_repo: Arc<dyn UserRepository>,
}

impl GetMeUseCase {
    pub fn new(user_repo: Arc<dyn UserRepository>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(&self, user_id: Uuid) -> Result<UserPublic, AppError> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await
            .map_err(AppError::InternalServerError)?
            .ok_or_else(|| AppError::not_found("User"))?;

        Ok(UserPublic::from(&user))
    }
}
