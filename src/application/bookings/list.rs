use crate::domain::bookings::{Booking, BookingRepository};
use crate::shared::error::AppError;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
pub struct ListBookingsQuery {
    /// Restrict results to bookings made under this email
    pub email: Option<String>,
}

pub struct ListBookingsUseCase {
    repo: Arc<dyn BookingRepository>,
}

impl ListBookingsUseCase {
    pub fn new(repo: Arc<dyn BookingRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, query: ListBookingsQuery) -> Result<Vec<Booking>, AppError> {
        self.repo
            .find_all(query.email.as_deref())
            .await
            .map_err(AppError::InternalServerError)
    }
}
