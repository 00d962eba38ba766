use crate::domain::bookings::{Booking, BookingRepository};
use crate::shared::error::AppError;
use std::sync::Arc;

pub struct GetBookingUseCase {
    repo: Arc<dyn BookingRepository>,
}

impl GetBookingUseCase {
    pub fn new(repo: Arc<dyn BookingRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, reference: &str) -> Result<Booking, AppError> {
        self.repo
            .find_by_reference(reference)
            .await
            .map_err(AppError::InternalServerError)?
            .ok_or_else(|| AppError::not_found("Booking"))
    }
}
