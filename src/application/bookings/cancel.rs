use crate::domain::bookings::{Booking, BookingRepository};
use crate::shared::error::AppError;
use std::sync::Arc;

pub struct CancelBookingUseCase {
    repo: Arc<dyn BookingRepository>,
}

impl CancelBookingUseCase {
    pub fn new(repo: Arc<dyn BookingRepository>) -> Self {
        Self { repo }
    }

    /// Flip the booking to cancelled/refunded. Cancelling an already
    /// cancelled booking is a no-op and succeeds.
    #[tracing::instrument(skip(self))]
    pub async fn execute(&self, reference: &str) -> Result<Booking, AppError> {
        self.repo
            .cancel(reference)
            .await
            .map_err(AppError::InternalServerError)?
            .ok_or_else(|| AppError::not_found("Booking"))
    }
}
