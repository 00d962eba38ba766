use crate::application::bookings::availability::AvailabilityEngine;
use crate::domain::bookings::{Booking, BookingRepository, NewBooking, RoomIdentity, StayRange};
use crate::shared::error::AppError;
use rand::Rng;
use serde::Deserialize;
use std::sync::Arc;
use time::Date;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    #[validate(length(min = 1, message = "First name is required"))]
    #[schema(example = "Maria")]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    #[schema(example = "Santos")]
    pub last_name: String,
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "maria@example.com")]
    pub email: String,
    #[validate(length(min = 1, message = "Phone number is required"))]
    #[schema(example = "+639171234567")]
    pub phone: String,
    pub room_type: Option<String>,
    #[validate(length(min = 1, message = "Room title is required"))]
    #[schema(example = "Deluxe-201")]
    pub room_title: String,
    #[validate(length(min = 1, message = "Room category is required"))]
    #[schema(example = "deluxe-room")]
    pub room_category: String,
    pub room_image: Option<String>,
    #[schema(value_type = String, example = "2024-06-01")]
    pub check_in: Date,
    #[schema(value_type = String, example = "2024-06-05")]
    pub check_out: Date,
    #[validate(range(min = 1, message = "At least one guest is required"))]
    #[schema(example = 2)]
    pub guests: i32,
    pub special_requests: Option<String>,
    #[validate(range(min = 0.0, message = "Base price cannot be negative"))]
    pub base_price: f64,
    #[validate(range(min = 0.0, message = "Tax and fees cannot be negative"))]
    pub tax_and_fees: f64,
    #[validate(range(min = 0.0, message = "Total price cannot be negative"))]
    pub total_price: f64,
    pub location: Option<String>,
}

pub struct CreateBookingUseCase {
    booking_repo: Arc<dyn BookingRepository>,
    engine: AvailabilityEngine,
}

impl CreateBookingUseCase {
    pub fn new(booking_repo: Arc<dyn BookingRepository>) -> Self {
        Self {
            engine: AvailabilityEngine::new(booking_repo.clone()),
            booking_repo,
        }
    }

    #[tracing::instrument(skip(self, req), fields(room_title = %req.room_title))]
    pub async fn execute(
        &self,
        req: CreateBookingRequest,
        user_id: Option<Uuid>,
    ) -> Result<Booking, AppError> {
        let stay = StayRange::new(req.check_in, req.check_out).map_err(AppError::ValidationError)?;
        let room = RoomIdentity::new(req.room_category.clone(), req.room_title.clone());

        // Pre-check through the shared engine; the repository re-checks the
        // same predicate inside a serializable transaction, so two racing
        // requests cannot both commit overlapping stays.
        if !self.engine.is_available(&room, &stay).await {
            return Err(AppError::Conflict(
                "Room is not available for the selected dates".to_string(),
            ));
        }

        let new_booking = NewBooking {
            booking_id: generate_booking_reference(),
            user_id,
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            phone: req.phone,
            room_type: req.room_type,
            room_title: req.room_title,
            room_category: req.room_category,
            room_image: req.room_image,
            check_in: stay.check_in(),
            check_out: stay.check_out(),
            nights: stay.nights() as i32,
            guests: req.guests,
            special_requests: req.special_requests,
            base_price: req.base_price,
            tax_and_fees: req.tax_and_fees,
            total_price: req.total_price,
            location: req.location,
        };

        let booking = self
            .booking_repo
            .create_if_available(new_booking)
            .await
            .map_err(AppError::InternalServerError)?
            .ok_or_else(|| {
                AppError::Conflict("Room is not available for the selected dates".to_string())
            })?;

        tracing::info!("New booking created: {}", booking.booking_id);

        Ok(booking)
    }
}

/// Human-facing booking reference, e.g. `BK-4F2A91C3`
fn generate_booking_reference() -> String {
    let mut rng = rand::thread_rng();
    format!("BK-{:08X}", rng.r#gen::<u32>())
}
