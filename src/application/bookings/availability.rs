use crate::domain::bookings::{BookingRepository, RoomIdentity, StayRange};
use crate::shared::error::AppError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use time::Date;
use validator::Validate;

/// Single gate for date-range availability. Both booking creation and the
/// public check endpoint go through this predicate so the two call sites
/// cannot drift apart.
pub struct AvailabilityEngine {
    booking_repo: Arc<dyn BookingRepository>,
}

impl AvailabilityEngine {
    pub fn new(booking_repo: Arc<dyn BookingRepository>) -> Self {
        Self { booking_repo }
    }

    /// True iff no non-cancelled booking for the room overlaps the stay.
    /// When the conflict query cannot be evaluated the room is reported as
    /// unavailable; availability is never assumed on error.
    pub async fn is_available(&self, room: &RoomIdentity, stay: &StayRange) -> bool {
        match self.booking_repo.find_overlapping(room, stay).await {
            Ok(conflicts) => conflicts.is_empty(),
            Err(e) => {
                tracing::error!(
                    room_category = %room.category,
                    room_title = %room.title,
                    "Availability query failed, treating room as unavailable: {:?}",
                    e
                );
                false
            }
        }
    }
}

#[derive(Debug, Deserialize, Validate, utoipa::IntoParams, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckAvailabilityQuery {
    #[validate(length(min = 1, message = "Room category is required"))]
    pub room_category: String,
    #[validate(length(min = 1, message = "Room title is required"))]
    pub room_title: String,
    #[param(value_type = String, example = "2024-06-01")]
    pub check_in: Date,
    #[param(value_type = String, example = "2024-06-05")]
    pub check_out: Date,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeSuggestion {
    #[schema(value_type = String, example = "2024-06-05")]
    pub check_in: Date,
    #[schema(value_type = String, example = "2024-06-09")]
    pub check_out: Date,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<DateRangeSuggestion>>,
}

pub struct CheckAvailabilityUseCase {
    engine: AvailabilityEngine,
}

impl CheckAvailabilityUseCase {
    pub fn new(booking_repo: Arc<dyn BookingRepository>) -> Self {
        Self {
            engine: AvailabilityEngine::new(booking_repo),
        }
    }

    pub async fn execute(
        &self,
        query: CheckAvailabilityQuery,
    ) -> Result<AvailabilityResponse, AppError> {
        let stay =
            StayRange::new(query.check_in, query.check_out).map_err(AppError::ValidationError)?;
        let room = RoomIdentity::new(query.room_category, query.room_title);

        if self.engine.is_available(&room, &stay).await {
            return Ok(AvailabilityResponse {
                available: true,
                suggestions: None,
            });
        }

        Ok(AvailabilityResponse {
            available: false,
            suggestions: Some(suggest_alternatives(&stay)),
        })
    }
}

/// Cosmetic alternatives offered when the requested range is taken: the same
/// stay length starting after the requested check-out. Not authoritative;
/// clients re-check before booking.
fn suggest_alternatives(stay: &StayRange) -> Vec<DateRangeSuggestion> {
    let nights = stay.nights();
    (1..=3)
        .map(|i| {
            let shifted = stay.shifted(i * nights);
            DateRangeSuggestion {
                check_in: shifted.check_in(),
                check_out: shifted.check_out(),
            }
        })
        .collect()
}
