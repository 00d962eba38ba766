use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

/// Booking lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, utoipa::ToSchema)]
#[sqlx(type_name = "booking_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, utoipa::ToSchema)]
#[sqlx(type_name = "payment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Refunded,
}

/// Pooled room identity. Two physical rooms sharing a category and title are
/// treated as interchangeable inventory; no per-unit id exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomIdentity {
    pub category: String,
    pub title: String,
}

impl RoomIdentity {
    pub fn new(category: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            title: title.into(),
        }
    }
}

/// Half-open stay interval `[check_in, check_out)`.
///
/// `check_out` is the departure date and is excluded, so a stay ending on a
/// given day and another starting that same day do not overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StayRange {
    check_in: Date,
    check_out: Date,
}

impl StayRange {
    /// Build a range, rejecting inverted or empty intervals.
    pub fn new(check_in: Date, check_out: Date) -> Result<Self, String> {
        if check_out <= check_in {
            return Err("check-out date must be after check-in date".to_string());
        }
        Ok(Self {
            check_in,
            check_out,
        })
    }

    pub fn check_in(&self) -> Date {
        self.check_in
    }

    pub fn check_out(&self) -> Date {
        self.check_out
    }

    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).whole_days()
    }

    /// Half-open interval overlap test. Equivalent to checking whether the
    /// new check-in falls inside the other stay, the new check-out falls
    /// inside it, or the new range fully contains it.
    pub fn overlaps(&self, other: &StayRange) -> bool {
        self.check_in < other.check_out && other.check_in < self.check_out
    }

    /// Shift the whole range forward by `days`.
    pub fn shifted(&self, days: i64) -> Self {
        Self {
            check_in: self.check_in + time::Duration::days(days),
            check_out: self.check_out + time::Duration::days(days),
        }
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    /// Human-facing reference, e.g. `BK-4F2A91C3`
    pub booking_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_type: Option<String>,
    pub room_title: String,
    pub room_category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_image: Option<String>,
    pub check_in: Date,
    pub check_out: Date,
    pub nights: i32,
    pub guests: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_requests: Option<String>,
    pub base_price: f64,
    pub tax_and_fees: f64,
    pub total_price: f64,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(with = "time::serde::iso8601")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::iso8601")]
    pub updated_at: OffsetDateTime,
}

impl Booking {
    pub fn room(&self) -> RoomIdentity {
        RoomIdentity::new(self.room_category.clone(), self.room_title.clone())
    }
}

#[derive(Debug, Clone)]
pub struct NewBooking {
    pub booking_id: String,
    pub user_id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub room_type: Option<String>,
    pub room_title: String,
    pub room_category: String,
    pub room_image: Option<String>,
    pub check_in: Date,
    pub check_out: Date,
    pub nights: i32,
    pub guests: i32,
    pub special_requests: Option<String>,
    pub base_price: f64,
    pub tax_and_fees: f64,
    pub total_price: f64,
    pub location: Option<String>,
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Insert a booking after re-checking the stay range against existing
    /// non-cancelled bookings for the same room, atomically. Returns
    /// `Ok(None)` when the range was taken between the caller's availability
    /// check and the insert.
    async fn create_if_available(&self, booking: NewBooking) -> Result<Option<Booking>>;

    /// Non-cancelled bookings for a room whose stay overlaps the given range.
    async fn find_overlapping(
        &self,
        room: &RoomIdentity,
        stay: &StayRange,
    ) -> Result<Vec<Booking>>;

    /// Lookup by system id or human booking reference.
    async fn find_by_reference(&self, reference: &str) -> Result<Option<Booking>>;

    async fn find_all(&self, email: Option<&str>) -> Result<Vec<Booking>>;

    /// Transition a booking to cancelled/refunded. Returns the updated row.
    async fn cancel(&self, reference: &str) -> Result<Option<Booking>>;
}
