use crate::domain::bookings::{Booking, BookingRepository, NewBooking, RoomIdentity, StayRange};
use crate::infrastructure::db::DbPool;
use anyhow::Result;
use async_trait::async_trait;

/// The one overlap predicate both the standalone availability check and the
/// creation-time re-check are built from. Binds: $1 category, $2 title,
/// $3 check-in, $4 check-out. Half-open intervals: back-to-back stays pass.
const OVERLAP_CONDITION: &str = "room_category = $1 AND room_title = $2 \
     AND status <> 'cancelled' AND check_in < $4 AND $3 < check_out";

const BOOKING_COLUMNS: &str = "id, booking_id, user_id, first_name, last_name, email, phone, \
     room_type, room_title, room_category, room_image, check_in, check_out, nights, guests, \
     special_requests, base_price, tax_and_fees, total_price, status, payment_status, location, \
     created_at, updated_at";

/// SQLSTATE for a serialization failure; the transaction lost a race.
const SERIALIZATION_FAILURE: &str = "40001";

pub struct PostgresBookingRepository {
    pool: DbPool,
}

impl PostgresBookingRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn is_serialization_failure(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| code == SERIALIZATION_FAILURE)
}

#[async_trait]
impl BookingRepository for PostgresBookingRepository {
    /// Check-and-insert under a serializable transaction. Two concurrent
    /// requests for overlapping stays on the same room cannot both commit;
    /// the loser surfaces as `Ok(None)`, same as an ordinary conflict.
    async fn create_if_available(&self, booking: NewBooking) -> Result<Option<Booking>> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut *tx)
            .await?;

        let conflict: Option<(uuid::Uuid,)> = sqlx::query_as(&format!(
            "SELECT id FROM bookings WHERE {} LIMIT 1",
            OVERLAP_CONDITION
        ))
        .bind(&booking.room_category)
        .bind(&booking.room_title)
        .bind(booking.check_in)
        .bind(booking.check_out)
        .fetch_optional(&mut *tx)
        .await?;

        if conflict.is_some() {
            tx.rollback().await?;
            return Ok(None);
        }

        let insert = sqlx::query_as::<_, Booking>(&format!(
            r#"
            INSERT INTO bookings (
                booking_id, user_id, first_name, last_name, email, phone,
                room_type, room_title, room_category, room_image,
                check_in, check_out, nights, guests, special_requests,
                base_price, tax_and_fees, total_price, status, payment_status, location
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15,
                    $16, $17, $18, 'confirmed', 'paid', $19)
            RETURNING {}
            "#,
            BOOKING_COLUMNS
        ))
        .bind(&booking.booking_id)
        .bind(booking.user_id)
        .bind(&booking.first_name)
        .bind(&booking.last_name)
        .bind(&booking.email)
        .bind(&booking.phone)
        .bind(&booking.room_type)
        .bind(&booking.room_title)
        .bind(&booking.room_category)
        .bind(&booking.room_image)
        .bind(booking.check_in)
        .bind(booking.check_out)
        .bind(booking.nights)
        .bind(booking.guests)
        .bind(&booking.special_requests)
        .bind(booking.base_price)
        .bind(booking.tax_and_fees)
        .bind(booking.total_price)
        .bind(&booking.location)
        .fetch_one(&mut *tx)
        .await;

        let created = match insert {
            Ok(created) => created,
            Err(e) if is_serialization_failure(&e) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match tx.commit().await {
            Ok(()) => Ok(Some(created)),
            Err(e) if is_serialization_failure(&e) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_overlapping(
        &self,
        room: &RoomIdentity,
        stay: &StayRange,
    ) -> Result<Vec<Booking>> {
        let bookings = sqlx::query_as::<_, Booking>(&format!(
            "SELECT {} FROM bookings WHERE {} ORDER BY check_in",
            BOOKING_COLUMNS, OVERLAP_CONDITION
        ))
        .bind(&room.category)
        .bind(&room.title)
        .bind(stay.check_in())
        .bind(stay.check_out())
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    async fn find_by_reference(&self, reference: &str) -> Result<Option<Booking>> {
        let booking = sqlx::query_as::<_, Booking>(&format!(
            "SELECT {} FROM bookings WHERE id::text = $1 OR booking_id = $1",
            BOOKING_COLUMNS
        ))
        .bind(reference)
        .fetch_optional(&self.pool)
        .await?;

        Ok(booking)
    }

    async fn find_all(&self, email: Option<&str>) -> Result<Vec<Booking>> {
        let bookings = match email {
            Some(email) => {
                sqlx::query_as::<_, Booking>(&format!(
                    "SELECT {} FROM bookings WHERE email = $1 ORDER BY created_at DESC",
                    BOOKING_COLUMNS
                ))
                .bind(email)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Booking>(&format!(
                    "SELECT {} FROM bookings ORDER BY created_at DESC",
                    BOOKING_COLUMNS
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(bookings)
    }

    async fn cancel(&self, reference: &str) -> Result<Option<Booking>> {
        let booking = sqlx::query_as::<_, Booking>(&format!(
            r#"
            UPDATE bookings
            SET status = 'cancelled', payment_status = 'refunded', updated_at = NOW()
            WHERE id::text = $1 OR booking_id = $1
            RETURNING {}
            "#,
            BOOKING_COLUMNS
        ))
        .bind(reference)
        .fetch_optional(&self.pool)
        .await?;

        Ok(booking)
    }
}
