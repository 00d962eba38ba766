use crate::domain::auth::{Clock, NewRefreshToken, RefreshToken, RefreshTokenRepository};
use crate::domain::bookings::{
    Booking, BookingRepository, BookingStatus, NewBooking, PaymentStatus, RoomIdentity, StayRange,
};
use crate::domain::users::{NewUser, User, UserRepository};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

/// In-memory booking store for tests. Applies the same half-open overlap
/// predicate as the Postgres repository.
#[derive(Clone, Default)]
pub struct MockBookingRepository {
    bookings: Arc<Mutex<Vec<Booking>>>,
    error: Option<String>,
}

impl MockBookingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_booking(
        self,
        room: &RoomIdentity,
        check_in: Date,
        check_out: Date,
        status: BookingStatus,
    ) -> Self {
        let booking = synthetic_booking(room, check_in, check_out, status);
        self.bookings.lock().unwrap().push(booking);
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn bookings(&self) -> Vec<Booking> {
        self.bookings.lock().unwrap().clone()
    }

    fn check_error(&self) -> Result<()> {
        if let Some(err) = &self.error {
            return Err(anyhow::anyhow!(err.clone()));
        }
        Ok(())
    }
}

pub fn synthetic_booking(
    room: &RoomIdentity,
    check_in: Date,
    check_out: Date,
    status: BookingStatus,
) -> Booking {
    let now = OffsetDateTime::now_utc();
    Booking {
        id: Uuid::new_v4(),
        booking_id: format!("BK-{}", &Uuid::new_v4().simple().to_string()[..8].to_uppercase()),
        user_id: None,
        first_name: "Test".to_string(),
        last_name: "Guest".to_string(),
        email: "guest@example.com".to_string(),
        phone: "+10000000000".to_string(),
        room_type: None,
        room_title: room.title.clone(),
        room_category: room.category.clone(),
        room_image: None,
        check_in,
        check_out,
        nights: (check_out - check_in).whole_days() as i32,
        guests: 2,
        special_requests: None,
        base_price: 100.0,
        tax_and_fees: 12.0,
        total_price: 112.0,
        status,
        payment_status: PaymentStatus::Paid,
        location: None,
        created_at: now,
        updated_at: now,
    }
}

#[async_trait]
impl BookingRepository for MockBookingRepository {
    async fn create_if_available(&self, booking: NewBooking) -> Result<Option<Booking>> {
        self.check_error()?;
        let stay = StayRange::new(booking.check_in, booking.check_out)
            .map_err(|e| anyhow::anyhow!(e))?;
        let room = RoomIdentity::new(booking.room_category.clone(), booking.room_title.clone());

        let mut bookings = self.bookings.lock().unwrap();
        let conflict = bookings.iter().any(|b| {
            b.status != BookingStatus::Cancelled
                && b.room() == room
                && StayRange::new(b.check_in, b.check_out)
                    .map(|existing| stay.overlaps(&existing))
                    .unwrap_or(false)
        });
        if conflict {
            return Ok(None);
        }

        let now = OffsetDateTime::now_utc();
        let created = Booking {
            id: Uuid::new_v4(),
            booking_id: booking.booking_id,
            user_id: booking.user_id,
            first_name: booking.first_name,
            last_name: booking.last_name,
            email: booking.email,
            phone: booking.phone,
            room_type: booking.room_type,
            room_title: booking.room_title,
            room_category: booking.room_category,
            room_image: booking.room_image,
            check_in: booking.check_in,
            check_out: booking.check_out,
            nights: booking.nights,
            guests: booking.guests,
            special_requests: booking.special_requests,
            base_price: booking.base_price,
            tax_and_fees: booking.tax_and_fees,
            total_price: booking.total_price,
            status: BookingStatus::Confirmed,
            payment_status: PaymentStatus::Paid,
            location: booking.location,
            created_at: now,
            updated_at: now,
        };
        bookings.push(created.clone());
        Ok(Some(created))
    }

    async fn find_overlapping(
        &self,
        room: &RoomIdentity,
        stay: &StayRange,
    ) -> Result<Vec<Booking>> {
        self.check_error()?;
        let bookings = self.bookings.lock().unwrap();
        Ok(bookings
            .iter()
            .filter(|b| {
                b.status != BookingStatus::Cancelled
                    && b.room() == *room
                    && StayRange::new(b.check_in, b.check_out)
                        .map(|existing| stay.overlaps(&existing))
                        .unwrap_or(false)
            })
            .cloned()
            .collect())
    }

    async fn find_by_reference(&self, reference: &str) -> Result<Option<Booking>> {
        self.check_error()?;
        let bookings = self.bookings.lock().unwrap();
        Ok(bookings
            .iter()
            .find(|b| b.id.to_string() == reference || b.booking_id == reference)
            .cloned())
    }

    async fn find_all(&self, email: Option<&str>) -> Result<Vec<Booking>> {
        self.check_error()?;
        let bookings = self.bookings.lock().unwrap();
        Ok(bookings
            .iter()
            .filter(|b| email.is_none_or(|e| b.email == e))
            .cloned()
            .collect())
    }

    async fn cancel(&self, reference: &str) -> Result<Option<Booking>> {
        self.check_error()?;
        let mut bookings = self.bookings.lock().unwrap();
        let Some(booking) = bookings
            .iter_mut()
            .find(|b| b.id.to_string() == reference || b.booking_id == reference)
        else {
            return Ok(None);
        };
        booking.status = BookingStatus::Cancelled;
        booking.payment_status = PaymentStatus::Refunded;
        booking.updated_at = OffsetDateTime::now_utc();
        Ok(Some(booking.clone()))
    }
}

#[derive(Clone, Default)]
pub struct MockUserRepository {
    users: Arc<Mutex<Vec<User>>>,
}

impl MockUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(self, user: User) -> Self {
        self.users.lock().unwrap().push(user);
        self
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, anyhow::Error> {
        let now = OffsetDateTime::now_utc();
        let user = User {
            id: Uuid::new_v4(),
            name: new_user.name,
            email: new_user.email,
            password_hash: new_user.password_hash,
            role: "user".to_string(),
            created_at: now,
            updated_at: now,
        };
        self.users.lock().unwrap().push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, anyhow::Error> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, anyhow::Error> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.email == email).cloned())
    }
}

#[derive(Clone, Default)]
pub struct MockRefreshTokenRepository {
    tokens: Arc<Mutex<Vec<RefreshToken>>>,
    error: Option<String>,
}

impl MockRefreshTokenRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(self, token: RefreshToken) -> Self {
        self.tokens.lock().unwrap().push(token);
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn tokens(&self) -> Vec<RefreshToken> {
        self.tokens.lock().unwrap().clone()
    }

    fn check_error(&self) -> Result<()> {
        if let Some(err) = &self.error {
            return Err(anyhow::anyhow!(err.clone()));
        }
        Ok(())
    }
}

#[async_trait]
impl RefreshTokenRepository for MockRefreshTokenRepository {
    async fn create(&self, token: NewRefreshToken) -> Result<RefreshToken> {
        self.check_error()?;
        let created = RefreshToken {
            id: Uuid::new_v4(),
            user_id: token.user_id,
            token_hash: token.token_hash,
            expires_at: token.expires_at,
            is_revoked: false,
            user_agent: token.user_agent,
            ip_address: token.ip_address,
            created_at: OffsetDateTime::now_utc(),
        };
        self.tokens.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<RefreshToken>> {
        self.check_error()?;
        let tokens = self.tokens.lock().unwrap();
        Ok(tokens.iter().find(|t| t.token_hash == token_hash).cloned())
    }

    async fn revoke(&self, id: Uuid) -> Result<bool> {
        self.check_error()?;
        let mut tokens = self.tokens.lock().unwrap();
        match tokens.iter_mut().find(|t| t.id == id) {
            Some(token) => {
                token.is_revoked = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn revoke_by_hash(&self, token_hash: &str) -> Result<bool> {
        self.check_error()?;
        let mut tokens = self.tokens.lock().unwrap();
        match tokens.iter_mut().find(|t| t.token_hash == token_hash) {
            Some(token) => {
                token.is_revoked = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_expired(&self) -> Result<u64> {
        self.check_error()?;
        let mut tokens = self.tokens.lock().unwrap();
        let before = tokens.len();
        let now = OffsetDateTime::now_utc();
        tokens.retain(|t| t.expires_at > now);
        Ok((before - tokens.len()) as u64)
    }
}

/// Fixed clock for expiry tests
#[derive(Clone)]
pub struct MockClock {
    now: Arc<Mutex<OffsetDateTime>>,
}

impl MockClock {
    pub fn at(now: OffsetDateTime) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    pub fn advance(&self, by: time::Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Clock for MockClock {
    fn now(&self) -> OffsetDateTime {
        *self.now.lock().unwrap()
    }
}
