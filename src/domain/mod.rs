pub mod auth;
pub mod bookings;
pub mod password;
pub mod users;
