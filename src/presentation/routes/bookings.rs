use crate::infrastructure::state::AppState;
use crate::presentation::handlers::bookings;
use axum::{
    Router,
    routing::{get, post, put},
};

/// Booking routes - creation, availability, lookup and cancellation
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(bookings::create_booking).get(bookings::list_bookings),
        )
        .route("/check-availability", get(bookings::check_availability))
        .route("/{id}", get(bookings::get_booking))
        .route("/{id}/cancel", put(bookings::cancel_booking))
}
