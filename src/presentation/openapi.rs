use crate::application::auth::login::LoginRequest;
use crate::application::auth::register::RegisterRequest;
use crate::application::auth::token_utils::UserPublic;
use crate::application::bookings::availability::{
    AvailabilityResponse, CheckAvailabilityQuery, DateRangeSuggestion,
};
use crate::application::bookings::create::CreateBookingRequest;
use crate::domain::bookings::{Booking, BookingStatus, PaymentStatus};
use crate::presentation::handlers::auth::{AuthResponse, LogoutResponse};
use crate::shared::error::ErrorResponse;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Veranda Booking API",
        version = "0.1.0",
        description = "Hotel booking REST API with availability checking and cookie-based session refresh"
    ),
    paths(
        crate::presentation::handlers::auth::register,
        crate::presentation::handlers::auth::login,
        crate::presentation::handlers::auth::refresh_token,
        crate::presentation::handlers::auth::logout,
        crate::presentation::handlers::auth::me,
        crate::presentation::handlers::bookings::create_booking,
        crate::presentation::handlers::bookings::check_availability,
        crate::presentation::handlers::bookings::list_bookings,
        crate::presentation::handlers::bookings::get_booking,
        crate::presentation::handlers::bookings::cancel_booking,
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            AuthResponse,
            LogoutResponse,
            UserPublic,
            CreateBookingRequest,
            CheckAvailabilityQuery,
            AvailabilityResponse,
            DateRangeSuggestion,
            Booking,
            BookingStatus,
            PaymentStatus,
            ErrorResponse,
        )
    ),
    tags(
        (name = "auth", description = "Authentication endpoints"),
        (name = "bookings", description = "Booking and availability endpoints")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
