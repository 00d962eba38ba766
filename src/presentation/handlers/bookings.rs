use crate::application::bookings::availability::{
    AvailabilityResponse, CheckAvailabilityQuery, CheckAvailabilityUseCase,
};
use crate::application::bookings::cancel::CancelBookingUseCase;
use crate::application::bookings::create::{CreateBookingRequest, CreateBookingUseCase};
use crate::application::bookings::get::GetBookingUseCase;
use crate::application::bookings::list::{ListBookingsQuery, ListBookingsUseCase};
use crate::domain::bookings::Booking;
use crate::infrastructure::repositories::bookings::PostgresBookingRepository;
use crate::infrastructure::state::AppState;
use crate::presentation::extractors::{AuthUser, OptionalAuthUser};
use crate::shared::error::{AppError, ErrorResponse};
use crate::shared::response::ApiResponse;
use crate::shared::validation::ValidatedJson;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use validator::Validate;

/// Create booking handler. Works for guests; when a valid bearer token is
/// presented the booking is attributed to that user.
#[utoipa::path(
    post,
    path = "/bookings",
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Booking created", body = ApiResponse<Booking>),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 409, description = "Room not available for the selected dates", body = ErrorResponse)
    ),
    tag = "bookings"
)]
pub async fn create_booking(
    State(state): State<AppState>,
    OptionalAuthUser(claims): OptionalAuthUser,
    ValidatedJson(req): ValidatedJson<CreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let use_case =
        CreateBookingUseCase::new(Arc::new(PostgresBookingRepository::new(state.pool.clone())));

    let user_id = match claims {
        Some(claims) => Some(claims.user_id()?),
        None => None,
    };

    let booking = use_case.execute(req, user_id).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::new(booking))))
}

/// Availability check handler
#[utoipa::path(
    get,
    path = "/bookings/check-availability",
    params(CheckAvailabilityQuery),
    responses(
        (status = 200, description = "Availability result", body = AvailabilityResponse),
        (status = 400, description = "Validation error", body = ErrorResponse)
    ),
    tag = "bookings"
)]
pub async fn check_availability(
    State(state): State<AppState>,
    Query(query): Query<CheckAvailabilityQuery>,
) -> Result<impl IntoResponse, AppError> {
    query
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let use_case =
        CheckAvailabilityUseCase::new(Arc::new(PostgresBookingRepository::new(state.pool.clone())));

    let response = use_case.execute(query).await?;

    Ok((StatusCode::OK, Json(response)))
}

/// List bookings handler. Listing exposes guest contact details, so it
/// requires an authenticated user; single-booking lookup stays open because
/// the reference itself acts as the capability.
#[utoipa::path(
    get,
    path = "/bookings",
    params(ListBookingsQuery),
    responses(
        (status = 200, description = "Bookings", body = ApiResponse<Vec<Booking>>),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "bookings"
)]
pub async fn list_bookings(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListBookingsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let use_case =
        ListBookingsUseCase::new(Arc::new(PostgresBookingRepository::new(state.pool.clone())));

    let bookings = use_case.execute(query).await?;
    let count = bookings.len();

    Ok((
        StatusCode::OK,
        Json(ApiResponse::new(bookings).with_count(count)),
    ))
}

/// Get booking handler. `id` accepts either the UUID or the human-facing
/// booking reference.
#[utoipa::path(
    get,
    path = "/bookings/{id}",
    params(("id" = String, Path, description = "Booking id or reference")),
    responses(
        (status = 200, description = "Booking", body = ApiResponse<Booking>),
        (status = 404, description = "Booking not found", body = ErrorResponse)
    ),
    tag = "bookings"
)]
pub async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let use_case =
        GetBookingUseCase::new(Arc::new(PostgresBookingRepository::new(state.pool.clone())));

    let booking = use_case.execute(&id).await?;

    Ok((StatusCode::OK, Json(ApiResponse::new(booking))))
}

/// Cancel booking handler. Idempotent; cancelling twice returns the same
/// cancelled booking.
#[utoipa::path(
    put,
    path = "/bookings/{id}/cancel",
    params(("id" = String, Path, description = "Booking id or reference")),
    responses(
        (status = 200, description = "Booking cancelled", body = ApiResponse<Booking>),
        (status = 404, description = "Booking not found", body = ErrorResponse)
    ),
    tag = "bookings"
)]
pub async fn cancel_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let use_case =
        CancelBookingUseCase::new(Arc::new(PostgresBookingRepository::new(state.pool.clone())));

    let booking = use_case.execute(&id).await?;

    Ok((StatusCode::OK, Json(ApiResponse::new(booking))))
}
