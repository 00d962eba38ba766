use crate::application::auth::login::{LoginRequest, LoginUseCase};
use crate::application::auth::logout::LogoutUseCase;
use crate::application::auth::me::GetMeUseCase;
use crate::application::auth::refresh::RefreshTokenUseCase;
use crate::application::auth::register::{RegisterRequest, RegisterUseCase};
use crate::application::auth::token_utils::{SessionTokens, UserPublic};
use crate::domain::auth::{AccessTokenService, Clock, SystemClock};
use crate::infrastructure::password::PasswordService;
use crate::infrastructure::repositories::refresh_tokens::PostgresRefreshTokenRepository;
use crate::infrastructure::repositories::users::PostgresUserRepository;
use crate::infrastructure::state::AppState;
use crate::presentation::extractors::{AuthUser, client_meta};
use crate::shared::error::{AppError, ErrorResponse};
use crate::shared::response::ApiResponse;
use crate::shared::validation::ValidatedJson;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Serialize;
use std::sync::Arc;
use time::{Duration, OffsetDateTime};

/// Cookie carrying the opaque refresh token. Scoped so browsers only send it
/// back on the refresh endpoint itself.
const REFRESH_COOKIE: &str = "refreshToken";
const REFRESH_COOKIE_PATH: &str = "/api/v1/auth/refresh-token";

/// Body returned by register, login and refresh. The refresh token is
/// deliberately absent; it travels only in the scoped cookie.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AuthResponse {
    pub success: bool,
    pub user: UserPublic,
    pub token: String,
}

fn refresh_cookie(state: &AppState, tokens: &SessionTokens) -> Cookie<'static> {
    let max_age = tokens.refresh_expires_at - OffsetDateTime::now_utc();
    Cookie::build((REFRESH_COOKIE, tokens.refresh_token.clone()))
        .path(REFRESH_COOKIE_PATH)
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(state.config.is_production())
        .max_age(max_age)
        .build()
}

fn clear_refresh_cookie(state: &AppState) -> Cookie<'static> {
    Cookie::build((REFRESH_COOKIE, ""))
        .path(REFRESH_COOKIE_PATH)
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(state.config.is_production())
        .max_age(Duration::ZERO)
        .build()
}

/// Register handler
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = AuthResponse),
        (status = 400, description = "Validation error", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let use_case = RegisterUseCase::new(
        Arc::new(PostgresUserRepository::new(state.pool.clone())),
        Arc::new(PostgresRefreshTokenRepository::new(state.pool.clone())),
        state.token_service.clone() as Arc<dyn AccessTokenService>,
        Arc::new(PasswordService::new()),
        clock,
        state.config.refresh_token_expiry_days,
    );

    let output = use_case.execute(req, client_meta(&headers)).await?;

    let jar = jar.add(refresh_cookie(&state, &output.tokens));
    let body = AuthResponse {
        success: true,
        user: output.user,
        token: output.tokens.access_token,
    };

    Ok((StatusCode::CREATED, jar, Json(body)))
}

/// Login handler
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 400, description = "Validation error", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let use_case = LoginUseCase::new(
        Arc::new(PostgresUserRepository::new(state.pool.clone())),
        Arc::new(PostgresRefreshTokenRepository::new(state.pool.clone())),
        state.token_service.clone() as Arc<dyn AccessTokenService>,
        Arc::new(PasswordService::new()),
        clock,
        state.config.refresh_token_expiry_days,
    );

    let output = use_case.execute(req, client_meta(&headers)).await?;

    let jar = jar.add(refresh_cookie(&state, &output.tokens));
    let body = AuthResponse {
        success: true,
        user: output.user,
        token: output.tokens.access_token,
    };

    Ok((StatusCode::OK, jar, Json(body)))
}

/// Refresh token handler. Reads the opaque token from the scoped cookie and
/// mints a fresh access token; the refresh token is not rotated.
#[utoipa::path(
    post,
    path = "/auth/refresh-token",
    responses(
        (status = 200, description = "Token refreshed", body = AuthResponse),
        (status = 401, description = "Missing or invalid refresh token", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn refresh_token(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let use_case = RefreshTokenUseCase::new(
        Arc::new(PostgresRefreshTokenRepository::new(state.pool.clone())),
        Arc::new(PostgresUserRepository::new(state.pool.clone())),
        state.token_service.clone() as Arc<dyn AccessTokenService>,
        clock,
    );

    let raw_token = jar.get(REFRESH_COOKIE).map(|c| c.value().to_string());
    let output = use_case.execute(raw_token.as_deref()).await?;

    let body = AuthResponse {
        success: true,
        user: output.user,
        token: output.access_token,
    };

    Ok((StatusCode::OK, Json(body)))
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct LogoutResponse {
    pub success: bool,
    pub message: String,
}

/// Logout handler. Revokes the presented refresh token (if any) and clears
/// the cookie. Succeeds even when no token was presented.
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Logged out", body = LogoutResponse)
    ),
    tag = "auth"
)]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    let use_case = LogoutUseCase::new(Arc::new(PostgresRefreshTokenRepository::new(
        state.pool.clone(),
    )));

    let raw_token = jar.get(REFRESH_COOKIE).map(|c| c.value().to_string());
    use_case.execute(raw_token.as_deref()).await?;

    let jar = jar.add(clear_refresh_cookie(&state));
    let body = LogoutResponse {
        success: true,
        message: "Logged out successfully".to_string(),
    };

    Ok((StatusCode::OK, jar, Json(body)))
}

/// Current user handler
#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "Current user", body = ApiResponse<UserPublic>),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "auth"
)]
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let use_case = GetMeUseCase::new(Arc::new(PostgresUserRepository::new(state.pool.clone())));

    let user = use_case.execute(auth.claims.user_id()?).await?;

    Ok((StatusCode::OK, Json(ApiResponse::new(user))))
}
