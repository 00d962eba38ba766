use crate::infrastructure::state::AppState;
use crate::presentation::handlers::auth;
use axum::{
    Router,
    routing::{get, post},
};

/// Auth routes - handles authentication endpoints
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/refresh-token", post(auth::refresh_token))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}
