//! Authentication request handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{
    AccessTokenResponse, LoginRequest, LogoutRequest, MessageResponse, RefreshRequest,
    RegisterRequest, RegisterResponse, TokenResponse,
};
use crate::services::auth;

/// `POST /register`: create a new account.
pub async fn register_handler(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    let resp = auth::register(&state, &body).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

/// `POST /login`: authenticate with username (or email) + password.
pub async fn login_handler(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let resp = auth::login(&state, &body).await?;
    Ok(Json(resp))
}

/// `POST /refresh`: exchange a refresh token for a non-fresh access token.
pub async fn refresh_handler(
    State(state): State<AppState>,
    Json(body): Json<RefreshRequest>,
) -> AppResult<Json<AccessTokenResponse>> {
    let resp = auth::refresh(&state, &body.refresh_token)?;
    Ok(Json(resp))
}

/// `POST /logout`: revoke the current access token (and optionally a
/// refresh token). The body may be omitted.
pub async fn logout_handler(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
    body: Option<Json<LogoutRequest>>,
) -> AppResult<Json<MessageResponse>> {
    let body = body.map(|Json(b)| b).unwrap_or_default();
    let resp = auth::logout(&state, &user.0, &body)?;
    Ok(Json(resp))
}
