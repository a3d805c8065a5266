use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};

use shared_models::auth::AuthUser;
use shared_models::error::AppError;
use shared_store::AppState;

use crate::models::{AuthRequest, AuthResponse, RegisterRequest, RegisterResponse};
use crate::services::auth::AuthService;

#[axum::debug_handler]
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let service = AuthService::new(&state);
    let user = service.register_user(request).await?;

    let response = RegisterResponse {
        id: user.id,
        username: user.username,
        email: user.email,
        roles: user.roles,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AuthRequest>,
) -> Result<impl IntoResponse, AppError> {
    let service = AuthService::new(&state);
    let (token, user) = service.login(request).await?;

    Ok(Json(AuthResponse { token, user }))
}

#[axum::debug_handler]
pub async fn me(Extension(user): Extension<AuthUser>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(user))
}
