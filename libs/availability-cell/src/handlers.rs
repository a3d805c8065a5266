use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::auth::AuthUser;
use shared_models::error::AppError;
use shared_store::AppState;

use crate::models::{AvailabilityRangeQuery, AvailabilityRequest};
use crate::services::availability::AvailabilityService;

#[axum::debug_handler]
pub async fn create_availability(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<AvailabilityRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let availability_service = AvailabilityService::new(&state);

    let slots = availability_service
        .create_availability(&user, request.date, request.start_time, request.end_time)
        .await?;

    Ok((StatusCode::CREATED, Json(json!(slots))))
}

#[axum::debug_handler]
pub async fn get_availability(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<AvailabilityRangeQuery>,
) -> Result<Json<Value>, AppError> {
    let availability_service = AvailabilityService::new(&state);

    let slots = match query.provider_id {
        // Asking for a specific provider's published slots
        Some(provider_id) => {
            availability_service
                .get_availabilities_for_provider(provider_id, query.from, query.to)
                .await
        }
        // Scope to the authenticated provider
        None => {
            availability_service
                .get_availabilities_for_current_provider(&user, query.from, query.to)
                .await
        }
    };

    Ok(Json(json!(slots)))
}

#[axum::debug_handler]
pub async fn update_availability(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<AvailabilityRequest>,
) -> Result<Json<Value>, AppError> {
    let availability_service = AvailabilityService::new(&state);

    let slot = availability_service
        .update_availability(&user, id, request.date, request.start_time, request.end_time)
        .await?;

    Ok(Json(json!(slot)))
}

#[axum::debug_handler]
pub async fn delete_availability(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let availability_service = AvailabilityService::new(&state);

    availability_service.delete_availability(&user, id).await?;

    Ok(StatusCode::NO_CONTENT)
}
