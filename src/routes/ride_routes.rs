use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::ride_controller::RideController;
use crate::dto::ride_dto::{
    CreateRideRequest, CreateRideResponse, RateRideRequest, RideDetailResponse, RideResponse,
};
use crate::dto::ApiResponse;
use crate::middleware::auth::{require_driver, require_rider, AuthenticatedUser};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_ride_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_ride).get(list_rides))
        .route("/:ride_id", get(get_ride))
        .route("/:ride_id/accept", post(accept_ride))
        .route("/:ride_id/start", post(start_ride))
        .route("/:ride_id/complete", post(complete_ride))
        .route("/:ride_id/cancel", post(cancel_ride))
        .route("/:ride_id/rate", post(rate_ride))
}

fn controller(state: &AppState) -> RideController {
    RideController::new(state.pool.clone(), state.events.clone(), &state.config)
}

async fn create_ride(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateRideRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CreateRideResponse>>), AppError> {
    require_rider(&user)?;
    let response = controller(&state).create(user.account_id, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_rides(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<Vec<RideResponse>>>, AppError> {
    let rides = controller(&state).list(&user).await?;
    Ok(Json(ApiResponse::success(rides)))
}

async fn get_ride(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(ride_id): Path<Uuid>,
) -> Result<Json<ApiResponse<RideDetailResponse>>, AppError> {
    let ride = controller(&state).get_by_id(&user, ride_id).await?;
    Ok(Json(ApiResponse::success(ride)))
}

async fn accept_ride(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(ride_id): Path<Uuid>,
) -> Result<Json<ApiResponse<RideResponse>>, AppError> {
    require_driver(&user)?;
    let response = controller(&state).accept(user.account_id, ride_id).await?;
    Ok(Json(response))
}

async fn start_ride(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(ride_id): Path<Uuid>,
) -> Result<Json<ApiResponse<RideResponse>>, AppError> {
    require_driver(&user)?;
    let response = controller(&state).start(user.account_id, ride_id).await?;
    Ok(Json(response))
}

async fn complete_ride(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(ride_id): Path<Uuid>,
) -> Result<Json<ApiResponse<RideResponse>>, AppError> {
    require_driver(&user)?;
    let response = controller(&state).complete(user.account_id, ride_id).await?;
    Ok(Json(response))
}

async fn cancel_ride(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(ride_id): Path<Uuid>,
) -> Result<Json<ApiResponse<RideResponse>>, AppError> {
    require_rider(&user)?;
    let response = controller(&state).cancel(user.account_id, ride_id).await?;
    Ok(Json(response))
}

async fn rate_ride(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(ride_id): Path<Uuid>,
    Json(request): Json<RateRideRequest>,
) -> Result<Json<ApiResponse<RideResponse>>, AppError> {
    let response = controller(&state).rate(&user, ride_id, request).await?;
    Ok(Json(response))
}
