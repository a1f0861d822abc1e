use axum::{
    extract::{Query, State},
    routing::{get, put},
    Extension, Json, Router,
};

use crate::controllers::driver_controller::DriverController;
use crate::dto::auth_dto::{AccountResponse, LocationResponse, VehicleInput, VehicleResponse};
use crate::dto::driver_dto::{
    AvailabilityResponse, DriverListQuery, NearbyRideResponse, StatisticsQuery, StatisticsResponse,
    UpdateAvailabilityRequest, UpdateLocationRequest,
};
use crate::dto::ride_dto::RideResponse;
use crate::dto::ApiResponse;
use crate::middleware::auth::{require_admin, require_driver, AuthenticatedUser};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_driver_router() -> Router<AppState> {
    Router::new()
        .route("/location", put(update_location))
        .route("/availability", put(update_availability))
        .route("/vehicle", put(update_vehicle))
        .route("/statistics", get(statistics))
        .route("/nearby-requests", get(nearby_requests))
        .route("/current-ride", get(current_ride))
        .route("/all", get(list_all_drivers))
}

fn controller(state: &AppState) -> DriverController {
    DriverController::new(state.pool.clone(), &state.config)
}

async fn update_location(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<UpdateLocationRequest>,
) -> Result<Json<ApiResponse<LocationResponse>>, AppError> {
    require_driver(&user)?;
    let response = controller(&state)
        .update_location(user.account_id, request)
        .await?;
    Ok(Json(response))
}

async fn update_availability(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<UpdateAvailabilityRequest>,
) -> Result<Json<ApiResponse<AvailabilityResponse>>, AppError> {
    require_driver(&user)?;
    let response = controller(&state)
        .set_availability(user.account_id, request)
        .await?;
    Ok(Json(response))
}

async fn update_vehicle(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<VehicleInput>,
) -> Result<Json<ApiResponse<VehicleResponse>>, AppError> {
    require_driver(&user)?;
    let response = controller(&state)
        .update_vehicle(user.account_id, request)
        .await?;
    Ok(Json(response))
}

async fn statistics(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<StatisticsQuery>,
) -> Result<Json<ApiResponse<StatisticsResponse>>, AppError> {
    require_driver(&user)?;
    let response = controller(&state)
        .statistics(user.account_id, query.range)
        .await?;
    Ok(Json(ApiResponse::success(response)))
}

async fn nearby_requests(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<Vec<NearbyRideResponse>>>, AppError> {
    require_driver(&user)?;
    let response = controller(&state).nearby_requests(user.account_id).await?;
    Ok(Json(ApiResponse::success(response)))
}

async fn current_ride(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<RideResponse>>, AppError> {
    require_driver(&user)?;
    let response = controller(&state).current_ride(user.account_id).await?;
    Ok(Json(ApiResponse::success(response)))
}

async fn list_all_drivers(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<DriverListQuery>,
) -> Result<Json<ApiResponse<Vec<AccountResponse>>>, AppError> {
    require_admin(&user)?;
    let response = controller(&state).list_all(query.status).await?;
    Ok(Json(ApiResponse::success(response)))
}
