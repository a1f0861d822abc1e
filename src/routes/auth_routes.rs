use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::{get, post, put},
    Extension, Json, Router,
};

use crate::controllers::auth_controller::AuthController;
use crate::dto::auth_dto::{
    AccountResponse, AuthResponse, ChangePasswordRequest, CreateAdminRequest, LoginRequest,
    RegisterRequest, UpdateProfileRequest,
};
use crate::dto::ApiResponse;
use crate::middleware::auth::{auth_middleware, require_admin, AuthenticatedUser};
use crate::models::account::AccountRole;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_auth_router(state: AppState) -> Router<AppState> {
    // Las rutas de perfil requieren token; registro y login no
    let protected = Router::new()
        .route("/profile", get(get_profile).put(update_profile))
        .route("/change-password", put(change_password))
        .route("/create-admin", post(create_admin))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/rider/register", post(register_rider))
        .route("/rider/login", post(login_rider))
        .route("/driver/register", post(register_driver))
        .route("/driver/login", post(login_driver))
        .merge(protected)
}

async fn register_rider(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>), AppError> {
    let controller = AuthController::new(state.pool.clone(), &state.config);
    let response = controller.register(AccountRole::Rider, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn register_driver(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>), AppError> {
    let controller = AuthController::new(state.pool.clone(), &state.config);
    let response = controller.register(AccountRole::Driver, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn login_rider(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, AppError> {
    let controller = AuthController::new(state.pool.clone(), &state.config);
    let response = controller.login(AccountRole::Rider, request).await?;
    Ok(Json(response))
}

async fn login_driver(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, AppError> {
    let controller = AuthController::new(state.pool.clone(), &state.config);
    let response = controller.login(AccountRole::Driver, request).await?;
    Ok(Json(response))
}

async fn get_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<AccountResponse>>, AppError> {
    let controller = AuthController::new(state.pool.clone(), &state.config);
    let profile = controller.profile(user.account_id).await?;
    Ok(Json(ApiResponse::success(profile)))
}

async fn update_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<AccountResponse>>, AppError> {
    let controller = AuthController::new(state.pool.clone(), &state.config);
    let response = controller.update_profile(&user, request).await?;
    Ok(Json(response))
}

async fn change_password(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = AuthController::new(state.pool.clone(), &state.config);
    let response = controller.change_password(user.account_id, request).await?;
    Ok(Json(response))
}

async fn create_admin(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateAdminRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AccountResponse>>), AppError> {
    require_admin(&user)?;
    let controller = AuthController::new(state.pool.clone(), &state.config);
    let response = controller.create_admin(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}
