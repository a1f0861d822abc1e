mod config;
mod controllers;
mod database;
mod dto;
mod middleware;
mod models;
mod repositories;
mod routes;
mod services;
mod state;
mod utils;

use anyhow::Result;
use axum::{middleware as axum_middleware, response::Json, routing::get, Router};
use dotenvy::dotenv;
use serde_json::json;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use config::environment::EnvironmentConfig;
use middleware::auth::auth_middleware;
use middleware::cors::{cors_middleware, cors_middleware_with_origins};
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let config = EnvironmentConfig::default();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(if config.is_development() {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    info!("🚕 Ride Hailing - API Backend");
    info!("=============================");

    // Inicializar base de datos
    let pool = match database::create_pool(None).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };
    info!("✅ PostgreSQL conectado exitosamente");

    // CORS: en desarrollo se permite cualquier origen
    let cors = if config.cors_origins.is_empty() {
        cors_middleware()
    } else {
        cors_middleware_with_origins(config.cors_origins.clone())
    };

    let app_state = AppState::new(pool, config.clone());

    // Router de la API: rides y drivers requieren token, auth maneja el suyo
    let app = Router::new()
        .route("/health", get(health_endpoint))
        .nest(
            "/api/auth",
            routes::auth_routes::create_auth_router(app_state.clone()),
        )
        .nest(
            "/api/rides",
            routes::ride_routes::create_ride_router().route_layer(
                axum_middleware::from_fn_with_state(app_state.clone(), auth_middleware),
            ),
        )
        .nest(
            "/api/drivers",
            routes::driver_routes::create_driver_router().route_layer(
                axum_middleware::from_fn_with_state(app_state.clone(), auth_middleware),
            ),
        )
        .nest(
            "/api/realtime",
            routes::realtime_routes::create_realtime_router(),
        )
        .layer(cors)
        .with_state(app_state);

    let addr: SocketAddr = config.server_url().parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("🔑 Endpoints - Auth:");
    info!("   POST /api/auth/rider/register - Registrar rider");
    info!("   POST /api/auth/rider/login - Login rider");
    info!("   POST /api/auth/driver/register - Registrar conductor");
    info!("   POST /api/auth/driver/login - Login conductor");
    info!("   GET  /api/auth/profile - Perfil actual");
    info!("   PUT  /api/auth/profile - Actualizar perfil");
    info!("   PUT  /api/auth/change-password - Cambiar contraseña");
    info!("🚕 Endpoints - Rides:");
    info!("   POST /api/rides - Crear viaje");
    info!("   GET  /api/rides - Listar mis viajes");
    info!("   GET  /api/rides/:id - Detalle de viaje");
    info!("   POST /api/rides/:id/accept - Aceptar viaje");
    info!("   POST /api/rides/:id/start - Arrancar viaje");
    info!("   POST /api/rides/:id/complete - Completar viaje");
    info!("   POST /api/rides/:id/cancel - Cancelar viaje");
    info!("   POST /api/rides/:id/rate - Calificar viaje");
    info!("🚗 Endpoints - Drivers:");
    info!("   PUT  /api/drivers/location - Actualizar ubicación");
    info!("   PUT  /api/drivers/availability - Cambiar disponibilidad");
    info!("   PUT  /api/drivers/vehicle - Actualizar vehículo");
    info!("   GET  /api/drivers/statistics - Estadísticas");
    info!("   GET  /api/drivers/nearby-requests - Solicitudes cercanas");
    info!("   GET  /api/drivers/current-ride - Viaje activo");
    info!("   GET  /api/drivers/all - Todos los conductores (admin)");
    info!("📡 Endpoints - Realtime:");
    info!("   GET  /api/realtime/ws - Canal WebSocket de eventos");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            e
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Health check simple
async fn health_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "service": "ride-hailing",
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
