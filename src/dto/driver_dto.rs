//! DTOs de conductores

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request de actualización de ubicación: `[longitude, latitude]`
#[derive(Debug, Deserialize)]
pub struct UpdateLocationRequest {
    pub coordinates: Vec<f64>,
}

/// Request de disponibilidad
#[derive(Debug, Deserialize)]
pub struct UpdateAvailabilityRequest {
    pub is_active: bool,
}

/// Disponibilidad resultante
#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub is_active: bool,
}

/// Query de estadísticas: `?range=all|today|week|month`
#[derive(Debug, Deserialize)]
pub struct StatisticsQuery {
    pub range: Option<String>,
}

/// Estadísticas del conductor
#[derive(Debug, Serialize)]
pub struct StatisticsResponse {
    pub total_rides: i64,
    pub total_earnings: f64,
    pub average_rating: f64,
    /// Porcentaje de viajes completados sobre el total del rango
    pub completion_rate: f64,
}

/// Query del listado de conductores (admin): `?status=active|inactive`
#[derive(Debug, Deserialize)]
pub struct DriverListQuery {
    pub status: Option<String>,
}

/// Resumen del rider en el feed de solicitudes cercanas
#[derive(Debug, Serialize)]
pub struct NearbyRiderSummary {
    pub first_name: String,
    pub last_name: String,
    pub rating: f64,
}

/// Solicitud pendiente cerca del conductor
#[derive(Debug, Serialize)]
pub struct NearbyRideResponse {
    pub id: Uuid,
    pub pickup_address: String,
    pub pickup_latitude: f64,
    pub pickup_longitude: f64,
    pub destination_address: String,
    pub fare_amount: f64,
    pub distance_km: f64,
    pub duration_min: f64,
    pub distance_meters: f64,
    pub rider: NearbyRiderSummary,
}
