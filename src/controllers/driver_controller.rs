use chrono::{DateTime, Duration, Utc};
use rust_decimal::prelude::ToPrimitive;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::config::environment::EnvironmentConfig;
use crate::dto::auth_dto::{AccountResponse, LocationResponse, VehicleInput, VehicleResponse};
use crate::dto::driver_dto::{
    AvailabilityResponse, NearbyRideResponse, NearbyRiderSummary, StatisticsResponse,
    UpdateAvailabilityRequest, UpdateLocationRequest,
};
use crate::dto::ride_dto::RideResponse;
use crate::dto::ApiResponse;
use crate::repositories::account_repository::AccountRepository;
use crate::repositories::ride_repository::RideRepository;
use crate::utils::errors::AppError;
use crate::utils::validation::validate_coordinates;

pub struct DriverController {
    accounts: AccountRepository,
    rides: RideRepository,
    nearby_radius_meters: f64,
}

impl DriverController {
    pub fn new(pool: PgPool, config: &EnvironmentConfig) -> Self {
        Self {
            accounts: AccountRepository::new(pool.clone()),
            rides: RideRepository::new(pool),
            nearby_radius_meters: config.nearby_radius_meters,
        }
    }

    pub async fn update_location(
        &self,
        driver_id: Uuid,
        request: UpdateLocationRequest,
    ) -> Result<ApiResponse<LocationResponse>, AppError> {
        let coords = validate_coordinates(&request.coordinates)?;

        let account = self
            .accounts
            .update_location(driver_id, coords.latitude, coords.longitude)
            .await?;

        Ok(ApiResponse::success_with_message(
            LocationResponse {
                latitude: account.current_latitude.unwrap_or(coords.latitude),
                longitude: account.current_longitude.unwrap_or(coords.longitude),
            },
            "Location updated successfully".to_string(),
        ))
    }

    /// Cambiar disponibilidad. Un conductor con un viaje aceptado o en curso
    /// no puede ponerse offline.
    pub async fn set_availability(
        &self,
        driver_id: Uuid,
        request: UpdateAvailabilityRequest,
    ) -> Result<ApiResponse<AvailabilityResponse>, AppError> {
        if !request.is_active {
            let active_ride = self.rides.find_active_for_driver(driver_id).await?;
            if active_ride.is_some() {
                return Err(AppError::Conflict(
                    "Cannot go offline while having an active ride".to_string(),
                ));
            }
        }

        let account = self
            .accounts
            .update_availability(driver_id, request.is_active)
            .await?;

        let message = if account.is_active {
            "Driver is now online"
        } else {
            "Driver is now offline"
        };

        Ok(ApiResponse::success_with_message(
            AvailabilityResponse {
                is_active: account.is_active,
            },
            message.to_string(),
        ))
    }

    pub async fn update_vehicle(
        &self,
        driver_id: Uuid,
        request: VehicleInput,
    ) -> Result<ApiResponse<VehicleResponse>, AppError> {
        request.validate()?;

        let account = self
            .accounts
            .update_vehicle(
                driver_id,
                request.model,
                request.plate_number,
                request.color,
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            VehicleResponse {
                model: account.vehicle_model.unwrap_or_default(),
                plate_number: account.vehicle_plate_number.unwrap_or_default(),
                color: account.vehicle_color.unwrap_or_default(),
            },
            "Vehicle information updated successfully".to_string(),
        ))
    }

    /// Estadísticas del conductor sobre el rango pedido
    pub async fn statistics(
        &self,
        driver_id: Uuid,
        range: Option<String>,
    ) -> Result<StatisticsResponse, AppError> {
        let since = range_to_since(range.as_deref());
        let row = self.rides.statistics_for_driver(driver_id, since).await?;

        let completion_rate = if row.total_rides == 0 {
            0.0
        } else {
            (row.completed_rides as f64 / row.total_rides as f64 * 10_000.0).round() / 100.0
        };

        Ok(StatisticsResponse {
            total_rides: row.completed_rides,
            total_earnings: row.total_earnings,
            average_rating: row.average_rating.unwrap_or(0.0),
            completion_rate,
        })
    }

    /// Solicitudes pendientes cerca de la última ubicación del conductor
    pub async fn nearby_requests(
        &self,
        driver_id: Uuid,
    ) -> Result<Vec<NearbyRideResponse>, AppError> {
        let driver = self
            .accounts
            .find_by_id(driver_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let (latitude, longitude) = match (driver.current_latitude, driver.current_longitude) {
            (Some(lat), Some(lng)) => (lat, lng),
            _ => {
                return Err(AppError::BadRequest(
                    "Driver location not set".to_string(),
                ))
            }
        };

        let rows = self
            .rides
            .find_nearby_pending(latitude, longitude, self.nearby_radius_meters)
            .await?;

        let requests = rows
            .into_iter()
            .map(|row| NearbyRideResponse {
                id: row.id,
                pickup_address: row.pickup_address,
                pickup_latitude: row.pickup_latitude,
                pickup_longitude: row.pickup_longitude,
                destination_address: row.destination_address,
                fare_amount: row.fare_amount.to_f64().unwrap_or(0.0),
                distance_km: row.distance_km.to_f64().unwrap_or(0.0),
                duration_min: row.duration_min.to_f64().unwrap_or(0.0),
                distance_meters: row.distance_meters,
                rider: NearbyRiderSummary {
                    first_name: row.rider_first_name,
                    last_name: row.rider_last_name,
                    rating: row.rider_rating,
                },
            })
            .collect();

        Ok(requests)
    }

    /// El viaje activo del conductor, si existe
    pub async fn current_ride(&self, driver_id: Uuid) -> Result<RideResponse, AppError> {
        let ride = self
            .rides
            .find_active_for_driver(driver_id)
            .await?
            .ok_or_else(|| AppError::NotFound("No active ride found".to_string()))?;

        Ok(ride.into())
    }

    /// Listado de todos los conductores (admin)
    pub async fn list_all(
        &self,
        status: Option<String>,
    ) -> Result<Vec<AccountResponse>, AppError> {
        let is_active = status.as_deref().map(|s| s == "active");
        let drivers = self.accounts.list_drivers(is_active).await?;

        Ok(drivers.into_iter().map(AccountResponse::from).collect())
    }
}

/// Traducir `?range=` a un límite inferior de fecha
fn range_to_since(range: Option<&str>) -> Option<DateTime<Utc>> {
    let now = Utc::now();
    match range {
        Some("today") => now
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc()),
        Some("week") => Some(now - Duration::days(7)),
        Some("month") => Some(now - Duration::days(30)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_to_since() {
        assert!(range_to_since(None).is_none());
        assert!(range_to_since(Some("all")).is_none());
        assert!(range_to_since(Some("nonsense")).is_none());

        let week = range_to_since(Some("week")).unwrap();
        assert!(week < Utc::now());

        let today = range_to_since(Some("today")).unwrap();
        assert_eq!(today.time(), chrono::NaiveTime::MIN);
    }
}
