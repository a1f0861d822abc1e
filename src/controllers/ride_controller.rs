use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::config::environment::EnvironmentConfig;
use crate::dto::auth_dto::VehicleResponse;
use crate::dto::ride_dto::{
    CreateRideRequest, CreateRideResponse, ParticipantResponse, RateRideRequest,
    RideDetailResponse, RideResponse,
};
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::account::Account;
use crate::models::ride::{Ride, RideStatus};
use crate::repositories::account_repository::AccountRepository;
use crate::repositories::ride_repository::RideRepository;
use crate::services::fare_service::calculate_fare;
use crate::services::realtime_service::{EventBroker, RealtimeEvent};
use crate::utils::errors::AppError;
use crate::utils::validation::validate_coordinates;

pub struct RideController {
    rides: RideRepository,
    accounts: AccountRepository,
    events: EventBroker,
    nearby_radius_meters: f64,
}

impl RideController {
    pub fn new(pool: PgPool, events: EventBroker, config: &EnvironmentConfig) -> Self {
        Self {
            rides: RideRepository::new(pool.clone()),
            accounts: AccountRepository::new(pool),
            events,
            nearby_radius_meters: config.nearby_radius_meters,
        }
    }

    /// Crear un viaje nuevo. La tarifa se calcula en el momento y la
    /// cantidad de conductores cercanos es solo informativa.
    pub async fn create(
        &self,
        rider_id: Uuid,
        request: CreateRideRequest,
    ) -> Result<ApiResponse<CreateRideResponse>, AppError> {
        request.validate()?;

        if request.pickup.address.trim().is_empty()
            || request.destination.address.trim().is_empty()
        {
            return Err(AppError::BadRequest(
                "Pickup and destination addresses are required".to_string(),
            ));
        }

        let pickup = validate_coordinates(&request.pickup.location.coordinates)?;
        let destination = validate_coordinates(&request.destination.location.coordinates)?;

        let distance_km = Decimal::from_f64(request.distance)
            .ok_or_else(|| AppError::BadRequest("Invalid distance value".to_string()))?;
        let duration_min = Decimal::from_f64(request.duration)
            .ok_or_else(|| AppError::BadRequest("Invalid duration value".to_string()))?;

        let fare_amount = calculate_fare(distance_km, duration_min);

        let ride = Ride::new(
            rider_id,
            request.pickup.address,
            pickup.latitude,
            pickup.longitude,
            request.destination.address,
            destination.latitude,
            destination.longitude,
            distance_km,
            duration_min,
            fare_amount,
        );

        let saved = self.rides.create(&ride).await?;

        let nearby = self
            .accounts
            .find_nearby_drivers(pickup.latitude, pickup.longitude, self.nearby_radius_meters)
            .await?;

        tracing::info!(
            "🔍 {} conductores disponibles a menos de {}m del pickup",
            nearby.len(),
            self.nearby_radius_meters
        );
        if let Some(nearest) = nearby.first() {
            tracing::debug!(
                "Conductor más cercano: {} {} ({:.1}) a {:.0}m",
                nearest.first_name,
                nearest.last_name,
                nearest.rating,
                nearest.distance_meters
            );
        }

        let response = RideResponse::from(saved);
        self.events
            .publish(RealtimeEvent::NewRideRequest(response.clone()));

        Ok(ApiResponse::success_with_message(
            CreateRideResponse {
                ride: response,
                nearby_drivers: nearby.len(),
            },
            "Ride created successfully".to_string(),
        ))
    }

    /// Listar los viajes del usuario, del lado que le corresponda
    pub async fn list(&self, user: &AuthenticatedUser) -> Result<Vec<RideResponse>, AppError> {
        let rides = self
            .rides
            .list_for_account(user.account_id, user.role)
            .await?;

        Ok(rides.into_iter().map(RideResponse::from).collect())
    }

    /// Detalle de un viaje, solo visible para sus participantes
    pub async fn get_by_id(
        &self,
        user: &AuthenticatedUser,
        ride_id: Uuid,
    ) -> Result<RideDetailResponse, AppError> {
        let ride = self
            .rides
            .find_for_participant(ride_id, user.account_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Ride not found".to_string()))?;

        let rider = self.accounts.find_by_id(ride.rider_id).await?;
        let driver = match ride.driver_id {
            Some(driver_id) => self.accounts.find_by_id(driver_id).await?,
            None => None,
        };

        Ok(RideDetailResponse {
            ride: RideResponse::from(ride),
            rider: rider.map(participant_summary),
            driver: driver.map(participant_summary),
        })
    }

    /// Aceptar un viaje pendiente. El UPDATE condicional decide el ganador
    /// entre accepts concurrentes; acá solo se clasifica la falla para
    /// reportar la razón concreta.
    pub async fn accept(
        &self,
        driver_id: Uuid,
        ride_id: Uuid,
    ) -> Result<ApiResponse<RideResponse>, AppError> {
        let ride = match self.rides.accept(ride_id, driver_id).await? {
            Some(ride) => ride,
            None => {
                return Err(self
                    .classify_failure(ride_id, driver_id, RideStatus::Accepted)
                    .await?)
            }
        };

        let response = RideResponse::from(ride);
        self.events
            .publish(RealtimeEvent::RideUpdate(response.clone()));

        Ok(ApiResponse::success_with_message(
            response,
            "Ride accepted successfully".to_string(),
        ))
    }

    pub async fn start(
        &self,
        driver_id: Uuid,
        ride_id: Uuid,
    ) -> Result<ApiResponse<RideResponse>, AppError> {
        let ride = match self.rides.start(ride_id, driver_id).await? {
            Some(ride) => ride,
            None => {
                return Err(self
                    .classify_failure(ride_id, driver_id, RideStatus::Started)
                    .await?)
            }
        };

        let response = RideResponse::from(ride);
        self.events
            .publish(RealtimeEvent::RideUpdate(response.clone()));

        Ok(ApiResponse::success_with_message(
            response,
            "Ride started successfully".to_string(),
        ))
    }

    pub async fn complete(
        &self,
        driver_id: Uuid,
        ride_id: Uuid,
    ) -> Result<ApiResponse<RideResponse>, AppError> {
        let ride = match self.rides.complete(ride_id, driver_id).await? {
            Some(ride) => ride,
            None => {
                return Err(self
                    .classify_failure(ride_id, driver_id, RideStatus::Completed)
                    .await?)
            }
        };

        let response = RideResponse::from(ride);
        self.events
            .publish(RealtimeEvent::RideUpdate(response.clone()));

        Ok(ApiResponse::success_with_message(
            response,
            "Ride completed successfully".to_string(),
        ))
    }

    pub async fn cancel(
        &self,
        rider_id: Uuid,
        ride_id: Uuid,
    ) -> Result<ApiResponse<RideResponse>, AppError> {
        let ride = match self.rides.cancel(ride_id, rider_id).await? {
            Some(ride) => ride,
            None => {
                let existing = self
                    .rides
                    .find_by_id(ride_id)
                    .await?
                    .ok_or_else(|| AppError::NotFound("Ride not found".to_string()))?;

                if existing.rider_id != rider_id {
                    return Err(AppError::Forbidden(
                        "Access denied. Only the requesting rider can cancel this ride."
                            .to_string(),
                    ));
                }

                // Sin cancelación una vez arrancado el viaje
                return Err(AppError::NotFound(
                    "Ride not found or cannot be cancelled".to_string(),
                ));
            }
        };

        let response = RideResponse::from(ride);
        self.events
            .publish(RealtimeEvent::RideUpdate(response.clone()));

        Ok(ApiResponse::success_with_message(
            response,
            "Ride cancelled successfully".to_string(),
        ))
    }

    /// Un UPDATE condicional que no matcheó puede significar tres cosas:
    /// el viaje no existe, el que llama no es el conductor asignado, o el
    /// estado actual no admite la transición pedida.
    async fn classify_failure(
        &self,
        ride_id: Uuid,
        driver_id: Uuid,
        target: RideStatus,
    ) -> Result<AppError, AppError> {
        let ride = match self.rides.find_by_id(ride_id).await? {
            Some(ride) => ride,
            None => return Ok(AppError::NotFound("Ride not found".to_string())),
        };

        // accept no exige conductor asignado; start y complete sí
        if target != RideStatus::Accepted && ride.driver_id != Some(driver_id) {
            return Ok(AppError::Forbidden(
                "Access denied. You are not the assigned driver for this ride.".to_string(),
            ));
        }

        let message = if ride.status.can_transition_to(target) {
            // El estado cambió entre el UPDATE y esta lectura
            "Ride not found"
        } else {
            match target {
                RideStatus::Accepted => "Ride not found or already accepted",
                RideStatus::Started => "Ride not found or cannot be started",
                RideStatus::Completed => "Ride not found or cannot be completed",
                _ => "Ride not found",
            }
        };

        Ok(AppError::NotFound(message.to_string()))
    }

    /// Calificar un viaje completado. Cada parte escribe su mitad del par y
    /// una segunda calificación de la misma parte sobrescribe la anterior.
    /// Después del write se recalcula el promedio de la contraparte sobre
    /// todos sus viajes completados y calificados.
    pub async fn rate(
        &self,
        user: &AuthenticatedUser,
        ride_id: Uuid,
        request: RateRideRequest,
    ) -> Result<ApiResponse<RideResponse>, AppError> {
        request.validate()?;

        let ride = self
            .rides
            .find_by_id(ride_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Ride not found".to_string()))?;

        if !ride.is_participant(user.account_id) {
            return Err(AppError::Forbidden(
                "Access denied. Only ride participants can rate this ride.".to_string(),
            ));
        }

        if ride.status != RideStatus::Completed {
            return Err(AppError::NotFound(
                "Ride not found or cannot be rated".to_string(),
            ));
        }

        let rates_as_rider = ride.rider_id == user.account_id;

        let updated = if rates_as_rider {
            self.rides
                .rate_by_rider(ride_id, user.account_id, request.rating, request.feedback)
                .await?
        } else {
            self.rides
                .rate_by_driver(ride_id, user.account_id, request.rating, request.feedback)
                .await?
        }
        .ok_or_else(|| AppError::NotFound("Ride not found or cannot be rated".to_string()))?;

        // Recalcular el promedio de la contraparte. Lectura y escritura sin
        // aislamiento: con calificaciones concurrentes gana la última.
        if rates_as_rider {
            if let Some(driver_id) = updated.driver_id {
                if let Some(average) = self.rides.average_rating_for_driver(driver_id).await? {
                    self.accounts.update_rating(driver_id, average).await?;
                }
            }
        } else if let Some(average) = self
            .rides
            .average_rating_for_rider(updated.rider_id)
            .await?
        {
            self.accounts
                .update_rating(updated.rider_id, average)
                .await?;
        }

        Ok(ApiResponse::success_with_message(
            updated.into(),
            "Rating submitted successfully".to_string(),
        ))
    }
}

fn participant_summary(account: Account) -> ParticipantResponse {
    let vehicle = match (
        account.vehicle_model,
        account.vehicle_plate_number,
        account.vehicle_color,
    ) {
        (Some(model), Some(plate_number), Some(color)) => Some(VehicleResponse {
            model,
            plate_number,
            color,
        }),
        _ => None,
    };

    ParticipantResponse {
        id: account.id,
        first_name: account.first_name,
        last_name: account.last_name,
        phone_number: account.phone_number,
        rating: account.rating,
        vehicle,
    }
}
