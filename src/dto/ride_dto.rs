//! DTOs de viajes

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::ride::{PaymentStatus, Ride, RideStatus};

/// Punto GeoJSON de entrada: `{"coordinates": [longitude, latitude]}`
#[derive(Debug, Deserialize)]
pub struct GeoPointInput {
    pub coordinates: Vec<f64>,
}

/// Dirección + punto de entrada
#[derive(Debug, Deserialize)]
pub struct RideLocationInput {
    pub address: String,
    pub location: GeoPointInput,
}

/// Request de creación de viaje
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRideRequest {
    pub pickup: RideLocationInput,
    pub destination: RideLocationInput,

    /// Distancia estimada en kilómetros
    #[validate(range(min = 0.0))]
    pub distance: f64,

    /// Duración estimada en minutos
    #[validate(range(min = 0.0))]
    pub duration: f64,
}

/// Request de calificación
#[derive(Debug, Deserialize, Validate)]
pub struct RateRideRequest {
    #[validate(range(min = 1, max = 5))]
    pub rating: i16,

    #[validate(length(max = 1000))]
    pub feedback: Option<String>,
}

/// Dirección + coordenadas en responses
#[derive(Debug, Clone, Serialize)]
pub struct RidePointResponse {
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Tarifa en responses
#[derive(Debug, Clone, Serialize)]
pub struct FareResponse {
    pub amount: f64,
    pub currency: String,
}

/// Par de calificaciones: lo que puso cada parte
#[derive(Debug, Clone, Serialize)]
pub struct RideRatingResponse {
    pub rider: Option<i16>,
    pub driver: Option<i16>,
}

/// Par de comentarios
#[derive(Debug, Clone, Serialize)]
pub struct RideFeedbackResponse {
    pub rider: Option<String>,
    pub driver: Option<String>,
}

/// Response de viaje
#[derive(Debug, Clone, Serialize)]
pub struct RideResponse {
    pub id: Uuid,
    pub rider_id: Uuid,
    pub driver_id: Option<Uuid>,
    pub pickup: RidePointResponse,
    pub destination: RidePointResponse,
    pub status: RideStatus,
    pub fare: FareResponse,
    pub payment_status: PaymentStatus,
    pub distance: f64,
    pub duration: f64,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub rating: RideRatingResponse,
    pub feedback: RideFeedbackResponse,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Ride> for RideResponse {
    fn from(ride: Ride) -> Self {
        Self {
            id: ride.id,
            rider_id: ride.rider_id,
            driver_id: ride.driver_id,
            pickup: RidePointResponse {
                address: ride.pickup_address,
                latitude: ride.pickup_latitude,
                longitude: ride.pickup_longitude,
            },
            destination: RidePointResponse {
                address: ride.destination_address,
                latitude: ride.destination_latitude,
                longitude: ride.destination_longitude,
            },
            status: ride.status,
            fare: FareResponse {
                amount: ride.fare_amount.to_f64().unwrap_or(0.0),
                currency: ride.fare_currency,
            },
            payment_status: ride.payment_status,
            distance: ride.distance_km.to_f64().unwrap_or(0.0),
            duration: ride.duration_min.to_f64().unwrap_or(0.0),
            start_time: ride.start_time,
            end_time: ride.end_time,
            rating: RideRatingResponse {
                rider: ride.rating_from_rider,
                driver: ride.rating_from_driver,
            },
            feedback: RideFeedbackResponse {
                rider: ride.feedback_from_rider,
                driver: ride.feedback_from_driver,
            },
            created_at: ride.created_at,
            updated_at: ride.updated_at,
        }
    }
}

/// Response de creación: el viaje más cuántos conductores hay cerca
#[derive(Debug, Serialize)]
pub struct CreateRideResponse {
    pub ride: RideResponse,
    pub nearby_drivers: usize,
}

/// Resumen de un participante para el detalle del viaje
#[derive(Debug, Clone, Serialize)]
pub struct ParticipantResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub rating: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle: Option<crate::dto::auth_dto::VehicleResponse>,
}

/// Detalle de viaje con los participantes poblados
#[derive(Debug, Serialize)]
pub struct RideDetailResponse {
    #[serde(flatten)]
    pub ride: RideResponse,
    pub rider: Option<ParticipantResponse>,
    pub driver: Option<ParticipantResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_ride_response_conversion() {
        let ride = Ride::new(
            Uuid::new_v4(),
            "Av. Corrientes 1234".to_string(),
            -34.6037,
            -58.3816,
            "Av. Libertador 5678".to_string(),
            -34.5711,
            -58.4233,
            Decimal::new(32, 1),  // 3.2 km
            Decimal::new(15, 0),  // 15 min
            Decimal::new(98, 1),  // 9.8 USD
        );

        let response = RideResponse::from(ride.clone());

        assert_eq!(response.id, ride.id);
        assert_eq!(response.status, RideStatus::Pending);
        assert_eq!(response.fare.amount, 9.8);
        assert_eq!(response.fare.currency, "USD");
        assert_eq!(response.distance, 3.2);
        assert_eq!(response.duration, 15.0);
        assert_eq!(response.pickup.latitude, -34.6037);
        assert_eq!(response.pickup.longitude, -58.3816);
        assert!(response.driver_id.is_none());
        assert!(response.start_time.is_none());
        assert!(response.rating.rider.is_none());
    }
}
