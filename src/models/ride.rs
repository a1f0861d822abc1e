//! Modelo de Ride y su máquina de estados
//!
//! El ciclo de vida de un viaje:
//!
//! ```text
//! pending --accept--> accepted --start--> started --complete--> completed
//! pending --cancel--> cancelled
//! accepted --cancel--> cancelled
//! ```
//!
//! `completed` y `cancelled` son estados terminales. Las transiciones se
//! validan aquí y se aplican en la base de datos con UPDATEs condicionales
//! sobre el estado actual, que es la única guarda contra dobles accepts.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Estados de un viaje
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "ride_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RideStatus {
    Pending,
    Accepted,
    Started,
    Completed,
    Cancelled,
}

impl RideStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RideStatus::Pending => "pending",
            RideStatus::Accepted => "accepted",
            RideStatus::Started => "started",
            RideStatus::Completed => "completed",
            RideStatus::Cancelled => "cancelled",
        }
    }

    /// Estados desde los que no hay transición posible
    pub fn is_terminal(&self) -> bool {
        matches!(self, RideStatus::Completed | RideStatus::Cancelled)
    }

    /// El rider solo puede cancelar antes de que el viaje arranque
    pub fn is_cancellable(&self) -> bool {
        matches!(self, RideStatus::Pending | RideStatus::Accepted)
    }

    /// Grafo de transiciones legales
    pub fn can_transition_to(&self, next: RideStatus) -> bool {
        matches!(
            (self, next),
            (RideStatus::Pending, RideStatus::Accepted)
                | (RideStatus::Accepted, RideStatus::Started)
                | (RideStatus::Started, RideStatus::Completed)
                | (RideStatus::Pending, RideStatus::Cancelled)
                | (RideStatus::Accepted, RideStatus::Cancelled)
        )
    }
}

/// Estado del pago asociado al viaje
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "payment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

/// Ride - mapea a la tabla rides
///
/// Invariantes: `driver_id` es NULL exactamente mientras status = pending;
/// `start_time` solo se asigna al pasar a started; `end_time` solo al pasar
/// a completed; cada mitad del rating se escribe solo con status = completed.
#[derive(Debug, Clone, FromRow)]
pub struct Ride {
    pub id: Uuid,
    pub rider_id: Uuid,
    pub driver_id: Option<Uuid>,
    pub pickup_address: String,
    pub pickup_latitude: f64,
    pub pickup_longitude: f64,
    pub destination_address: String,
    pub destination_latitude: f64,
    pub destination_longitude: f64,
    pub status: RideStatus,
    pub fare_amount: Decimal,
    pub fare_currency: String,
    pub payment_status: PaymentStatus,
    pub distance_km: Decimal,
    pub duration_min: Decimal,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub rating_from_rider: Option<i16>,
    pub rating_from_driver: Option<i16>,
    pub feedback_from_rider: Option<String>,
    pub feedback_from_driver: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Ride {
    /// Crear un viaje nuevo en estado pending, con la tarifa ya calculada
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        rider_id: Uuid,
        pickup_address: String,
        pickup_latitude: f64,
        pickup_longitude: f64,
        destination_address: String,
        destination_latitude: f64,
        destination_longitude: f64,
        distance_km: Decimal,
        duration_min: Decimal,
        fare_amount: Decimal,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            rider_id,
            driver_id: None,
            pickup_address,
            pickup_latitude,
            pickup_longitude,
            destination_address,
            destination_latitude,
            destination_longitude,
            status: RideStatus::Pending,
            fare_amount,
            fare_currency: "USD".to_string(),
            payment_status: PaymentStatus::Pending,
            distance_km,
            duration_min,
            start_time: None,
            end_time: None,
            rating_from_rider: None,
            rating_from_driver: None,
            feedback_from_rider: None,
            feedback_from_driver: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Verificar si una cuenta participa en el viaje
    pub fn is_participant(&self, account_id: Uuid) -> bool {
        self.rider_id == account_id || self.driver_id == Some(account_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use RideStatus::*;

    const ALL: [RideStatus; 5] = [Pending, Accepted, Started, Completed, Cancelled];

    #[test]
    fn test_happy_path_transitions() {
        assert!(Pending.can_transition_to(Accepted));
        assert!(Accepted.can_transition_to(Started));
        assert!(Started.can_transition_to(Completed));
    }

    #[test]
    fn test_cancel_transitions() {
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Accepted.can_transition_to(Cancelled));
        // Sin cancelación una vez arrancado el viaje
        assert!(!Started.can_transition_to(Cancelled));
        assert!(!Completed.can_transition_to(Cancelled));
    }

    #[test]
    fn test_terminal_states_have_no_outgoing_transitions() {
        for terminal in [Completed, Cancelled] {
            assert!(terminal.is_terminal());
            for next in ALL {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }

    #[test]
    fn test_started_unreachable_without_accepted() {
        // La única arista que entra a started sale de accepted
        for from in ALL {
            if from != Accepted {
                assert!(!from.can_transition_to(Started));
            }
        }
    }

    #[test]
    fn test_no_skipping_states() {
        assert!(!Pending.can_transition_to(Started));
        assert!(!Pending.can_transition_to(Completed));
        assert!(!Accepted.can_transition_to(Completed));
    }

    #[test]
    fn test_cancellable_matches_graph() {
        for status in ALL {
            assert_eq!(status.is_cancellable(), status.can_transition_to(Cancelled));
        }
    }

    #[test]
    fn test_is_participant() {
        let rider = Uuid::new_v4();
        let driver = Uuid::new_v4();
        let stranger = Uuid::new_v4();

        let ride = sample_ride(rider, Some(driver));
        assert!(ride.is_participant(rider));
        assert!(ride.is_participant(driver));
        assert!(!ride.is_participant(stranger));

        let unassigned = sample_ride(rider, None);
        assert!(!unassigned.is_participant(driver));
    }

    fn sample_ride(rider_id: Uuid, driver_id: Option<Uuid>) -> Ride {
        let now = Utc::now();
        Ride {
            id: Uuid::new_v4(),
            rider_id,
            driver_id,
            pickup_address: "Av. Corrientes 1234".to_string(),
            pickup_latitude: -34.6037,
            pickup_longitude: -58.3816,
            destination_address: "Av. Libertador 5678".to_string(),
            destination_latitude: -34.5711,
            destination_longitude: -58.4233,
            status: if driver_id.is_some() { Accepted } else { Pending },
            fare_amount: Decimal::new(98, 1),
            fare_currency: "USD".to_string(),
            payment_status: PaymentStatus::Pending,
            distance_km: Decimal::new(32, 1),
            duration_min: Decimal::new(15, 0),
            start_time: None,
            end_time: None,
            rating_from_rider: None,
            rating_from_driver: None,
            feedback_from_rider: None,
            feedback_from_driver: None,
            created_at: now,
            updated_at: now,
        }
    }
}
