//! Canal de eventos en tiempo real
//!
//! Fan-out de eventos de viajes hacia los clientes WebSocket conectados.
//! El canal es fire-and-forget: publicar con cero suscriptores no es un
//! error, un receptor rezagado pierde los eventos que se le fueron de la
//! ventana y no hay acks ni reintentos. Un cliente que se desconecta se
//! pierde las actualizaciones hasta que reconecte y vuelva a consultar.

use serde::Serialize;
use tokio::sync::broadcast;

use crate::dto::ride_dto::RideResponse;

/// Capacidad de la ventana del canal broadcast
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Eventos que viajan por el canal, tipados por mensaje
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum RealtimeEvent {
    #[serde(rename = "RIDE_UPDATE")]
    RideUpdate(RideResponse),
    #[serde(rename = "NEW_RIDE_REQUEST")]
    NewRideRequest(RideResponse),
}

/// Broker de eventos compartido en el estado de la aplicación
#[derive(Debug, Clone)]
pub struct EventBroker {
    tx: broadcast::Sender<RealtimeEvent>,
}

impl EventBroker {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Publicar un evento. Sin suscriptores el envío falla y se ignora.
    pub fn publish(&self, event: RealtimeEvent) {
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RealtimeEvent> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBroker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ride::{PaymentStatus, RideStatus};
    use chrono::Utc;
    use uuid::Uuid;

    fn sample_event() -> RealtimeEvent {
        RealtimeEvent::NewRideRequest(RideResponse {
            id: Uuid::new_v4(),
            rider_id: Uuid::new_v4(),
            driver_id: None,
            pickup: crate::dto::ride_dto::RidePointResponse {
                address: "A".to_string(),
                latitude: 0.0,
                longitude: 0.0,
            },
            destination: crate::dto::ride_dto::RidePointResponse {
                address: "B".to_string(),
                latitude: 1.0,
                longitude: 1.0,
            },
            status: RideStatus::Pending,
            fare: crate::dto::ride_dto::FareResponse {
                amount: 9.8,
                currency: "USD".to_string(),
            },
            payment_status: PaymentStatus::Pending,
            distance: 3.2,
            duration: 15.0,
            start_time: None,
            end_time: None,
            rating: crate::dto::ride_dto::RideRatingResponse {
                rider: None,
                driver: None,
            },
            feedback: crate::dto::ride_dto::RideFeedbackResponse {
                rider: None,
                driver: None,
            },
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
    }

    #[test]
    fn test_publish_without_subscribers_does_not_panic() {
        let broker = EventBroker::new();
        broker.publish(sample_event());
        assert_eq!(broker.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_subscriber_receives_event() {
        let broker = EventBroker::new();
        let mut rx = broker.subscribe();

        broker.publish(sample_event());

        let event = rx.recv().await.unwrap();
        match event {
            RealtimeEvent::NewRideRequest(ride) => assert_eq!(ride.fare.amount, 9.8),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_event_serializes_with_type_tag() {
        let json = serde_json::to_value(sample_event()).unwrap();
        assert_eq!(json["type"], "NEW_RIDE_REQUEST");
        assert!(json["data"]["id"].is_string());
    }
}
