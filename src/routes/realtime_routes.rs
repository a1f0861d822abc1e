//! Canal WebSocket de eventos
//!
//! Los clientes se conectan con `?token=<jwt>` y reciben frames JSON
//! `{"type": "RIDE_UPDATE" | "NEW_RIDE_REQUEST", "data": ...}`. El canal es
//! fire-and-forget: no hay acks, ni reintentos, ni orden garantizado; un
//! receptor rezagado pierde los eventos que se le fueron de la ventana.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::Response,
    routing::get,
    Router,
};
use futures::{sink::SinkExt, stream::StreamExt};
use serde::Deserialize;
use tokio::sync::broadcast;

use crate::services::realtime_service::RealtimeEvent;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::{verify_token, JwtConfig};

pub fn create_realtime_router() -> Router<AppState> {
    Router::new().route("/ws", get(realtime_ws))
}

#[derive(Debug, Deserialize)]
struct RealtimeParams {
    token: Option<String>,
}

async fn realtime_ws(
    ws: WebSocketUpgrade,
    Query(params): Query<RealtimeParams>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    // Los navegadores no pueden mandar headers en el upgrade, el token viene
    // como query param
    let token = params.token.ok_or_else(|| {
        AppError::Unauthorized("No authentication token, access denied".to_string())
    })?;
    verify_token(&token, &JwtConfig::from(&state.config))?;

    let rx = state.events.subscribe();
    tracing::info!(
        "📡 Cliente conectado al canal de eventos ({} suscriptores)",
        state.events.subscriber_count()
    );
    Ok(ws.on_upgrade(move |socket| handle_connection(socket, rx)))
}

async fn handle_connection(socket: WebSocket, mut rx: broadcast::Receiver<RealtimeEvent>) {
    let (mut sender, mut receiver) = socket.split();

    loop {
        tokio::select! {
            event = rx.recv() => {
                match event {
                    Ok(event) => {
                        let payload = match serde_json::to_string(&event) {
                            Ok(payload) => payload,
                            Err(e) => {
                                tracing::error!("Error serializando evento: {}", e);
                                continue;
                            }
                        };
                        if sender.send(Message::Text(payload)).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        // El cliente se quedó atrás: esos eventos se pierden
                        tracing::debug!("Suscriptor rezagado, {} eventos perdidos", skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            incoming = receiver.next() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    // El canal es de salida: lo que mande el cliente se ignora
                    Some(Ok(_)) => {}
                }
            }
        }
    }
}
