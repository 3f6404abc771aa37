//! Simulation session handlers

use std::sync::Arc;

use anyhow::Result;
use async_nats::{Client, Subscriber};
use futures::StreamExt;
use tracing::error;
use uuid::Uuid;

use crate::services::simulation::{SessionState, SimulationStore};
use crate::types::{
    ErrorResponse, Request, SimulationSessionRequest, SimulationStartRequest,
    SimulationStateResponse, SuccessResponse,
};

fn state_response(session_id: Uuid, state: SessionState) -> SimulationStateResponse {
    SimulationStateResponse {
        session_id,
        current_step_index: state.current_step_index,
        total_steps: state.total_steps,
        is_active: state.is_active,
        position: state.position,
    }
}

/// Handle despacho.simulation.start
pub async fn handle_simulation_start(
    client: Client,
    mut subscriber: Subscriber,
    store: Arc<SimulationStore>,
) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        let reply = match msg.reply {
            Some(ref r) => r.clone(),
            None => continue,
        };

        let request: Request<SimulationStartRequest> = match serde_json::from_slice(&msg.payload) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse simulation start request: {}", e);
                let error = ErrorResponse::new(Uuid::nil(), "INVALID_REQUEST", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
                continue;
            }
        };

        let (session_id, state) = store.start(request.payload.path);
        let response = SuccessResponse::new(request.id, state_response(session_id, state));
        let _ = client
            .publish(reply, serde_json::to_vec(&response)?.into())
            .await;
    }

    Ok(())
}

/// Handle despacho.simulation.tick
pub async fn handle_simulation_tick(
    client: Client,
    mut subscriber: Subscriber,
    store: Arc<SimulationStore>,
) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        let reply = match msg.reply {
            Some(ref r) => r.clone(),
            None => continue,
        };

        let request: Request<SimulationSessionRequest> = match serde_json::from_slice(&msg.payload)
        {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse simulation tick request: {}", e);
                let error = ErrorResponse::new(Uuid::nil(), "INVALID_REQUEST", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
                continue;
            }
        };

        let session_id = request.payload.session_id;
        match store.tick(&session_id) {
            Some(state) => {
                let response = SuccessResponse::new(request.id, state_response(session_id, state));
                let _ = client
                    .publish(reply, serde_json::to_vec(&response)?.into())
                    .await;
            }
            None => {
                let error = ErrorResponse::new(request.id, "NOT_FOUND", "unknown session");
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
        }
    }

    Ok(())
}

/// Handle despacho.simulation.reset
pub async fn handle_simulation_reset(
    client: Client,
    mut subscriber: Subscriber,
    store: Arc<SimulationStore>,
) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        let reply = match msg.reply {
            Some(ref r) => r.clone(),
            None => continue,
        };

        let request: Request<SimulationSessionRequest> = match serde_json::from_slice(&msg.payload)
        {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse simulation reset request: {}", e);
                let error = ErrorResponse::new(Uuid::nil(), "INVALID_REQUEST", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
                continue;
            }
        };

        let session_id = request.payload.session_id;
        match store.reset(&session_id) {
            Some(state) => {
                let response = SuccessResponse::new(request.id, state_response(session_id, state));
                let _ = client
                    .publish(reply, serde_json::to_vec(&response)?.into())
                    .await;
            }
            None => {
                let error = ErrorResponse::new(request.id, "NOT_FOUND", "unknown session");
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
        }
    }

    Ok(())
}

/// Handle despacho.simulation.stop
pub async fn handle_simulation_stop(
    client: Client,
    mut subscriber: Subscriber,
    store: Arc<SimulationStore>,
) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        let reply = match msg.reply {
            Some(ref r) => r.clone(),
            None => continue,
        };

        let request: Request<SimulationSessionRequest> = match serde_json::from_slice(&msg.payload)
        {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse simulation stop request: {}", e);
                let error = ErrorResponse::new(Uuid::nil(), "INVALID_REQUEST", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
                continue;
            }
        };

        let session_id = request.payload.session_id;
        match store.stop(&session_id) {
            Some(state) => {
                let response = SuccessResponse::new(request.id, state_response(session_id, state));
                let _ = client
                    .publish(reply, serde_json::to_vec(&response)?.into())
                    .await;
            }
            None => {
                let error = ErrorResponse::new(request.id, "NOT_FOUND", "unknown session");
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
        }
    }

    Ok(())
}
