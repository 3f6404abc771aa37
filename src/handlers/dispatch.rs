//! Dispatch computation handlers

use std::sync::Arc;

use anyhow::Result;
use async_nats::{Client, Subscriber};
use chrono::Local;
use futures::StreamExt;
use tracing::{debug, error};
use uuid::Uuid;

use crate::services::dispatch::DispatchEngine;
use crate::types::{
    DispatchBestResponse, DispatchRequest, DispatchRoutesResponse, ErrorResponse, Request,
    SuccessResponse,
};

/// Handle despacho.dispatch.routes - one ranked route per valid crew
pub async fn handle_dispatch_routes(
    client: Client,
    mut subscriber: Subscriber,
    engine: Arc<DispatchEngine>,
) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        let reply = match msg.reply {
            Some(ref r) => r.clone(),
            None => continue,
        };

        let request: Request<DispatchRequest> = match serde_json::from_slice(&msg.payload) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse dispatch routes request: {}", e);
                let error = ErrorResponse::new(Uuid::nil(), "INVALID_REQUEST", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
                continue;
            }
        };

        let DispatchRequest { ticket, crews } = request.payload;
        let incident = match ticket.coordinates() {
            Some(c) => c,
            None => {
                let error = ErrorResponse::new(
                    request.id,
                    "TICKET_WITHOUT_LOCATION",
                    format!("ticket {} has no usable coordinates", ticket.code),
                );
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
                continue;
            }
        };
        debug!(
            "Computing routes to ticket {} for {} candidate crews",
            ticket.code,
            crews.len()
        );

        let items = engine
            .compute_routes(incident, &crews, Local::now().naive_local())
            .await;
        let total = items.len() as i64;

        let response = SuccessResponse::new(request.id, DispatchRoutesResponse { items, total });
        let _ = client
            .publish(reply, serde_json::to_vec(&response)?.into())
            .await;
    }

    Ok(())
}

/// Handle despacho.dispatch.best - the fastest crew per capability category
pub async fn handle_dispatch_best(
    client: Client,
    mut subscriber: Subscriber,
    engine: Arc<DispatchEngine>,
) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        let reply = match msg.reply {
            Some(ref r) => r.clone(),
            None => continue,
        };

        let request: Request<DispatchRequest> = match serde_json::from_slice(&msg.payload) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse dispatch best request: {}", e);
                let error = ErrorResponse::new(Uuid::nil(), "INVALID_REQUEST", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
                continue;
            }
        };

        let DispatchRequest { ticket, crews } = request.payload;
        let incident = match ticket.coordinates() {
            Some(c) => c,
            None => {
                let error = ErrorResponse::new(
                    request.id,
                    "TICKET_WITHOUT_LOCATION",
                    format!("ticket {} has no usable coordinates", ticket.code),
                );
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
                continue;
            }
        };
        debug!(
            "Computing best route per category to ticket {} for {} candidate crews",
            ticket.code,
            crews.len()
        );

        let items = engine
            .compute_best_route_per_category(incident, &crews, Local::now().naive_local())
            .await;
        let total = items.len() as i64;

        let response = SuccessResponse::new(request.id, DispatchBestResponse { items, total });
        let _ = client
            .publish(reply, serde_json::to_vec(&response)?.into())
            .await;
    }

    Ok(())
}
