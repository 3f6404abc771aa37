//! NATS message handlers

pub mod dispatch;
pub mod ping;
pub mod simulation;

use std::sync::Arc;

use anyhow::Result;
use async_nats::Client;
use tokio::select;
use tracing::{error, info};

use crate::config::Config;
use crate::services::dispatch::DispatchEngine;
use crate::services::routing::RoutingGateway;
use crate::services::simulation::SimulationStore;

/// Start all message handlers
pub async fn start_handlers(client: Client, config: &Config) -> Result<()> {
    info!("Starting message handlers...");

    // Shared routing gateway and dispatch engine
    let gateway = Arc::new(RoutingGateway::from_config(config));
    if config.live_routing {
        info!("Routing backends: {:?}", gateway.provider_names());
    } else {
        info!("Live routing disabled; all dispatches use synthetic estimation");
    }
    let engine = Arc::new(DispatchEngine::new(gateway));

    // Simulation sessions
    let simulation_store = Arc::new(SimulationStore::new());

    // Subscribe to all subjects
    let ping_sub = client.subscribe("despacho.ping").await?;
    let dispatch_routes_sub = client.subscribe("despacho.dispatch.routes").await?;
    let dispatch_best_sub = client.subscribe("despacho.dispatch.best").await?;
    let simulation_start_sub = client.subscribe("despacho.simulation.start").await?;
    let simulation_tick_sub = client.subscribe("despacho.simulation.tick").await?;
    let simulation_reset_sub = client.subscribe("despacho.simulation.reset").await?;
    let simulation_stop_sub = client.subscribe("despacho.simulation.stop").await?;

    info!("Subscribed to NATS subjects");

    // Clone for each handler
    let client_ping = client.clone();
    let client_dispatch_routes = client.clone();
    let client_dispatch_best = client.clone();
    let client_simulation_start = client.clone();
    let client_simulation_tick = client.clone();
    let client_simulation_reset = client.clone();
    let client_simulation_stop = client.clone();

    let engine_routes = engine.clone();
    let engine_best = engine.clone();

    let store_start = simulation_store.clone();
    let store_tick = simulation_store.clone();
    let store_reset = simulation_store.clone();
    let store_stop = simulation_store.clone();

    let ping_handle = tokio::spawn(async move {
        ping::handle_ping(client_ping, ping_sub).await
    });

    let dispatch_routes_handle = tokio::spawn(async move {
        dispatch::handle_dispatch_routes(client_dispatch_routes, dispatch_routes_sub, engine_routes)
            .await
    });

    let dispatch_best_handle = tokio::spawn(async move {
        dispatch::handle_dispatch_best(client_dispatch_best, dispatch_best_sub, engine_best).await
    });

    let simulation_start_handle = tokio::spawn(async move {
        simulation::handle_simulation_start(client_simulation_start, simulation_start_sub, store_start)
            .await
    });

    let simulation_tick_handle = tokio::spawn(async move {
        simulation::handle_simulation_tick(client_simulation_tick, simulation_tick_sub, store_tick)
            .await
    });

    let simulation_reset_handle = tokio::spawn(async move {
        simulation::handle_simulation_reset(client_simulation_reset, simulation_reset_sub, store_reset)
            .await
    });

    let simulation_stop_handle = tokio::spawn(async move {
        simulation::handle_simulation_stop(client_simulation_stop, simulation_stop_sub, store_stop)
            .await
    });

    info!("All handlers started");

    select! {
        result = ping_handle => {
            error!("Ping handler finished: {:?}", result);
        }
        result = dispatch_routes_handle => {
            error!("Dispatch routes handler finished: {:?}", result);
        }
        result = dispatch_best_handle => {
            error!("Dispatch best handler finished: {:?}", result);
        }
        result = simulation_start_handle => {
            error!("Simulation start handler finished: {:?}", result);
        }
        result = simulation_tick_handle => {
            error!("Simulation tick handler finished: {:?}", result);
        }
        result = simulation_reset_handle => {
            error!("Simulation reset handler finished: {:?}", result);
        }
        result = simulation_stop_handle => {
            error!("Simulation stop handler finished: {:?}", result);
        }
    }

    Ok(())
}
