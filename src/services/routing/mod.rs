//! Live routing backends
//!
//! Three HTTP backends behind one trait, tried in a fixed order:
//! Google Routes (commercial), OpenRouteService (public directions),
//! OSRM (public open-source router). Every backend failure is soft -
//! the gateway moves to the next backend and finally reports `None`,
//! at which point the caller falls back to synthetic estimation.

mod google;
mod ors;
mod osrm;
mod polyline;

pub use google::GoogleRoutesProvider;
pub use ors::OrsProvider;
pub use osrm::OsrmProvider;
pub use polyline::decode_polyline;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;
use crate::types::Coordinates;

/// Soft failure of a single routing backend call
///
/// None of these cross the dispatch engine boundary; they only steer the
/// gateway to the next backend.
#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("backend returned HTTP {status}")]
    Http { status: u16 },
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("malformed response: {0}")]
    MalformedResponse(&'static str),
    #[error("response carried no usable polyline")]
    MissingPolyline,
    #[error("backend found no route")]
    NoRoute,
}

/// Normalized output of a live routing backend
#[derive(Debug, Clone)]
pub struct LiveRoute {
    /// Road distance in kilometers
    pub distance_km: f64,
    /// Free-flow driving duration in minutes
    pub duration_minutes: f64,
    /// Street-following polyline, at least two points
    pub path: Vec<Coordinates>,
}

/// One live routing backend
#[async_trait]
pub trait RouteProvider: Send + Sync {
    /// Compute a driving route. Any failure is soft and moves the
    /// gateway on to the next provider.
    async fn try_route(&self, start: &Coordinates, end: &Coordinates)
        -> Result<LiveRoute, RoutingError>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}

/// Ordered chain of routing backends
pub struct RoutingGateway {
    providers: Vec<Box<dyn RouteProvider>>,
}

impl RoutingGateway {
    /// Build the provider chain from configuration
    ///
    /// Keyed backends join the chain only when their key is configured;
    /// OSRM needs no key and always closes the chain. With live routing
    /// switched off the chain is empty and every lookup reports `None`.
    pub fn from_config(config: &Config) -> Self {
        if !config.live_routing {
            return Self { providers: vec![] };
        }

        let mut providers: Vec<Box<dyn RouteProvider>> = Vec::new();
        if let Some(key) = &config.google_routes_api_key {
            providers.push(Box::new(GoogleRoutesProvider::new(
                key,
                config.routing_timeout_seconds,
            )));
        }
        if let Some(key) = &config.ors_api_key {
            providers.push(Box::new(OrsProvider::new(
                &config.ors_url,
                key,
                config.routing_timeout_seconds,
            )));
        }
        providers.push(Box::new(OsrmProvider::new(
            &config.osrm_url,
            config.routing_timeout_seconds,
        )));

        Self { providers }
    }

    /// Build a gateway over an explicit provider list (tests, probe)
    pub fn with_providers(providers: Vec<Box<dyn RouteProvider>>) -> Self {
        Self { providers }
    }

    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Call every backend once and report the outcome per backend.
    /// Used by the `probe` CLI subcommand.
    pub async fn probe(
        &self,
        start: &Coordinates,
        end: &Coordinates,
    ) -> Vec<(&'static str, Result<LiveRoute, RoutingError>)> {
        let mut outcomes = Vec::with_capacity(self.providers.len());
        for provider in &self.providers {
            outcomes.push((provider.name(), provider.try_route(start, end).await));
        }
        outcomes
    }

    /// Try each backend in order and return the first street-accurate
    /// route; `None` means "use the synthetic fallback", never an error.
    pub async fn fetch_live_route(
        &self,
        start: &Coordinates,
        end: &Coordinates,
    ) -> Option<LiveRoute> {
        for provider in &self.providers {
            match provider.try_route(start, end).await {
                Ok(route) => {
                    debug!(
                        "{} routed {:.2} km in {:.1} min ({} points)",
                        provider.name(),
                        route.distance_km,
                        route.duration_minutes,
                        route.path.len()
                    );
                    return Some(route);
                }
                Err(e) => {
                    warn!("{} failed, trying next backend: {}", provider.name(), e);
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct FixedProvider {
        name: &'static str,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl RouteProvider for FixedProvider {
        async fn try_route(
            &self,
            start: &Coordinates,
            end: &Coordinates,
        ) -> Result<LiveRoute, RoutingError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(LiveRoute {
                distance_km: 5.0,
                duration_minutes: 12.0,
                path: vec![*start, *end],
            })
        }

        fn name(&self) -> &'static str {
            self.name
        }
    }

    struct FailingProvider {
        name: &'static str,
        error: fn() -> RoutingError,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl RouteProvider for FailingProvider {
        async fn try_route(
            &self,
            _start: &Coordinates,
            _end: &Coordinates,
        ) -> Result<LiveRoute, RoutingError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err((self.error)())
        }

        fn name(&self) -> &'static str {
            self.name
        }
    }

    fn start() -> Coordinates {
        Coordinates::new(-12.08, -77.05)
    }

    fn end() -> Coordinates {
        Coordinates::new(-12.0464, -77.0428)
    }

    #[tokio::test]
    async fn test_first_success_wins() {
        let first_calls = Arc::new(AtomicUsize::new(0));
        let second_calls = Arc::new(AtomicUsize::new(0));

        let gateway = RoutingGateway::with_providers(vec![
            Box::new(FixedProvider { name: "first", calls: first_calls.clone() }),
            Box::new(FixedProvider { name: "second", calls: second_calls.clone() }),
        ]);

        let route = gateway.fetch_live_route(&start(), &end()).await.unwrap();
        assert_eq!(route.path.len(), 2);
        assert_eq!(first_calls.load(Ordering::SeqCst), 1);
        assert_eq!(second_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failure_falls_through_in_order() {
        let first_calls = Arc::new(AtomicUsize::new(0));
        let second_calls = Arc::new(AtomicUsize::new(0));

        let gateway = RoutingGateway::with_providers(vec![
            Box::new(FailingProvider {
                name: "denied",
                error: || RoutingError::Http { status: 403 },
                calls: first_calls.clone(),
            }),
            Box::new(FixedProvider { name: "fallback", calls: second_calls.clone() }),
        ]);

        let route = gateway.fetch_live_route(&start(), &end()).await;
        assert!(route.is_some());
        assert_eq!(first_calls.load(Ordering::SeqCst), 1);
        assert_eq!(second_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_exhausted_chain_yields_none() {
        let calls = Arc::new(AtomicUsize::new(0));
        let gateway = RoutingGateway::with_providers(vec![
            Box::new(FailingProvider {
                name: "a",
                error: || RoutingError::Http { status: 403 },
                calls: calls.clone(),
            }),
            Box::new(FailingProvider {
                name: "b",
                error: || RoutingError::MalformedResponse("no routes array"),
                calls: calls.clone(),
            }),
            Box::new(FailingProvider {
                name: "c",
                error: || RoutingError::MissingPolyline,
                calls: calls.clone(),
            }),
        ]);

        assert!(gateway.fetch_live_route(&start(), &end()).await.is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_empty_chain_yields_none() {
        let gateway = RoutingGateway::with_providers(vec![]);
        assert!(gateway.fetch_live_route(&start(), &end()).await.is_none());
    }

    #[tokio::test]
    async fn test_probe_reports_every_backend() {
        let calls = Arc::new(AtomicUsize::new(0));
        let gateway = RoutingGateway::with_providers(vec![
            Box::new(FixedProvider { name: "up", calls: calls.clone() }),
            Box::new(FailingProvider {
                name: "down",
                error: || RoutingError::NoRoute,
                calls: calls.clone(),
            }),
        ]);

        let outcomes = gateway.probe(&start(), &end()).await;
        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].0, "up");
        assert!(outcomes[0].1.is_ok());
        assert_eq!(outcomes[1].0, "down");
        assert!(outcomes[1].1.is_err());
    }
}
