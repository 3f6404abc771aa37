//! Dispatch computation engine
//!
//! For an incident location and a set of candidate crews, computes one
//! route per crew - live when a routing backend answers, synthetic
//! otherwise - and ranks crews by traffic-adjusted travel time. Soft
//! failures degrade the result (tagged `SYNTHETIC`), they never error.

use std::sync::Arc;

use chrono::NaiveDateTime;
use futures::stream::{self, StreamExt};

use crate::services::geo::haversine_distance;
use crate::services::heuristics::{self, HeuristicPolicy};
use crate::services::routing::RoutingGateway;
use crate::services::synthetic::synthesize_route;
use crate::types::{
    CategoryRouteResult, Coordinates, Crew, CrewCategory, RouteResult, RouteSource,
};

/// At most this many live routing calls in flight per dispatch, as a
/// courtesy to the third-party backends
const MAX_INFLIGHT_LOOKUPS: usize = 3;

/// Dispatch engine over an injected routing gateway
pub struct DispatchEngine {
    gateway: Arc<RoutingGateway>,
    policy: HeuristicPolicy,
}

impl DispatchEngine {
    pub fn new(gateway: Arc<RoutingGateway>) -> Self {
        Self {
            gateway,
            policy: HeuristicPolicy::default(),
        }
    }

    pub fn with_policy(gateway: Arc<RoutingGateway>, policy: HeuristicPolicy) -> Self {
        Self { gateway, policy }
    }

    /// Compute a route per valid crew, sorted fastest-with-traffic first
    ///
    /// Crews with missing or out-of-range coordinates are skipped, not
    /// errors; an empty candidate set yields an empty list. `now` is the
    /// local wall clock used for the traffic multiplier.
    pub async fn compute_routes(
        &self,
        incident: Coordinates,
        crews: &[Crew],
        now: NaiveDateTime,
    ) -> Vec<RouteResult> {
        let candidates: Vec<(Crew, Coordinates)> = crews
            .iter()
            .filter_map(|crew| crew.coordinates().map(|position| (crew.clone(), position)))
            .collect();

        let multiplier = heuristics::traffic_multiplier(now, &self.policy);

        let mut results: Vec<RouteResult> = stream::iter(candidates)
            .map(|(crew, position)| async move {
                self.route_for_crew(&crew, position, incident, multiplier).await
            })
            .buffer_unordered(MAX_INFLIGHT_LOOKUPS)
            .collect()
            .await;

        results.sort_by(|a, b| {
            a.travel_time_with_traffic_minutes
                .total_cmp(&b.travel_time_with_traffic_minutes)
        });
        results
    }

    /// Best route within each category present among the valid crews
    ///
    /// At most one entry per category; categories with no valid crew are
    /// silently absent. Winners are sorted fastest-with-traffic first.
    pub async fn compute_best_route_per_category(
        &self,
        incident: Coordinates,
        crews: &[Crew],
        now: NaiveDateTime,
    ) -> Vec<CategoryRouteResult> {
        let mut winners = Vec::new();

        for category in CrewCategory::all() {
            let members: Vec<Crew> = crews
                .iter()
                .filter(|crew| crew.category == category)
                .cloned()
                .collect();
            if members.is_empty() {
                continue;
            }

            let routes = self.compute_routes(incident, &members, now).await;
            if let Some(best) = routes.into_iter().next() {
                winners.push(CategoryRouteResult {
                    category,
                    color: category.color().to_string(),
                    route: best,
                });
            }
        }

        winners.sort_by(|a, b| {
            a.route
                .travel_time_with_traffic_minutes
                .total_cmp(&b.route.travel_time_with_traffic_minutes)
        });
        winners
    }

    async fn route_for_crew(
        &self,
        crew: &Crew,
        position: Coordinates,
        incident: Coordinates,
        traffic_multiplier: f64,
    ) -> RouteResult {
        let (distance_km, base_minutes, path, source) =
            match self.gateway.fetch_live_route(&position, &incident).await {
                Some(live) => (
                    live.distance_km,
                    live.duration_minutes,
                    live.path,
                    RouteSource::LiveApi,
                ),
                None => {
                    let direct_km = haversine_distance(&position, &incident);
                    let road_km = direct_km
                        * heuristics::detour_factor(direct_km, &position, &incident, &self.policy);
                    let minutes = heuristics::estimated_travel_time_minutes(
                        road_km,
                        &position,
                        &incident,
                        &self.policy,
                    );
                    let path = synthesize_route(&position, &incident, direct_km);
                    (road_km, minutes, path, RouteSource::Synthetic)
                }
            };

        RouteResult {
            crew_id: crew.id,
            crew_code: crew.code.clone(),
            crew_name: crew.name.clone(),
            distance_km,
            travel_time_minutes: base_minutes,
            travel_time_with_traffic_minutes: base_minutes * traffic_multiplier,
            path,
            source,
        }
    }
}
