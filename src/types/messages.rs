//! NATS message types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::crew::Crew;
use super::route::{CategoryRouteResult, Coordinates, RouteResult};
use super::ticket::Ticket;

/// Generic request wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request<T> {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub payload: T,
}

impl<T> Request<T> {
    pub fn new(payload: T) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            payload,
        }
    }
}

/// Generic success response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessResponse<T> {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub payload: T,
}

impl<T> SuccessResponse<T> {
    pub fn new(request_id: Uuid, payload: T) -> Self {
        Self {
            id: request_id,
            timestamp: Utc::now(),
            payload,
        }
    }
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(request_id: Uuid, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: request_id,
            timestamp: Utc::now(),
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
            },
        }
    }
}

// ==========================================================================
// Dispatch subjects
// ==========================================================================

/// Request for `despacho.dispatch.routes` and `despacho.dispatch.best`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchRequest {
    /// The incident being dispatched; its site location is the route target
    pub ticket: Ticket,
    /// Candidate crews, already filtered to active ones by the caller
    pub crews: Vec<Crew>,
}

/// Response for `despacho.dispatch.routes`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchRoutesResponse {
    pub items: Vec<RouteResult>,
    pub total: i64,
}

/// Response for `despacho.dispatch.best`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchBestResponse {
    pub items: Vec<CategoryRouteResult>,
    pub total: i64,
}

// ==========================================================================
// Simulation subjects
// ==========================================================================

/// Request for `despacho.simulation.start`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationStartRequest {
    /// Path the simulated crew marker follows, usually a computed route path
    pub path: Vec<Coordinates>,
}

/// Request for `despacho.simulation.tick` and `despacho.simulation.stop`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationSessionRequest {
    pub session_id: Uuid,
}

/// Snapshot of a simulation session returned by start/tick/stop
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationStateResponse {
    pub session_id: Uuid,
    pub current_step_index: usize,
    pub total_steps: usize,
    pub is_active: bool,
    /// Current marker position, absent once the session is stopped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Coordinates>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::crew::CrewCategory;

    fn ticket_json() -> &'static str {
        r#"{
            "id": "223e4567-e89b-12d3-a456-426614174000",
            "code": "TKT-0231",
            "lat": -12.0464,
            "lng": -77.0428,
            "category": "A",
            "status": "open"
        }"#
    }

    #[test]
    fn test_dispatch_request_deserialize() {
        let json = format!(
            r#"{{
                "ticket": {},
                "crews": [{{
                    "id": "123e4567-e89b-12d3-a456-426614174000",
                    "code": "CUA-01",
                    "name": "Cuadrilla Norte",
                    "lat": -12.08,
                    "lng": -77.05,
                    "category": "A",
                    "isActive": true
                }}]
            }}"#,
            ticket_json()
        );

        let request: DispatchRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(request.crews.len(), 1);
        assert_eq!(request.crews[0].category, CrewCategory::A);
        let incident = request.ticket.coordinates().unwrap();
        assert!((incident.lat - -12.0464).abs() < 1e-9);
    }

    #[test]
    fn test_request_envelope_roundtrip() {
        let ticket: Ticket = serde_json::from_str(ticket_json()).unwrap();
        let request = Request::new(DispatchRequest {
            ticket,
            crews: vec![],
        });

        let json = serde_json::to_string(&request).unwrap();
        let parsed: Request<DispatchRequest> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, request.id);
        assert!(parsed.payload.crews.is_empty());
        assert_eq!(parsed.payload.ticket.code, "TKT-0231");
    }

    #[test]
    fn test_error_response_shape() {
        let response = ErrorResponse::new(Uuid::nil(), "INVALID_REQUEST", "bad payload");
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"code\":\"INVALID_REQUEST\""));
        assert!(json.contains("\"message\":\"bad payload\""));
    }

    #[test]
    fn test_simulation_state_omits_position_when_none() {
        let state = SimulationStateResponse {
            session_id: Uuid::nil(),
            current_step_index: 0,
            total_steps: 0,
            is_active: false,
            position: None,
        };
        let json = serde_json::to_string(&state).unwrap();
        assert!(!json.contains("position"));
    }
}
