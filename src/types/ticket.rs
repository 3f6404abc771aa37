//! Ticket (incident) types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::route::Coordinates;

/// Ticket entity - a reported fault at a site needing crew dispatch
///
/// The dispatch engine only reads the location; lifecycle and editing
/// belong to the surrounding application.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: Uuid,
    pub code: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    /// Requested crew capability, when the reporter specified one
    pub category: Option<String>,
    pub status: String,
}

impl Ticket {
    /// Incident location usable for dispatch, validated like crew positions.
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => {
                let coords = Coordinates::new(lat, lng);
                coords.is_valid().then_some(coords)
            }
            _ => None,
        }
    }
}
