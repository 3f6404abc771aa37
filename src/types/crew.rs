//! Crew (cuadrilla) types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::route::Coordinates;

/// Capability category of a crew
///
/// Category drives which incidents a crew may be dispatched to and the
/// color its route is rendered with on the dashboard map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CrewCategory {
    A,
    B,
    C,
}

impl CrewCategory {
    /// Rendering color convention: A blue, B green, C red.
    pub fn color(&self) -> &'static str {
        match self {
            CrewCategory::A => "#2563eb",
            CrewCategory::B => "#16a34a",
            CrewCategory::C => "#dc2626",
        }
    }

    pub fn all() -> [CrewCategory; 3] {
        [CrewCategory::A, CrewCategory::B, CrewCategory::C]
    }
}

/// Crew entity - a field repair team (cuadrilla) that can be dispatched to tickets
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Crew {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    /// Current position, if the crew has reported one
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub category: CrewCategory,
    pub is_active: bool,
}

impl Crew {
    /// Position usable for dispatch. `None` when either component is
    /// missing or outside the WGS84 ranges - such crews are skipped,
    /// never an error.
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

#[cfg(test)]
mod tests {
    use super::*;

    fn crew_at(lat: Option<f64>, lng: Option<f64>) -> Crew {
        Crew {
            id: Uuid::nil(),
            code: "CUA-01".to_string(),
            name: "Cuadrilla Norte".to_string(),
            lat,
            lng,
            category: CrewCategory::A,
            is_active: true,
        }
    }

    #[test]
    fn test_coordinates_present_and_valid() {
        let crew = crew_at(Some(-12.08), Some(-77.05));
        let coords = crew.coordinates().unwrap();
        assert!((coords.lat - -12.08).abs() < f64::EPSILON);
        assert!((coords.lng - -77.05).abs() < f64::EPSILON);
    }

    #[test]
    fn test_coordinates_missing_latitude() {
        let crew = crew_at(None, Some(-77.05));
        assert!(crew.coordinates().is_none());
    }

    #[test]
    fn test_coordinates_out_of_range() {
        let crew = crew_at(Some(-95.0), Some(-77.05));
        assert!(crew.coordinates().is_none());
    }

    #[test]
    fn test_category_colors() {
        assert_eq!(CrewCategory::A.color(), "#2563eb");
        assert_eq!(CrewCategory::B.color(), "#16a34a");
        assert_eq!(CrewCategory::C.color(), "#dc2626");
    }

    #[test]
    fn test_crew_deserializes_camel_case() {
        let json = r#"{
            "id": "123e4567-e89b-12d3-a456-426614174000",
            "code": "CUA-03",
            "name": "Cuadrilla Este",
            "lat": -12.07,
            "lng": -76.99,
            "category": "B",
            "isActive": true
        }"#;

        let crew: Crew = serde_json::from_str(json).unwrap();
        assert_eq!(crew.code, "CUA-03");
        assert_eq!(crew.category, CrewCategory::B);
        assert!(crew.is_active);
    }

    #[test]
    fn test_crew_null_coordinates_deserialize() {
        let json = r#"{
            "id": "123e4567-e89b-12d3-a456-426614174000",
            "code": "CUA-04",
            "name": "Cuadrilla Oeste",
            "lat": null,
            "lng": null,
            "category": "C",
            "isActive": false
        }"#;

        let crew: Crew = serde_json::from_str(json).unwrap();
        assert!(crew.coordinates().is_none());
    }
}
