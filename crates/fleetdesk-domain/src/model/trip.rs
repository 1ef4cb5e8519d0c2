//! Trip records

use serde::{Deserialize, Serialize};

use super::relation::{lenient_decimal, Relation};
use super::{Driver, LoadProvider, Vehicle};
use crate::time::parse_timestamp;

/// Trip lifecycle status as stored by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TripStatus {
    Scheduled,
    InTransit,
    Completed,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl TripStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TripStatus::Scheduled => "scheduled",
            TripStatus::InTransit => "in-transit",
            TripStatus::Completed => "completed",
            TripStatus::Cancelled => "cancelled",
            TripStatus::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub document_id: Option<String>,
    #[serde(default)]
    pub trip_number: Option<String>,
    #[serde(default)]
    pub start_point: Option<String>,
    #[serde(default)]
    pub end_point: Option<String>,
    #[serde(default)]
    pub scheduled_start_time: Option<String>,
    #[serde(default)]
    pub scheduled_end_time: Option<String>,
    #[serde(default)]
    pub actual_start_time: Option<String>,
    #[serde(default)]
    pub actual_end_time: Option<String>,
    #[serde(default)]
    pub status: Option<TripStatus>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub freight_amount: Option<f64>,
    #[serde(default)]
    pub driver: Option<Relation<Driver>>,
    #[serde(default)]
    pub vehicle: Option<Relation<Box<Vehicle>>>,
    #[serde(default)]
    pub load_provider: Option<Relation<LoadProvider>>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Trip {
    pub fn is_completed(&self) -> bool {
        self.status == Some(TripStatus::Completed)
    }

    /// Actual end time, if present and parsable
    pub fn actual_end(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        self.actual_end_time.as_deref().and_then(parse_timestamp)
    }

    /// Trip number, falling back to the document id
    pub fn display_name(&self) -> String {
        self.trip_number
            .clone()
            .or_else(|| self.document_id.clone())
            .or_else(|| self.id.map(|id| format!("#{}", id)))
            .unwrap_or_else(|| "-".to_string())
    }

    /// "start → end" when both points are known
    pub fn route(&self) -> Option<String> {
        match (&self.start_point, &self.end_point) {
            (Some(start), Some(end)) => Some(format!("{} → {}", start, end)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_populated_trip() {
        let json = r#"{
            "id": 3,
            "documentId": "trp3",
            "tripNumber": "T-0003",
            "startPoint": "Pune",
            "endPoint": "Mumbai",
            "actualEndTime": "2024-05-01T10:30:00.000Z",
            "status": "completed",
            "vehicle": 9
        }"#;
        let trip: Trip = serde_json::from_str(json).unwrap();
        assert!(trip.is_completed());
        assert_eq!(trip.route().as_deref(), Some("Pune → Mumbai"));
        assert!(trip.actual_end().is_some());
        assert!(matches!(trip.vehicle, Some(Relation::Id(_))));
    }

    #[test]
    fn test_unknown_status_is_tolerated() {
        let trip: Trip = serde_json::from_str(r#"{"status": "on-hold"}"#).unwrap();
        assert_eq!(trip.status, Some(TripStatus::Unknown));
        assert!(!trip.is_completed());
    }

    #[test]
    fn test_display_name_fallbacks() {
        let trip = Trip {
            id: Some(5),
            ..Default::default()
        };
        assert_eq!(trip.display_name(), "#5");
    }
}
