//! Vehicle records and compliance dates

use serde::{Deserialize, Serialize};

use super::relation::{lenient_decimal, nullable_vec, Relation};
use super::Trip;

/// Operational status of a vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VehicleStatus {
    Idle,
    InTransit,
    Completed,
    Maintenance,
    #[serde(other)]
    Unknown,
}

impl VehicleStatus {
    /// Value used by the backend, also accepted on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleStatus::Idle => "idle",
            VehicleStatus::InTransit => "in-transit",
            VehicleStatus::Completed => "completed",
            VehicleStatus::Maintenance => "maintenance",
            VehicleStatus::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub document_id: Option<String>,
    #[serde(default)]
    pub vehicle_number: Option<String>,
    #[serde(default)]
    pub chassis_number: Option<String>,
    #[serde(default)]
    pub engine_number: Option<String>,
    #[serde(default)]
    pub make: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub vehicle_type: Option<String>,
    /// Load capacity in tonnes
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub capacity: Option<f64>,
    #[serde(default)]
    pub insurance_date: Option<String>,
    #[serde(default)]
    pub permit_date: Option<String>,
    #[serde(default)]
    pub pucc_date: Option<String>,
    #[serde(default)]
    pub fitness_date: Option<String>,
    #[serde(default)]
    pub tax_date: Option<String>,
    #[serde(default)]
    pub national_permit_date: Option<String>,
    #[serde(default)]
    pub current_status: Option<VehicleStatus>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub trips: Vec<Relation<Trip>>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Vehicle {
    pub fn is_idle(&self) -> bool {
        self.current_status == Some(VehicleStatus::Idle)
    }

    /// Trips the backend inlined; bare ids are skipped
    pub fn populated_trips(&self) -> impl Iterator<Item = &Trip> {
        self.trips.iter().filter_map(Relation::populated)
    }

    /// Vehicle number, falling back to the document id
    pub fn display_name(&self) -> String {
        self.vehicle_number
            .clone()
            .or_else(|| self.document_id.clone())
            .or_else(|| self.id.map(|id| format!("#{}", id)))
            .unwrap_or_else(|| "(unnamed vehicle)".to_string())
    }

    /// Stable key for derived records (document id, then id, then number)
    pub fn key(&self) -> String {
        self.document_id
            .clone()
            .or_else(|| self.id.map(|id| id.to_string()))
            .or_else(|| self.vehicle_number.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trips_as_ids() {
        let vehicle: Vehicle =
            serde_json::from_str(r#"{"vehicleNumber": "MH12AB1234", "trips": [1, 2, 3]}"#).unwrap();
        assert_eq!(vehicle.trips.len(), 3);
        assert_eq!(vehicle.populated_trips().count(), 0);
    }

    #[test]
    fn test_trips_populated() {
        let vehicle: Vehicle = serde_json::from_str(
            r#"{"vehicleNumber": "MH12AB1234", "trips": [{"id": 1, "status": "completed"}]}"#,
        )
        .unwrap();
        assert_eq!(vehicle.populated_trips().count(), 1);
    }

    #[test]
    fn test_null_trips_and_status() {
        let vehicle: Vehicle = serde_json::from_str(
            r#"{"documentId": "veh1", "trips": null, "currentStatus": "idle"}"#,
        )
        .unwrap();
        assert!(vehicle.trips.is_empty());
        assert!(vehicle.is_idle());
        assert_eq!(vehicle.display_name(), "veh1");
        assert_eq!(vehicle.key(), "veh1");
    }

    #[test]
    fn test_status_serializes_kebab_case() {
        let json = serde_json::to_string(&VehicleStatus::InTransit).unwrap();
        assert_eq!(json, "\"in-transit\"");
    }
}
