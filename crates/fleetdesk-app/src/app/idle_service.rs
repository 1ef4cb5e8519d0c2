//! Idle vehicles and how long they have been standing

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use fleetdesk_domain::model::VehicleStatus;
use fleetdesk_domain::repository::VehicleRepository;
use fleetdesk_domain::service::{idle_status, IdleStatus};
use fleetdesk_types::Result;

/// A vehicle in `idle` status with its derived idle time
#[derive(Debug, Clone, Serialize)]
pub struct IdleVehicle {
    pub vehicle_number: String,
    pub document_id: Option<String>,
    /// Stable key of the vehicle record
    pub key: String,
    pub idle: IdleStatus,
}

/// Idle vehicles at `now`, longest idle first.
///
/// Vehicles with neither a completed trip nor an update time are left out.
pub async fn idle_vehicles(
    repo: &dyn VehicleRepository,
    now: DateTime<Utc>,
) -> Result<Vec<IdleVehicle>> {
    let vehicles = repo.find_by_status(VehicleStatus::Idle).await?;
    let mut idle: Vec<IdleVehicle> = vehicles
        .iter()
        .filter(|v| v.is_idle())
        .filter_map(|v| match idle_status(v, now) {
            Some(status) => Some(IdleVehicle {
                vehicle_number: v.display_name(),
                document_id: v.document_id.clone(),
                key: v.key(),
                idle: status,
            }),
            None => {
                debug!(vehicle = %v.display_name(), "No reference time for idle vehicle");
                None
            }
        })
        .collect();
    idle.sort_by(|a, b| b.idle.hours.total_cmp(&a.idle.hours));
    Ok(idle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::reminder_service::tests::FakeVehicles;
    use chrono::{Duration, TimeZone};
    use fleetdesk_domain::model::{Relation, Trip, TripStatus, Vehicle};
    use fleetdesk_domain::service::IdleSource;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap()
    }

    fn idle_vehicle(doc: &str, hours_since_trip: Option<i64>, updated_hours_ago: i64) -> Vehicle {
        let trips = hours_since_trip
            .map(|h| {
                vec![Relation::Populated(Trip {
                    status: Some(TripStatus::Completed),
                    actual_end_time: Some((now() - Duration::hours(h)).to_rfc3339()),
                    ..Default::default()
                })]
            })
            .unwrap_or_default();
        Vehicle {
            document_id: Some(doc.to_string()),
            vehicle_number: Some(doc.to_uppercase()),
            current_status: Some(VehicleStatus::Idle),
            trips,
            updated_at: Some((now() - Duration::hours(updated_hours_ago)).to_rfc3339()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_idle_vehicles_sorted_longest_first() {
        let mut busy = idle_vehicle("busy", Some(1), 1);
        busy.current_status = Some(VehicleStatus::InTransit);
        let repo = FakeVehicles {
            vehicles: vec![
                idle_vehicle("short", Some(3), 1),
                busy,
                idle_vehicle("long", None, 48),
            ],
            fail: false,
        };

        let idle = idle_vehicles(&repo, now()).await.unwrap();
        assert_eq!(idle.len(), 2);
        assert_eq!(idle[0].vehicle_number, "LONG");
        assert_eq!(idle[0].idle.source, IdleSource::VehicleUpdatedAt);
        assert_eq!(idle[1].vehicle_number, "SHORT");
        assert_eq!(idle[1].idle.source, IdleSource::LastCompletedTrip);
        assert_eq!(idle[1].idle.display(), "3.0h");
    }

    #[tokio::test]
    async fn test_fetch_failure_propagates() {
        let repo = FakeVehicles {
            vehicles: vec![],
            fail: true,
        };
        assert!(idle_vehicles(&repo, now()).await.is_err());
    }
}
