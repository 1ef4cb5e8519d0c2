//! Idle-time derivation from trip history

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Trip, Vehicle};
use crate::time::parse_timestamp;

/// Smallest idle duration ever reported, in hours
pub const MIN_IDLE_HOURS: f64 = 0.1;

/// Where the idle-since instant came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdleSource {
    LastCompletedTrip,
    VehicleUpdatedAt,
}

impl IdleSource {
    pub fn label(&self) -> &'static str {
        match self {
            IdleSource::LastCompletedTrip => "last trip",
            IdleSource::VehicleUpdatedAt => "last update",
        }
    }
}

/// Derived idle information for one vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdleStatus {
    pub since: DateTime<Utc>,
    pub source: IdleSource,
    pub hours: f64,
    pub last_trip: Option<String>,
    pub last_route: Option<String>,
}

impl IdleStatus {
    /// e.g. "12.5h"
    pub fn display(&self) -> String {
        format_idle_hours(self.hours)
    }
}

/// Completed trip with the latest actual end time.
///
/// Unpopulated trips and trips without a parsable end time are ignored.
pub fn last_completed_trip(vehicle: &Vehicle) -> Option<(&Trip, DateTime<Utc>)> {
    let mut completed: Vec<(&Trip, DateTime<Utc>)> = vehicle
        .populated_trips()
        .filter(|trip| trip.is_completed())
        .filter_map(|trip| trip.actual_end().map(|end| (trip, end)))
        .collect();
    completed.sort_by(|a, b| b.1.cmp(&a.1));
    completed.into_iter().next()
}

/// Hours between `since` and `now`, one decimal, floored at [`MIN_IDLE_HOURS`]
pub fn idle_hours(since: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let hours = (now - since).num_seconds() as f64 / 3600.0;
    let rounded = (hours * 10.0).round() / 10.0;
    rounded.max(MIN_IDLE_HOURS)
}

pub fn format_idle_hours(hours: f64) -> String {
    format!("{:.1}h", hours.max(MIN_IDLE_HOURS))
}

/// Idle status of a vehicle at `now`.
///
/// Uses the last completed trip's end time, falling back to the vehicle's
/// `updatedAt`. Returns `None` when neither is available.
pub fn idle_status(vehicle: &Vehicle, now: DateTime<Utc>) -> Option<IdleStatus> {
    if let Some((trip, end)) = last_completed_trip(vehicle) {
        return Some(IdleStatus {
            since: end,
            source: IdleSource::LastCompletedTrip,
            hours: idle_hours(end, now),
            last_trip: Some(trip.display_name()),
            last_route: trip.route(),
        });
    }

    let updated = vehicle.updated_at.as_deref().and_then(parse_timestamp)?;
    Some(IdleStatus {
        since: updated,
        source: IdleSource::VehicleUpdatedAt,
        hours: idle_hours(updated, now),
        last_trip: None,
        last_route: None,
    })
}
