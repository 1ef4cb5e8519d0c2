//! Compliance reminders for the fleet

use chrono::NaiveDate;
use tracing::{debug, warn};

use fleetdesk_domain::repository::VehicleRepository;
use fleetdesk_domain::service::{generate_reminders, vehicle_reminders, Reminder};
use fleetdesk_types::{Error, Result};

/// Reminders for every vehicle, most urgent first.
///
/// A failed fetch is logged and yields an empty list.
pub async fn load_reminders(repo: &dyn VehicleRepository, today: NaiveDate) -> Vec<Reminder> {
    match repo.find_all_with_trips().await {
        Ok(vehicles) => {
            let reminders = generate_reminders(&vehicles, today);
            debug!(
                vehicles = vehicles.len(),
                reminders = reminders.len(),
                "Generated compliance reminders"
            );
            reminders
        }
        Err(e) => {
            warn!("Failed to fetch vehicles for reminders: {}", e);
            Vec::new()
        }
    }
}

/// Reminders for one vehicle looked up by document id
pub async fn load_vehicle_reminders(
    repo: &dyn VehicleRepository,
    document_id: &str,
    today: NaiveDate,
) -> Result<Vec<Reminder>> {
    let vehicle = repo
        .find_by_document_id(document_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("vehicle {}", document_id)))?;
    let mut reminders = vehicle_reminders(&vehicle, today);
    reminders.sort_by_key(|r| r.days_remaining);
    Ok(reminders)
}
