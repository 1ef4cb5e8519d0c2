//! CSV export
//!
//! Reminders go to the requested file; idle vehicles, when any, to a
//! sibling `<stem>_idle.csv`.

use std::path::{Path, PathBuf};

use fleetdesk_types::{Error, Result};

use super::FleetSnapshot;

fn csv_err(e: csv::Error) -> Error {
    Error::Export(e.to_string())
}

/// Export a snapshot to CSV. Returns every file written.
pub fn export_to_csv(snapshot: &FleetSnapshot, output_path: &Path) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    let mut writer = csv::Writer::from_path(output_path).map_err(csv_err)?;
    writer
        .write_record([
            "vehicle_number",
            "vehicle_document_id",
            "document",
            "expiry_date",
            "days_remaining",
            "priority",
            "message",
        ])
        .map_err(csv_err)?;
    for reminder in &snapshot.reminders {
        let expiry = reminder.expiry_date.to_string();
        let days = reminder.days_remaining.to_string();
        writer
            .write_record([
                reminder.vehicle_number.as_str(),
                reminder.vehicle_document_id.as_deref().unwrap_or(""),
                reminder.document.slug(),
                expiry.as_str(),
                days.as_str(),
                reminder.priority.label(),
                reminder.message.as_str(),
            ])
            .map_err(csv_err)?;
    }
    writer.flush()?;
    written.push(output_path.to_path_buf());

    if !snapshot.idle.is_empty() {
        let idle_path = idle_path_for(output_path);
        let mut writer = csv::Writer::from_path(&idle_path).map_err(csv_err)?;
        writer
            .write_record([
                "vehicle_number",
                "idle_hours",
                "idle_since",
                "source",
                "last_trip",
                "route",
            ])
            .map_err(csv_err)?;
        for vehicle in &snapshot.idle {
            let idle = &vehicle.idle;
            let hours = format!("{:.1}", idle.hours);
            let since = idle.since.to_rfc3339();
            writer
                .write_record([
                    vehicle.vehicle_number.as_str(),
                    hours.as_str(),
                    since.as_str(),
                    idle.source.label(),
                    idle.last_trip.as_deref().unwrap_or(""),
                    idle.last_route.as_deref().unwrap_or(""),
                ])
                .map_err(csv_err)?;
        }
        writer.flush()?;
        written.push(idle_path);
    }

    Ok(written)
}

fn idle_path_for(output_path: &Path) -> PathBuf {
    let stem = output_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("export");
    output_path.with_file_name(format!("{}_idle.csv", stem))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::tests::sample_snapshot;

    #[test]
    fn test_csv_files_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fleet.csv");
        let written = export_to_csv(&sample_snapshot(), &path).unwrap();
        assert_eq!(written, vec![path.clone(), dir.path().join("fleet_idle.csv")]);

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "MH12AB1234");
        assert_eq!(&rows[0][2], "permit");
        assert_eq!(&rows[0][4], "-2");
        assert_eq!(&rows[0][5], "urgent");

        let idle = std::fs::read_to_string(dir.path().join("fleet_idle.csv")).unwrap();
        assert!(idle.contains("MH14XY0001,24.0,"));
    }

    #[test]
    fn test_no_idle_file_without_idle_vehicles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fleet.csv");
        let mut snapshot = sample_snapshot();
        snapshot.idle.clear();
        assert_eq!(export_to_csv(&snapshot, &path).unwrap(), vec![path]);
    }
}
