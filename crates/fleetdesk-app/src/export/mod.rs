//! Export of reminders and idle status

mod csv_export;
mod excel;

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};

use fleetdesk_domain::service::Reminder;
use fleetdesk_types::{Error, Result};

use crate::app::IdleVehicle;

pub use csv_export::export_to_csv;
pub use excel::export_to_excel;

/// Snapshot written by an export
#[derive(Debug, Clone)]
pub struct FleetSnapshot {
    pub generated_at: DateTime<Utc>,
    pub today: NaiveDate,
    pub reminders: Vec<Reminder>,
    pub idle: Vec<IdleVehicle>,
}

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Excel,
    Csv,
}

impl ExportFormat {
    /// Format chosen by file extension (`.xlsx` or `.csv`)
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("xlsx") => Ok(ExportFormat::Excel),
            Some("csv") => Ok(ExportFormat::Csv),
            _ => Err(Error::InvalidInput(format!(
                "unsupported export file {} (use .xlsx or .csv)",
                path.display()
            ))),
        }
    }
}

/// Write the snapshot to `output_path`. Returns every file written.
pub fn export_snapshot(snapshot: &FleetSnapshot, output_path: &Path) -> Result<Vec<PathBuf>> {
    match ExportFormat::from_path(output_path)? {
        ExportFormat::Excel => {
            export_to_excel(snapshot, output_path)?;
            Ok(vec![output_path.to_path_buf()])
        }
        ExportFormat::Csv => export_to_csv(snapshot, output_path),
    }
}
