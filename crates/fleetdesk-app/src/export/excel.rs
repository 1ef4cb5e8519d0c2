//! Excel export

use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};

use fleetdesk_types::{Error, Result};

use super::FleetSnapshot;

fn excel_err(e: XlsxError) -> Error {
    Error::Export(e.to_string())
}

/// Export a snapshot to an Excel workbook
pub fn export_to_excel(snapshot: &FleetSnapshot, output_path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();

    let summary_sheet = workbook.add_worksheet();
    write_summary_sheet(summary_sheet, snapshot)?;

    let reminders_sheet = workbook.add_worksheet();
    write_reminders_sheet(reminders_sheet, snapshot)?;

    let idle_sheet = workbook.add_worksheet();
    write_idle_sheet(idle_sheet, snapshot)?;

    workbook.save(output_path).map_err(excel_err)?;
    Ok(())
}

fn write_headers(sheet: &mut Worksheet, headers: &[&str], format: &Format) -> Result<()> {
    for (col, header) in headers.iter().enumerate() {
        sheet
            .write_string_with_format(0, col as u16, *header, format)
            .map_err(excel_err)?;
    }
    Ok(())
}

fn write_summary_sheet(sheet: &mut Worksheet, snapshot: &FleetSnapshot) -> Result<()> {
    sheet.set_name("Summary").map_err(excel_err)?;
    let header_format = Format::new().set_bold();

    sheet
        .write_string_with_format(0, 0, "Fleet Compliance Report", &header_format)
        .map_err(excel_err)?;

    let expired = snapshot.reminders.iter().filter(|r| r.is_expired()).count();
    let rows: [(&str, String); 5] = [
        ("Generated At:", snapshot.generated_at.to_rfc3339()),
        ("Reference Date:", snapshot.today.to_string()),
        ("Reminders:", snapshot.reminders.len().to_string()),
        ("Expired Documents:", expired.to_string()),
        ("Idle Vehicles:", snapshot.idle.len().to_string()),
    ];
    for (i, (label, value)) in rows.iter().enumerate() {
        let row = (i + 2) as u32;
        sheet.write_string(row, 0, *label).map_err(excel_err)?;
        sheet.write_string(row, 1, value).map_err(excel_err)?;
    }

    sheet.set_column_width(0, 22).map_err(excel_err)?;
    sheet.set_column_width(1, 28).map_err(excel_err)?;
    Ok(())
}

fn write_reminders_sheet(sheet: &mut Worksheet, snapshot: &FleetSnapshot) -> Result<()> {
    sheet.set_name("Reminders").map_err(excel_err)?;
    let header_format = Format::new().set_bold();
    let urgent_format = Format::new().set_font_color(rust_xlsxwriter::Color::Red);

    write_headers(
        sheet,
        &[
            "Vehicle",
            "Document",
            "Expiry Date",
            "Days Remaining",
            "Priority",
            "Message",
        ],
        &header_format,
    )?;

    for (row_idx, reminder) in snapshot.reminders.iter().enumerate() {
        let row = (row_idx + 1) as u32;
        sheet
            .write_string(row, 0, &reminder.vehicle_number)
            .map_err(excel_err)?;
        sheet
            .write_string(row, 1, reminder.document.label())
            .map_err(excel_err)?;
        sheet
            .write_string(row, 2, reminder.expiry_date.to_string())
            .map_err(excel_err)?;
        sheet
            .write_number(row, 3, reminder.days_remaining as f64)
            .map_err(excel_err)?;
        if reminder.is_expired() {
            sheet
                .write_string_with_format(row, 4, reminder.priority.label(), &urgent_format)
                .map_err(excel_err)?;
        } else {
            sheet
                .write_string(row, 4, reminder.priority.label())
                .map_err(excel_err)?;
        }
        sheet
            .write_string(row, 5, &reminder.message)
            .map_err(excel_err)?;
    }

    sheet.set_column_width(0, 16).map_err(excel_err)?;
    sheet.set_column_width(1, 16).map_err(excel_err)?;
    sheet.set_column_width(5, 40).map_err(excel_err)?;
    Ok(())
}

fn write_idle_sheet(sheet: &mut Worksheet, snapshot: &FleetSnapshot) -> Result<()> {
    sheet.set_name("Idle").map_err(excel_err)?;
    let header_format = Format::new().set_bold();

    write_headers(
        sheet,
        &["Vehicle", "Idle (h)", "Idle Since", "Source", "Last Trip", "Route"],
        &header_format,
    )?;

    for (row_idx, vehicle) in snapshot.idle.iter().enumerate() {
        let row = (row_idx + 1) as u32;
        let idle = &vehicle.idle;
        sheet
            .write_string(row, 0, &vehicle.vehicle_number)
            .map_err(excel_err)?;
        sheet.write_number(row, 1, idle.hours).map_err(excel_err)?;
        sheet
            .write_string(row, 2, idle.since.to_rfc3339())
            .map_err(excel_err)?;
        sheet
            .write_string(row, 3, idle.source.label())
            .map_err(excel_err)?;
        if let Some(trip) = &idle.last_trip {
            sheet.write_string(row, 4, trip).map_err(excel_err)?;
        }
        if let Some(route) = &idle.last_route {
            sheet.write_string(row, 5, route).map_err(excel_err)?;
        }
    }

    sheet.set_column_width(0, 16).map_err(excel_err)?;
    sheet.set_column_width(2, 28).map_err(excel_err)?;
    sheet.set_column_width(5, 30).map_err(excel_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::tests::sample_snapshot;

    #[test]
    fn test_export_to_excel_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fleet.xlsx");
        export_to_excel(&sample_snapshot(), &path).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_export_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("fleet.xlsx");
        let err = export_to_excel(&sample_snapshot(), &path).unwrap_err();
        assert!(matches!(err, Error::Export(_)));
    }
}
