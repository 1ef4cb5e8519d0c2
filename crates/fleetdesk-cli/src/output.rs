//! Output formatting module

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde_json::Value;

use fleetdesk_app::app::{IdleVehicle, Notification};
use fleetdesk_domain::model::{RecordPage, Resource};
use fleetdesk_domain::service::{generate_reminder_report, Reminder};
use fleetdesk_store::AuthSession;
use fleetdesk_types::{OutputFormat, Result};

const MAX_CELL_WIDTH: usize = 32;

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value)?;
    println!("{}", content);
    Ok(())
}

pub fn output_reminders(
    output_format: OutputFormat,
    reminders: &[Reminder],
    today: NaiveDate,
) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(reminders);
    }
    print!("{}", generate_reminder_report(reminders, today));
    Ok(())
}

pub fn output_idle(
    output_format: OutputFormat,
    vehicles: &[IdleVehicle],
    now: DateTime<Utc>,
) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(vehicles);
    }

    println!("\nIdle Vehicles ({})", now.format("%Y-%m-%d %H:%M UTC"));
    println!("=============");
    if vehicles.is_empty() {
        println!("No idle vehicles.");
        return Ok(());
    }

    print!("{}", idle_table(vehicles));
    Ok(())
}

fn idle_table(vehicles: &[IdleVehicle]) -> String {
    let rows: Vec<Vec<String>> = vehicles
        .iter()
        .map(|v| {
            vec![
                v.vehicle_number.clone(),
                v.idle.display(),
                format_since(v.idle.since),
                v.idle.source.label().to_string(),
                v.idle.last_trip.clone().unwrap_or_default(),
                v.idle.last_route.clone().unwrap_or_default(),
            ]
        })
        .collect();
    render_table(
        &["Vehicle", "Idle", "Since", "Source", "Last trip", "Route"],
        &rows,
    )
}

pub fn output_notifications(
    output_format: OutputFormat,
    notifications: &[Notification],
) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(notifications);
    }

    let unread = notifications.iter().filter(|n| !n.read).count();
    println!("\nNotifications: {} ({} unread)", notifications.len(), unread);
    println!("=============");
    for n in notifications {
        let marker = if n.read { " " } else { "*" };
        println!("{} [{:<6}] {}: {}", marker, n.priority.label(), n.title, n.message);
    }
    Ok(())
}

pub fn output_records(
    output_format: OutputFormat,
    resource: Resource,
    page: &RecordPage,
) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(&page.records);
    }

    let fields = resource.summary_fields();
    let mut headers = vec!["Document ID"];
    headers.extend(fields.iter().map(|(_, header)| *header));

    let rows: Vec<Vec<String>> = page
        .records
        .iter()
        .map(|record| {
            let mut row = vec![cell(record.get("documentId").or_else(|| record.get("id")))];
            row.extend(fields.iter().map(|(field, _)| cell(record.get(*field))));
            row
        })
        .collect();

    println!("\n{}", resource.label());
    print!("{}", render_table(&headers, &rows));
    match &page.pagination {
        Some(p) => println!(
            "Page {}/{} ({} records)",
            p.page,
            p.page_count.max(1),
            p.total
        ),
        None => println!("{} records", page.records.len()),
    }
    Ok(())
}

pub fn output_record(output_format: OutputFormat, record: &Value) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(record);
    }
    if let Value::Object(map) = record {
        let width = map.keys().map(|k| k.len()).max().unwrap_or(0);
        for (key, value) in map {
            println!("{:<width$}  {}", key, cell(Some(value)), width = width);
        }
    } else {
        println!("{}", cell(Some(record)));
    }
    Ok(())
}

pub fn output_session(output_format: OutputFormat, session: &AuthSession) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(&session.user);
    }
    println!("User:      {} (id {})", session.user.username, session.user.id);
    if !session.user.email.is_empty() {
        println!("Email:     {}", session.user.email);
    }
    println!("Backend:   {}", session.api_base_url);
    println!("Logged in: {}", session.logged_in_at.to_rfc3339());
    Ok(())
}

fn format_since(since: DateTime<Utc>) -> String {
    since.format("%Y-%m-%d %H:%M").to_string()
}

/// Table cell for a JSON value; relations show their display field
fn cell(value: Option<&Value>) -> String {
    let text = match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => if *b { "yes" } else { "no" }.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Array(items)) => format!("[{}]", items.len()),
        Some(Value::Object(map)) => ["name", "vehicleNumber", "tripNumber", "documentId"]
            .iter()
            .find_map(|k| map.get(*k).and_then(Value::as_str))
            .map(str::to_string)
            .unwrap_or_else(|| "{..}".to_string()),
    };
    truncate_cell(&text)
}

fn truncate_cell(s: &str) -> String {
    if s.chars().count() <= MAX_CELL_WIDTH {
        s.to_string()
    } else {
        let cut: String = s.chars().take(MAX_CELL_WIDTH - 3).collect();
        format!("{}...", cut)
    }
}

/// Left-aligned text table with a dashed rule under the header
fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, value) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(value.chars().count());
            }
        }
    }

    let format_row = |cells: Vec<&str>| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<width$}", c, width = *w))
            .collect();
        format!("{}\n", padded.join("  ").trim_end())
    };

    let mut out = format_row(headers.to_vec());
    let total: usize = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
    out.push_str(&"-".repeat(total));
    out.push('\n');
    for row in rows {
        out.push_str(&format_row(row.iter().map(String::as_str).collect()));
    }
    out
}
