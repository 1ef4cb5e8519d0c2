//! Compliance document reminders
//!
//! A reminder is raised for every tracked document that is expired or
//! expires within [`REMINDER_WINDOW_DAYS`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::Vehicle;
use crate::time::parse_calendar_date;

/// Documents expiring within this many days are reported
pub const REMINDER_WINDOW_DAYS: i64 = 7;

/// Compliance documents tracked for reminders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentKind {
    Insurance,
    Permit,
    Pucc,
    NationalPermit,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 4] = [
        DocumentKind::Insurance,
        DocumentKind::Permit,
        DocumentKind::Pucc,
        DocumentKind::NationalPermit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DocumentKind::Insurance => "Insurance",
            DocumentKind::Permit => "Permit",
            DocumentKind::Pucc => "PUCC",
            DocumentKind::NationalPermit => "National Permit",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            DocumentKind::Insurance => "insurance",
            DocumentKind::Permit => "permit",
            DocumentKind::Pucc => "pucc",
            DocumentKind::NationalPermit => "national-permit",
        }
    }

    /// Raw expiry value on the vehicle
    pub fn expiry_field<'a>(&self, vehicle: &'a Vehicle) -> Option<&'a str> {
        match self {
            DocumentKind::Insurance => vehicle.insurance_date.as_deref(),
            DocumentKind::Permit => vehicle.permit_date.as_deref(),
            DocumentKind::Pucc => vehicle.pucc_date.as_deref(),
            DocumentKind::NationalPermit => vehicle.national_permit_date.as_deref(),
        }
    }
}

/// Reminder urgency, most urgent first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Urgent,
    High,
    Medium,
    Low,
}

impl Priority {
    /// Expired or ≤1 day → urgent, ≤3 → high, ≤5 → medium, else low
    pub fn from_days_remaining(days: i64) -> Self {
        match days {
            d if d <= 1 => Priority::Urgent,
            d if d <= 3 => Priority::High,
            d if d <= 5 => Priority::Medium,
            _ => Priority::Low,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Priority::Urgent => "urgent",
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One expiring or expired document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    /// Deterministic id: vehicle, document and expiry date
    pub id: String,
    pub vehicle_id: Option<i64>,
    pub vehicle_document_id: Option<String>,
    pub vehicle_number: String,
    pub document: DocumentKind,
    pub expiry_date: NaiveDate,
    pub days_remaining: i64,
    pub priority: Priority,
    pub message: String,
}

impl Reminder {
    pub fn is_expired(&self) -> bool {
        self.days_remaining < 0
    }
}

/// Whole calendar days from `today` to `expiry`
pub fn days_remaining(expiry: NaiveDate, today: NaiveDate) -> i64 {
    (expiry - today).num_days()
}

fn plural_days(n: i64) -> String {
    if n == 1 {
        "1 day".to_string()
    } else {
        format!("{} days", n)
    }
}

/// "expired 2 days ago", "expires today", "expires in 3 days"
pub fn due_phrase(days: i64) -> String {
    match days {
        d if d < 0 => format!("expired {} ago", plural_days(-d)),
        0 => "expires today".to_string(),
        d => format!("expires in {}", plural_days(d)),
    }
}

/// Reminders for one vehicle, in document order.
///
/// Missing or unparsable dates are skipped.
pub fn vehicle_reminders(vehicle: &Vehicle, today: NaiveDate) -> Vec<Reminder> {
    let vehicle_number = vehicle.display_name();
    let key = vehicle.key();

    DocumentKind::ALL
        .iter()
        .filter_map(|kind| {
            let expiry = kind.expiry_field(vehicle).and_then(parse_calendar_date)?;
            let days = days_remaining(expiry, today);
            if days > REMINDER_WINDOW_DAYS {
                return None;
            }
            Some(Reminder {
                id: format!("reminder:{}:{}:{}", key, kind.slug(), expiry),
                vehicle_id: vehicle.id,
                vehicle_document_id: vehicle.document_id.clone(),
                vehicle_number: vehicle_number.clone(),
                document: *kind,
                expiry_date: expiry,
                days_remaining: days,
                priority: Priority::from_days_remaining(days),
                message: format!("{} for {} {}", kind.label(), vehicle_number, due_phrase(days)),
            })
        })
        .collect()
}

/// Reminders for a fleet, sorted ascending by days remaining
pub fn generate_reminders(vehicles: &[Vehicle], today: NaiveDate) -> Vec<Reminder> {
    let mut reminders: Vec<Reminder> = vehicles
        .iter()
        .flat_map(|v| vehicle_reminders(v, today))
        .collect();
    reminders.sort_by_key(|r| r.days_remaining);
    reminders
}

pub fn generate_reminder_report(reminders: &[Reminder], today: NaiveDate) -> String {
    let expired = reminders.iter().filter(|r| r.is_expired()).count();
    let count_of = |p: Priority| reminders.iter().filter(|r| r.priority == p).count();

    let mut report = String::new();
    report.push_str("==================================================\n");
    report.push_str("            Compliance Reminder Report            \n");
    report.push_str("==================================================\n\n");
    report.push_str(&format!("  As of:            {}\n", today));
    report.push_str(&format!("  Total reminders:  {}\n", reminders.len()));
    report.push_str(&format!("  Expired:          {}\n", expired));
    report.push_str(&format!(
        "  Urgent/High/Medium/Low: {}/{}/{}/{}\n\n",
        count_of(Priority::Urgent),
        count_of(Priority::High),
        count_of(Priority::Medium),
        count_of(Priority::Low)
    ));

    if reminders.is_empty() {
        report.push_str("No documents expire within the next ");
        report.push_str(&plural_days(REMINDER_WINDOW_DAYS));
        report.push_str(".\n\n");
    } else {
        report.push_str(&format!(
            "{:<8} {:<16} {:<16} {:<11} {:>6}  {}\n",
            "Priority", "Vehicle", "Document", "Expiry", "Days", "Status"
        ));
        report.push_str("-".repeat(78).as_str());
        report.push('\n');
        for r in reminders {
            report.push_str(&format!(
                "{:<8} {:<16} {:<16} {:<11} {:>6}  {}\n",
                r.priority.label(),
                truncate_str(&r.vehicle_number, 15),
                r.document.label(),
                r.expiry_date,
                r.days_remaining,
                due_phrase(r.days_remaining)
            ));
        }
        report.push('\n');
    }

    report.push_str("==================================================\n");
    report
}

fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let truncated: String = s.chars().take(max_len.saturating_sub(2)).collect();
        format!("{}..", truncated)
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
    }

    fn day(offset: i64) -> String {
        (today() + Duration::days(offset)).to_string()
    }

    fn vehicle(number: &str) -> Vehicle {
        Vehicle {
            document_id: Some(format!("doc-{}", number)),
            vehicle_number: Some(number.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_seven_days_included_eight_excluded() {
        let mut v = vehicle("V1");
        v.insurance_date = Some(day(7));
        v.permit_date = Some(day(8));

        let reminders = vehicle_reminders(&v, today());
        assert_eq!(reminders.len(), 1);
        assert_eq!(reminders[0].document, DocumentKind::Insurance);
        assert_eq!(reminders[0].days_remaining, 7);
        assert_eq!(reminders[0].priority, Priority::Low);
    }

    #[test]
    fn test_past_dates_always_urgent() {
        let mut v = vehicle("V1");
        v.pucc_date = Some(day(-400));
        v.national_permit_date = Some(day(-1));

        let reminders = vehicle_reminders(&v, today());
        assert_eq!(reminders.len(), 2);
        assert!(reminders.iter().all(|r| r.priority == Priority::Urgent));
        assert!(reminders.iter().all(Reminder::is_expired));
        assert!(reminders[0].message.ends_with("expired 400 days ago"));
        assert!(reminders[1].message.ends_with("expired 1 day ago"));
    }

    #[test]
    fn test_priority_thresholds() {
        assert_eq!(Priority::from_days_remaining(-3), Priority::Urgent);
        assert_eq!(Priority::from_days_remaining(0), Priority::Urgent);
        assert_eq!(Priority::from_days_remaining(1), Priority::Urgent);
        assert_eq!(Priority::from_days_remaining(2), Priority::High);
        assert_eq!(Priority::from_days_remaining(3), Priority::High);
        assert_eq!(Priority::from_days_remaining(4), Priority::Medium);
        assert_eq!(Priority::from_days_remaining(5), Priority::Medium);
        assert_eq!(Priority::from_days_remaining(6), Priority::Low);
        assert_eq!(Priority::from_days_remaining(7), Priority::Low);
    }

    #[test]
    fn test_example_vehicle() {
        let mut v = vehicle("V1");
        v.insurance_date = Some(day(3));
        v.permit_date = Some(day(-2));

        let reminders = generate_reminders(&[v], today());
        assert_eq!(reminders.len(), 2);

        assert_eq!(reminders[0].document, DocumentKind::Permit);
        assert_eq!(reminders[0].priority, Priority::Urgent);
        assert_eq!(reminders[0].message, "Permit for V1 expired 2 days ago");

        assert_eq!(reminders[1].document, DocumentKind::Insurance);
        assert_eq!(reminders[1].priority, Priority::High);
        assert_eq!(reminders[1].message, "Insurance for V1 expires in 3 days");
    }

    #[test]
    fn test_sorted_ascending_across_vehicles() {
        let mut a = vehicle("A");
        a.insurance_date = Some(day(6));
        a.pucc_date = Some(day(0));
        let mut b = vehicle("B");
        b.permit_date = Some(day(-5));
        b.national_permit_date = Some(day(4));

        let reminders = generate_reminders(&[a, b], today());
        let days: Vec<i64> = reminders.iter().map(|r| r.days_remaining).collect();
        assert_eq!(days, vec![-5, 0, 4, 6]);
        assert_eq!(reminders[1].message, "PUCC for A expires today");
    }

    #[test]
    fn test_missing_and_unparsable_dates_skipped() {
        let mut v = vehicle("V1");
        v.insurance_date = Some("soon".to_string());
        v.permit_date = Some(String::new());
        v.fitness_date = Some(day(1));
        v.tax_date = Some(day(-1));

        assert!(vehicle_reminders(&v, today()).is_empty());
    }

    #[test]
    fn test_timestamp_dates_use_calendar_day() {
        let mut v = vehicle("V1");
        v.insurance_date = Some(format!("{}T23:59:00.000Z", day(2)));

        let reminders = vehicle_reminders(&v, today());
        assert_eq!(reminders[0].days_remaining, 2);
        assert_eq!(reminders[0].priority, Priority::High);
    }

    #[test]
    fn test_reminder_id_is_stable() {
        let mut v = vehicle("V1");
        v.insurance_date = Some(day(2));
        let first = vehicle_reminders(&v, today());
        let second = vehicle_reminders(&v, today() + Duration::days(1));
        assert_eq!(first[0].id, second[0].id);
        assert_eq!(first[0].id, format!("reminder:doc-V1:insurance:{}", day(2)));
    }

    #[test]
    fn test_generate_report() {
        let mut v = vehicle("MH12AB1234");
        v.insurance_date = Some(day(-2));
        let reminders = generate_reminders(&[v], today());
        let report = generate_reminder_report(&reminders, today());
        assert!(report.contains("Compliance Reminder Report"));
        assert!(report.contains("MH12AB1234"));
        assert!(report.contains("expired 2 days ago"));

        let empty = generate_reminder_report(&[], today());
        assert!(empty.contains("No documents expire within the next 7 days"));
    }
}
