//! Domain services

pub mod idle_time;
pub mod reminders;

pub use idle_time::{idle_status, last_completed_trip, IdleSource, IdleStatus};
pub use reminders::{
    generate_reminder_report, generate_reminders, vehicle_reminders, DocumentKind, Priority,
    Reminder,
};
