//! Use cases

pub mod auth_service;
pub mod idle_service;
pub mod notification_center;
pub mod reminder_service;
pub mod resource_service;

pub use auth_service::{login, logout, whoami};
pub use idle_service::{idle_vehicles, IdleVehicle};
pub use notification_center::{
    ComplianceReminderProvider, IdleVehicleProvider, Notification, NotificationCenter,
    NotificationProvider,
};
pub use reminder_service::{load_reminders, load_vehicle_reminders};
