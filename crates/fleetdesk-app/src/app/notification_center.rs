//! Notification bell: a list of providers behind one trait
//!
//! Each provider derives its notifications on demand. Nothing is stored
//! except which ids the user has marked read.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use fleetdesk_domain::repository::VehicleRepository;
use fleetdesk_domain::service::{generate_reminders, Priority};
use fleetdesk_store::ReadStateStore;
use fleetdesk_types::Result;

use super::idle_service::idle_vehicles;

/// One entry in the notification list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    /// Deterministic, so read markers survive restarts
    pub id: String,
    pub source: String,
    pub title: String,
    pub message: String,
    pub priority: Priority,
    pub read: bool,
}

#[async_trait]
pub trait NotificationProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn fetch_notifications(&self) -> Result<Vec<Notification>>;

    async fn has_unread_notifications(&self, read_state: &ReadStateStore) -> Result<bool> {
        let notifications = self.fetch_notifications().await?;
        Ok(notifications.iter().any(|n| !read_state.is_read(&n.id)))
    }
}

/// Expired and soon-expiring compliance documents
pub struct ComplianceReminderProvider {
    repo: Arc<dyn VehicleRepository>,
    today: NaiveDate,
}

impl ComplianceReminderProvider {
    pub fn new(repo: Arc<dyn VehicleRepository>, today: NaiveDate) -> Self {
        Self { repo, today }
    }
}

#[async_trait]
impl NotificationProvider for ComplianceReminderProvider {
    fn name(&self) -> &'static str {
        "compliance"
    }

    async fn fetch_notifications(&self) -> Result<Vec<Notification>> {
        let vehicles = self.repo.find_all_with_trips().await?;
        let reminders = generate_reminders(&vehicles, self.today);
        Ok(reminders
            .into_iter()
            .map(|r| Notification {
                title: if r.is_expired() {
                    format!("{} expired", r.document.label())
                } else {
                    format!("{} expiring", r.document.label())
                },
                id: r.id,
                source: self.name().to_string(),
                message: r.message,
                priority: r.priority,
                read: false,
            })
            .collect())
    }
}

/// Vehicles idle for at least `threshold_hours`
pub struct IdleVehicleProvider {
    repo: Arc<dyn VehicleRepository>,
    now: DateTime<Utc>,
    threshold_hours: f64,
}

impl IdleVehicleProvider {
    pub fn new(repo: Arc<dyn VehicleRepository>, now: DateTime<Utc>, threshold_hours: f64) -> Self {
        Self {
            repo,
            now,
            threshold_hours,
        }
    }

    /// Three times the threshold escalates to high
    fn priority_for(&self, hours: f64) -> Priority {
        if self.threshold_hours > 0.0 && hours >= self.threshold_hours * 3.0 {
            Priority::High
        } else {
            Priority::Medium
        }
    }
}

#[async_trait]
impl NotificationProvider for IdleVehicleProvider {
    fn name(&self) -> &'static str {
        "idle"
    }

    async fn fetch_notifications(&self) -> Result<Vec<Notification>> {
        let idle = idle_vehicles(self.repo.as_ref(), self.now).await?;
        Ok(idle
            .into_iter()
            .filter(|v| v.idle.hours >= self.threshold_hours)
            .map(|v| Notification {
                id: format!("idle:{}:{}", v.key, v.idle.since.timestamp()),
                source: self.name().to_string(),
                title: "Vehicle idle".to_string(),
                message: format!(
                    "{} idle for {} (since {})",
                    v.vehicle_number,
                    v.idle.display(),
                    v.idle.source.label()
                ),
                priority: self.priority_for(v.idle.hours),
                read: false,
            })
            .collect())
    }
}

/// Aggregates every registered provider
#[derive(Default)]
pub struct NotificationCenter {
    providers: Vec<Box<dyn NotificationProvider>>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, provider: Box<dyn NotificationProvider>) {
        self.providers.push(provider);
    }

    pub fn with_provider(mut self, provider: Box<dyn NotificationProvider>) -> Self {
        self.register(provider);
        self
    }

    /// Every provider's notifications plus how many providers failed
    async fn collect(&self) -> (Vec<Notification>, usize) {
        let mut all = Vec::new();
        let mut failed = 0;
        for provider in &self.providers {
            match provider.fetch_notifications().await {
                Ok(notifications) => all.extend(notifications),
                Err(e) => {
                    warn!(provider = provider.name(), "Notification provider failed: {}", e);
                    failed += 1;
                }
            }
        }
        (all, failed)
    }

    /// All notifications, most urgent first, with their read flag set.
    /// Equal priorities keep provider registration order.
    ///
    /// A failing provider is logged and contributes nothing.
    pub async fn fetch_all(&self, read_state: &ReadStateStore) -> Vec<Notification> {
        let (mut all, _) = self.collect().await;
        for n in &mut all {
            n.read = read_state.is_read(&n.id);
        }
        all.sort_by_key(|n| n.priority);
        all
    }

    /// Mark every current notification read and return them, most urgent first.
    ///
    /// Markers of notifications that no longer exist are dropped, but only
    /// when every provider answered.
    pub async fn mark_all_read(
        &self,
        read_state: &mut ReadStateStore,
    ) -> Result<Vec<Notification>> {
        let (mut all, failed) = self.collect().await;
        let marked = read_state.mark_read(all.iter().map(|n| n.id.as_str()))?;
        if failed == 0 {
            let active: HashSet<String> = all.iter().map(|n| n.id.clone()).collect();
            read_state.retain_only(&active)?;
        } else {
            debug!(failed, "Keeping stale read markers after provider failure");
        }
        debug!(marked, "Notifications marked read");
        for n in &mut all {
            n.read = true;
        }
        all.sort_by_key(|n| n.priority);
        Ok(all)
    }

    /// True when any provider reports something unread
    pub async fn has_unread(&self, read_state: &ReadStateStore) -> bool {
        for provider in &self.providers {
            match provider.has_unread_notifications(read_state).await {
                Ok(true) => return true,
                Ok(false) => {}
                Err(e) => warn!(provider = provider.name(), "Notification provider failed: {}", e),
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::reminder_service::tests::{today, vehicle_with_dates, FakeVehicles};
    use chrono::{Duration, TimeZone};
    use fleetdesk_domain::model::VehicleStatus;
    use fleetdesk_types::ApiError;
    use tempfile::tempdir;

    struct FailingProvider;

    #[async_trait]
    impl NotificationProvider for FailingProvider {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn fetch_notifications(&self) -> Result<Vec<Notification>> {
            Err(ApiError::Transport("connection refused".to_string()).into())
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap()
    }

    fn repo() -> Arc<dyn VehicleRepository> {
        let mut idle = vehicle_with_dates("v3", 60, 60);
        idle.current_status = Some(VehicleStatus::Idle);
        idle.updated_at = Some((now() - Duration::hours(80)).to_rfc3339());
        Arc::new(FakeVehicles {
            vehicles: vec![vehicle_with_dates("v1", 2, 40), idle],
            fail: false,
        })
    }

    fn center() -> NotificationCenter {
        NotificationCenter::new()
            .with_provider(Box::new(FailingProvider))
            .with_provider(Box::new(ComplianceReminderProvider::new(repo(), today())))
            .with_provider(Box::new(IdleVehicleProvider::new(repo(), now(), 24.0)))
    }

    #[tokio::test]
    async fn test_aggregates_and_skips_failing_provider() {
        let dir = tempdir().unwrap();
        let read_state = ReadStateStore::open(dir.path().to_path_buf()).unwrap();

        let notifications = center().fetch_all(&read_state).await;
        assert_eq!(notifications.len(), 2);
        assert_eq!(notifications[0].source, "compliance");
        assert_eq!(notifications[0].priority, Priority::High);
        assert_eq!(notifications[0].title, "Insurance expiring");
        assert_eq!(notifications[1].source, "idle");
        assert_eq!(notifications[1].priority, Priority::High);
        assert!(notifications[1].message.starts_with("V3 idle for 80.0h"));
        assert!(notifications.iter().all(|n| !n.read));
    }

    #[tokio::test]
    async fn test_read_markers_clear_unread() {
        let dir = tempdir().unwrap();
        let mut read_state = ReadStateStore::open(dir.path().to_path_buf()).unwrap();
        let center = center();
        assert!(center.has_unread(&read_state).await);

        let ids: Vec<String> = center
            .fetch_all(&read_state)
            .await
            .into_iter()
            .map(|n| n.id)
            .collect();
        read_state.mark_read(ids.iter().map(String::as_str)).unwrap();

        assert!(!center.has_unread(&read_state).await);
        assert!(center.fetch_all(&read_state).await.iter().all(|n| n.read));
    }

    #[tokio::test]
    async fn test_idle_threshold_filters() {
        let provider = IdleVehicleProvider::new(repo(), now(), 100.0);
        assert!(provider.fetch_notifications().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_compliance_provider_reports_fetch_failure() {
        let repo: Arc<dyn VehicleRepository> = Arc::new(FakeVehicles {
            vehicles: vec![vehicle_with_dates("v1", 2, 40)],
            fail: true,
        });
        let provider = ComplianceReminderProvider::new(repo, today());
        assert!(provider.fetch_notifications().await.is_err());
    }

    #[tokio::test]
    async fn test_mark_all_read_keeps_markers_when_a_provider_fails() {
        let dir = tempdir().unwrap();
        let mut read_state = ReadStateStore::open(dir.path().to_path_buf()).unwrap();
        read_state
            .mark_read(["reminder:v9:insurance:2024-06-12"])
            .unwrap();

        let offline: Arc<dyn VehicleRepository> = Arc::new(FakeVehicles {
            vehicles: Vec::new(),
            fail: true,
        });
        let outage = NotificationCenter::new()
            .with_provider(Box::new(ComplianceReminderProvider::new(offline, today())));
        assert!(outage.mark_all_read(&mut read_state).await.unwrap().is_empty());

        let reopened = ReadStateStore::open(dir.path().to_path_buf()).unwrap();
        assert!(reopened.is_read("reminder:v9:insurance:2024-06-12"));
    }

    #[tokio::test]
    async fn test_mark_all_read_prunes_stale_markers() {
        let dir = tempdir().unwrap();
        let mut read_state = ReadStateStore::open(dir.path().to_path_buf()).unwrap();
        read_state.mark_read(["reminder:gone:permit:2024-01-01"]).unwrap();

        let healthy = NotificationCenter::new()
            .with_provider(Box::new(ComplianceReminderProvider::new(repo(), today())))
            .with_provider(Box::new(IdleVehicleProvider::new(repo(), now(), 24.0)));
        let marked = healthy.mark_all_read(&mut read_state).await.unwrap();
        assert_eq!(marked.len(), 2);
        assert!(marked.iter().all(|n| n.read));

        assert!(!read_state.is_read("reminder:gone:permit:2024-01-01"));
        assert_eq!(read_state.count(), 2);
        assert!(!healthy.has_unread(&read_state).await);
    }
}
