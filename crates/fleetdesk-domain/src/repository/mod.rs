//! Repository trait definitions for fleet data access

use async_trait::async_trait;
use serde_json::Value;

use crate::model::{ListQuery, RecordPage, Resource, Vehicle, VehicleStatus};
use fleetdesk_types::Error;

/// Typed access to vehicles with their trips inlined
#[async_trait]
pub trait VehicleRepository: Send + Sync {
    /// All vehicles, every page, trips populated
    async fn find_all_with_trips(&self) -> Result<Vec<Vehicle>, Error>;

    /// Vehicles in the given status, trips populated
    async fn find_by_status(&self, status: VehicleStatus) -> Result<Vec<Vehicle>, Error>;

    /// One vehicle by document id
    async fn find_by_document_id(&self, document_id: &str) -> Result<Option<Vehicle>, Error>;
}

/// Untyped CRUD over any collection in the catalogue
#[async_trait]
pub trait ResourceRepository: Send + Sync {
    async fn list(&self, resource: Resource, query: &ListQuery) -> Result<RecordPage, Error>;

    async fn find(&self, resource: Resource, document_id: &str) -> Result<Option<Value>, Error>;

    async fn create(&self, resource: Resource, body: Value) -> Result<Value, Error>;

    async fn update(&self, resource: Resource, document_id: &str, body: Value)
        -> Result<Value, Error>;

    async fn delete(&self, resource: Resource, document_id: &str) -> Result<(), Error>;
}
