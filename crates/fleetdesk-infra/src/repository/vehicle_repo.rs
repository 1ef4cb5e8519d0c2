//! Vehicles with their trips inlined

use async_trait::async_trait;

use crate::strapi::{StrapiClient, StrapiQuery};
use fleetdesk_domain::model::{Resource, Vehicle, VehicleStatus};
use fleetdesk_domain::repository::VehicleRepository;
use fleetdesk_types::Error;

/// Reads vehicles with `populate=*` so trips arrive as records, not ids
pub struct StrapiVehicleRepository {
    client: StrapiClient,
    page_size: u32,
}

impl StrapiVehicleRepository {
    pub fn new(client: StrapiClient, page_size: u32) -> Self {
        Self {
            client,
            page_size: page_size.max(1),
        }
    }

    fn base_query() -> StrapiQuery {
        StrapiQuery::new().populate_all()
    }
}

#[async_trait]
impl VehicleRepository for StrapiVehicleRepository {
    async fn find_all_with_trips(&self) -> Result<Vec<Vehicle>, Error> {
        let path = Resource::Vehicles.collection_path();
        Ok(self
            .client
            .list_all(path, &Self::base_query(), self.page_size)
            .await?)
    }

    async fn find_by_status(&self, status: VehicleStatus) -> Result<Vec<Vehicle>, Error> {
        let path = Resource::Vehicles.collection_path();
        let query = Self::base_query().eq("currentStatus", status.as_str());
        Ok(self.client.list_all(path, &query, self.page_size).await?)
    }

    async fn find_by_document_id(&self, document_id: &str) -> Result<Option<Vehicle>, Error> {
        let path = Resource::Vehicles.collection_path();
        Ok(self
            .client
            .find_one(path, document_id, &Self::base_query())
            .await?)
    }
}
