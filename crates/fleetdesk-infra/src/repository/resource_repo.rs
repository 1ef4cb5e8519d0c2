//! Generic CRUD over any collection

use async_trait::async_trait;
use serde_json::Value;

use crate::strapi::{StrapiClient, StrapiQuery};
use fleetdesk_domain::model::{ListQuery, RecordPage, Resource};
use fleetdesk_domain::repository::ResourceRepository;
use fleetdesk_types::Error;

pub struct StrapiResourceRepository {
    client: StrapiClient,
}

impl StrapiResourceRepository {
    pub fn new(client: StrapiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ResourceRepository for StrapiResourceRepository {
    async fn list(&self, resource: Resource, query: &ListQuery) -> Result<RecordPage, Error> {
        let strapi_query = StrapiQuery::from_list_query(resource, query);
        let (records, pagination) = self
            .client
            .list::<Value>(resource.collection_path(), &strapi_query)
            .await?;
        Ok(RecordPage {
            records,
            pagination,
        })
    }

    async fn find(&self, resource: Resource, document_id: &str) -> Result<Option<Value>, Error> {
        let query = StrapiQuery::new().populate_all();
        Ok(self
            .client
            .find_one(resource.collection_path(), document_id, &query)
            .await?)
    }

    async fn create(&self, resource: Resource, body: Value) -> Result<Value, Error> {
        Ok(self.client.create(resource.collection_path(), body).await?)
    }

    async fn update(
        &self,
        resource: Resource,
        document_id: &str,
        body: Value,
    ) -> Result<Value, Error> {
        Ok(self
            .client
            .update(resource.collection_path(), document_id, body)
            .await?)
    }

    async fn delete(&self, resource: Resource, document_id: &str) -> Result<(), Error> {
        Ok(self
            .client
            .delete(resource.collection_path(), document_id)
            .await?)
    }
}
