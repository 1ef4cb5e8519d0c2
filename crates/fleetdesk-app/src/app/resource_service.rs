//! Generic record management for every collection

use std::path::Path;

use serde_json::Value;
use tracing::info;

use fleetdesk_domain::model::{ListQuery, RecordPage, Resource};
use fleetdesk_domain::repository::ResourceRepository;
use fleetdesk_types::{Error, Result};

/// Keys the backend manages itself and rejects in write bodies
const READ_ONLY_KEYS: [&str; 6] = [
    "id",
    "documentId",
    "createdAt",
    "updatedAt",
    "publishedAt",
    "locale",
];

/// Parse a record body given inline or as `@path/to/file.json`
pub fn parse_record_body(input: &str) -> Result<Value> {
    let raw = match input.trim().strip_prefix('@') {
        Some(path) => std::fs::read_to_string(Path::new(path))?,
        None => input.to_string(),
    };
    let value: Value = serde_json::from_str(&raw)?;
    let value = match value {
        Value::Object(mut map) if map.len() == 1 && map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    };
    if !value.is_object() {
        return Err(Error::InvalidInput(
            "record body must be a JSON object".to_string(),
        ));
    }
    Ok(value)
}

/// Drop backend-managed keys from a write body
pub fn strip_read_only(mut body: Value) -> Value {
    if let Value::Object(map) = &mut body {
        for key in READ_ONLY_KEYS {
            map.remove(key);
        }
    }
    body
}

pub async fn list_records(
    repo: &dyn ResourceRepository,
    resource: Resource,
    query: &ListQuery,
) -> Result<RecordPage> {
    repo.list(resource, query).await
}

pub async fn show_record(
    repo: &dyn ResourceRepository,
    resource: Resource,
    document_id: &str,
) -> Result<Value> {
    repo.find(resource, document_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("{} {}", resource.label(), document_id)))
}

/// Strip backend-managed keys and reject bodies that do not fit the record type
fn checked_body(resource: Resource, body: Value) -> Result<Value> {
    let body = strip_read_only(body);
    resource
        .check_body(&body)
        .map_err(|e| Error::InvalidInput(format!("{} body: {}", resource.label(), e)))?;
    Ok(body)
}

pub async fn create_record(
    repo: &dyn ResourceRepository,
    resource: Resource,
    body: Value,
) -> Result<Value> {
    let created = repo.create(resource, checked_body(resource, body)?).await?;
    info!(resource = %resource, "Record created");
    Ok(created)
}

pub async fn update_record(
    repo: &dyn ResourceRepository,
    resource: Resource,
    document_id: &str,
    body: Value,
) -> Result<Value> {
    let updated = repo
        .update(resource, document_id, checked_body(resource, body)?)
        .await?;
    info!(resource = %resource, document_id, "Record updated");
    Ok(updated)
}

pub async fn delete_record(
    repo: &dyn ResourceRepository,
    resource: Resource,
    document_id: &str,
) -> Result<()> {
    repo.delete(resource, document_id).await?;
    info!(resource = %resource, document_id, "Record deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// Records the last write and serves one fixed record
    #[derive(Default)]
    struct FakeResources {
        last_write: Mutex<Option<Value>>,
    }

    #[async_trait]
    impl ResourceRepository for FakeResources {
        async fn list(&self, _resource: Resource, _query: &ListQuery) -> Result<RecordPage> {
            Ok(RecordPage {
                records: vec![json!({"name": "Pune"})],
                pagination: None,
            })
        }

        async fn find(&self, _resource: Resource, document_id: &str) -> Result<Option<Value>> {
            Ok((document_id == "c1").then(|| json!({"documentId": "c1", "name": "Pune"})))
        }

        async fn create(&self, _resource: Resource, body: Value) -> Result<Value> {
            *self.last_write.lock().unwrap() = Some(body.clone());
            Ok(body)
        }

        async fn update(&self, _resource: Resource, _id: &str, body: Value) -> Result<Value> {
            *self.last_write.lock().unwrap() = Some(body.clone());
            Ok(body)
        }

        async fn delete(&self, _resource: Resource, _id: &str) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_parse_inline_and_wrapped_bodies() {
        assert_eq!(parse_record_body(r#"{"name": "Pune"}"#).unwrap(), json!({"name": "Pune"}));
        assert_eq!(
            parse_record_body(r#"{"data": {"name": "Pune"}}"#).unwrap(),
            json!({"name": "Pune"})
        );
        assert!(matches!(parse_record_body("[1, 2]"), Err(Error::InvalidInput(_))));
        assert!(matches!(parse_record_body("{oops"), Err(Error::Json(_))));
    }

    #[test]
    fn test_parse_body_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("city.json");
        std::fs::write(&path, r#"{"name": "Nagpur", "code": "NGP"}"#).unwrap();
        let body = parse_record_body(&format!("@{}", path.display())).unwrap();
        assert_eq!(body["code"], "NGP");
    }

    #[tokio::test]
    async fn test_update_strips_read_only_keys() {
        let repo = FakeResources::default();
        let body = json!({"documentId": "c1", "id": 4, "updatedAt": "x", "name": "Pune"});
        update_record(&repo, Resource::Cities, "c1", body).await.unwrap();
        assert_eq!(
            repo.last_write.lock().unwrap().clone().unwrap(),
            json!({"name": "Pune"})
        );
    }

    #[tokio::test]
    async fn test_show_missing_record() {
        let repo = FakeResources::default();
        assert!(show_record(&repo, Resource::Cities, "c1").await.is_ok());
        let err = show_record(&repo, Resource::Cities, "zz").await.unwrap_err();
        assert_eq!(err.to_string(), "Not found: City zz");
    }

    #[tokio::test]
    async fn test_list_and_create_pass_through() {
        let repo = FakeResources::default();
        let page = list_records(&repo, Resource::Cities, &ListQuery::default())
            .await
            .unwrap();
        assert_eq!(page.records.len(), 1);
        let created = create_record(&repo, Resource::Cities, json!({"name": "Goa", "id": 9}))
            .await
            .unwrap();
        assert_eq!(created, json!({"name": "Goa"}));
        assert!(delete_record(&repo, Resource::Cities, "c1").await.is_ok());
    }

    #[tokio::test]
    async fn test_mistyped_body_is_rejected_before_sending() {
        let repo = FakeResources::default();
        let err = create_record(&repo, Resource::Vehicles, json!({"vehicleNumber": 42}))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(ref msg) if msg.starts_with("Vehicle body:")));
        assert!(repo.last_write.lock().unwrap().is_none());

        update_record(&repo, Resource::Vehicles, "v1", json!({"capacity": "12.5"}))
            .await
            .unwrap();
        assert_eq!(
            repo.last_write.lock().unwrap().clone().unwrap(),
            json!({"capacity": "12.5"})
        );
    }
}
