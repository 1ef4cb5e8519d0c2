//! HTTP client for a Strapi backend

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};
use url::Url;

use super::envelope::{decode_list, decode_one};
use super::error::extract_error_message;
use super::query::StrapiQuery;
use fleetdesk_domain::model::Pagination;
use fleetdesk_store::SessionUser;
use fleetdesk_types::ApiError;

/// Response of `POST /api/auth/local`
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub jwt: String,
    pub user: SessionUser,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    identifier: &'a str,
    password: &'a str,
}

/// Strapi REST client. No retries: every failure reaches the caller once.
#[derive(Debug, Clone)]
pub struct StrapiClient {
    http: Client,
    base_url: Url,
    token: Option<String>,
}

impl StrapiClient {
    /// Create a client for `base_url` (the server root, without `/api`)
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let mut base_url =
            Url::parse(base_url.trim()).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("fleetdesk/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            token: None,
        })
    }

    /// Replay a bearer token on every request
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// `<base>/api/<path>`
    pub fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(&format!("api/{}", path.trim_start_matches('/')))
            .map_err(|e| ApiError::InvalidUrl(e.to_string()))
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Value, ApiError> {
        let res = builder.send().await.map_err(map_reqwest_error)?;
        let status = res.status();
        let url = res.url().clone();
        let text = res.text().await.map_err(map_reqwest_error)?;
        let body: Option<Value> = if text.trim().is_empty() {
            None
        } else {
            serde_json::from_str(&text).ok()
        };

        if status.is_success() {
            debug!(%url, status = status.as_u16(), "Request succeeded");
            return match body {
                Some(value) => Ok(value),
                None if text.trim().is_empty() || status == StatusCode::NO_CONTENT => Ok(Value::Null),
                None => Err(ApiError::Decode(format!(
                    "response from {} is not JSON",
                    url.path()
                ))),
            };
        }

        let message = extract_error_message(status.as_u16(), body.as_ref());
        warn!(%url, status = status.as_u16(), "Request failed: {}", message);
        Err(ApiError::Http {
            status: status.as_u16(),
            message,
        })
    }

    /// GET a path with query parameters and return the raw body
    pub async fn get_json(&self, path: &str, query: &StrapiQuery) -> Result<Value, ApiError> {
        let url = self.endpoint(path)?;
        debug!(%url, query = %query, "GET");
        self.send(self.request(Method::GET, url).query(query.pairs()))
            .await
    }

    /// One page of a collection
    pub async fn list<T: DeserializeOwned>(
        &self,
        collection: &str,
        query: &StrapiQuery,
    ) -> Result<(Vec<T>, Option<Pagination>), ApiError> {
        let body = self.get_json(collection, query).await?;
        decode_list(body)
    }

    /// Every page of a collection, `page_size` records at a time
    pub async fn list_all<T: DeserializeOwned>(
        &self,
        collection: &str,
        query: &StrapiQuery,
        page_size: u32,
    ) -> Result<Vec<T>, ApiError> {
        let mut page = 1;
        let mut records = Vec::new();
        loop {
            let paged = query.clone().page(page, page_size);
            let (items, pagination) = self.list::<T>(collection, &paged).await?;
            let fetched = items.len();
            records.extend(items);
            match pagination {
                Some(p) if Pagination { page, ..p }.has_next() && fetched > 0 => page += 1,
                _ => break,
            }
        }
        debug!(collection, count = records.len(), pages = page, "Fetched collection");
        Ok(records)
    }

    /// One record by document id; 404 yields `None`
    pub async fn find_one<T: DeserializeOwned>(
        &self,
        collection: &str,
        document_id: &str,
        query: &StrapiQuery,
    ) -> Result<Option<T>, ApiError> {
        match self
            .get_json(&format!("{}/{}", collection, document_id), query)
            .await
        {
            Ok(body) => decode_one(body),
            Err(ApiError::Http { status: 404, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Create a record; `body` is wrapped as `{ "data": body }`
    pub async fn create(&self, collection: &str, body: Value) -> Result<Value, ApiError> {
        let url = self.endpoint(collection)?;
        debug!(%url, "POST");
        let res = self
            .send(self.request(Method::POST, url).json(&wrap_data(body)))
            .await?;
        Ok(decode_one(res)?.unwrap_or(Value::Null))
    }

    /// Update a record by document id
    pub async fn update(
        &self,
        collection: &str,
        document_id: &str,
        body: Value,
    ) -> Result<Value, ApiError> {
        let url = self.endpoint(&format!("{}/{}", collection, document_id))?;
        debug!(%url, "PUT");
        let res = self
            .send(self.request(Method::PUT, url).json(&wrap_data(body)))
            .await?;
        Ok(decode_one(res)?.unwrap_or(Value::Null))
    }

    /// Delete a record by document id
    pub async fn delete(&self, collection: &str, document_id: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("{}/{}", collection, document_id))?;
        debug!(%url, "DELETE");
        self.send(self.request(Method::DELETE, url)).await?;
        Ok(())
    }

    /// Exchange credentials for a JWT
    pub async fn login(&self, identifier: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let url = self.endpoint("auth/local")?;
        debug!(%url, identifier, "Logging in");
        let body = self
            .send(
                self.http
                    .post(url)
                    .json(&LoginRequest { identifier, password }),
            )
            .await?;
        serde_json::from_value(body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// The user the current token belongs to
    pub async fn current_user(&self) -> Result<SessionUser, ApiError> {
        let body = self.get_json("users/me", &StrapiQuery::new()).await?;
        serde_json::from_value(body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// Wrap a payload as `{ "data": ... }` unless it already is
fn wrap_data(body: Value) -> Value {
    match &body {
        Value::Object(map) if map.len() == 1 && map.contains_key("data") => body,
        _ => json!({ "data": body }),
    }
}

fn map_reqwest_error(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::Timeout
    } else {
        ApiError::Transport(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client = StrapiClient::new("https://fleet.example.com/backend", Duration::from_secs(5)).unwrap();
        assert_eq!(
            client.endpoint("vehicles").unwrap().as_str(),
            "https://fleet.example.com/backend/api/vehicles"
        );
        assert_eq!(
            client.endpoint("/trips/abc123").unwrap().as_str(),
            "https://fleet.example.com/backend/api/trips/abc123"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let err = StrapiClient::new("not a url", Duration::from_secs(5)).unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl(_)));
    }

    #[test]
    fn test_with_token() {
        let client = StrapiClient::new("http://localhost:1337", Duration::from_secs(5)).unwrap();
        assert!(!client.has_token());
        assert!(client.with_token("abc").has_token());
    }

    #[test]
    fn test_wrap_data() {
        assert_eq!(wrap_data(json!({"name": "Pune"})), json!({"data": {"name": "Pune"}}));
        assert_eq!(
            wrap_data(json!({"data": {"name": "Pune"}})),
            json!({"data": {"name": "Pune"}})
        );
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        let client = StrapiClient::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let err = client
            .list::<Value>("vehicles", &StrapiQuery::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Transport(_) | ApiError::Timeout));
    }
}
