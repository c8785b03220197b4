//! HTTP implementation of [`Resource`] on top of `reqwest`
//!
//! Conventions of the remote service:
//!
//! - `GET`/`POST` on `{base}/{collection}/`
//! - `GET`/`PUT`/`DELETE` on `{base}/{collection}/{id}/`
//! - non-2xx bodies map field names (or `non_field_errors`) to message arrays

use super::{Body, Resource, ResourceProvider};
use crate::config::ClientConfig;
use crate::error::{first_validation_error, Error, Result, NON_FIELD_ERRORS};
use crate::model::{type_name, Record, RecordId};
use crate::schema::{Entity, EntityDescriptor};
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, Method, Response, StatusCode, Url};
use serde_json::Value;
use std::sync::Arc;

/// Shared HTTP client bound to one service base URL.
///
/// Cheap to clone; all resources created from it share the connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base: Url,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let base = parse_base(&config.base_url)?;
        let http = Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { http, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub fn resource_for(&self, entity: Entity) -> HttpResource {
        HttpResource {
            http: self.http.clone(),
            base: self.base.clone(),
            descriptor: entity.descriptor(),
        }
    }
}

impl ResourceProvider for ApiClient {
    fn resource(&self, entity: Entity) -> Arc<dyn Resource> {
        Arc::new(self.resource_for(entity))
    }
}

/// Base URLs are treated as directories so collection paths append to them.
fn parse_base(raw: &str) -> Result<Url> {
    let mut raw = raw.trim().to_string();
    if !raw.ends_with('/') {
        raw.push('/');
    }
    Url::parse(&raw).map_err(|e| Error::Config(format!("invalid base URL {:?}: {}", raw, e)))
}

/// One entity's collection endpoint.
#[derive(Debug, Clone)]
pub struct HttpResource {
    http: Client,
    base: Url,
    descriptor: &'static EntityDescriptor,
}

impl HttpResource {
    pub fn collection_url(&self) -> Result<Url> {
        self.join(&format!("{}/", self.descriptor.collection_path))
    }

    pub fn item_url(&self, id: RecordId) -> Result<Url> {
        self.join(&format!("{}/{}/", self.descriptor.collection_path, id))
    }

    fn join(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .map_err(|e| Error::Network(format!("invalid resource path {:?}: {}", path, e)))
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<&Body>,
        id: Option<RecordId>,
    ) -> Result<Value> {
        debug!("{} {}", method, url);
        let mut request = self.http.request(method.clone(), url.clone());
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await.map_err(|e| {
            warn!("{} {} failed: {}", method, url, e);
            Error::from(e)
        })?;
        self.read_json(response, id).await
    }

    async fn read_json(&self, response: Response, id: Option<RecordId>) -> Result<Value> {
        let status = response.status();
        let text = response.text().await?;
        debug!("{} answered {} ({} bytes)", self.descriptor.name, status, text.len());

        if status.is_success() {
            if text.trim().is_empty() {
                return Ok(Value::Null);
            }
            return serde_json::from_str(&text)
                .map_err(|e| Error::Decode(format!("{}: {}", self.descriptor.name, e)));
        }
        Err(self.rejection(status, &text, id))
    }

    fn rejection(&self, status: StatusCode, text: &str, id: Option<RecordId>) -> Error {
        if status == StatusCode::NOT_FOUND {
            return Error::NotFound { entity: self.descriptor.entity, id };
        }
        if status.is_client_error() {
            let payload = serde_json::from_str::<Value>(text).ok();
            if let Some((field, message)) = payload.as_ref().and_then(first_validation_error) {
                return Error::Validation { field, message };
            }
            return Error::validation(
                NON_FIELD_ERRORS,
                format!("request rejected with status {}", status),
            );
        }
        Error::Network(format!("server responded with status {}", status))
    }

    fn decode_record(&self, value: Value) -> Result<Record> {
        Record::from_value(value).map_err(|e| Error::Decode(format!("{}: {}", self.descriptor.name, e)))
    }
}

#[async_trait]
impl Resource for HttpResource {
    fn descriptor(&self) -> &'static EntityDescriptor {
        self.descriptor
    }

    async fn list(&self) -> Result<Vec<Record>> {
        let value = self.send(Method::GET, self.collection_url()?, None, None).await?;
        let Value::Array(items) = value else {
            return Err(Error::Decode(format!(
                "{}: expected a JSON array, got {}",
                self.descriptor.name,
                type_name(&value)
            )));
        };
        items.into_iter().map(|item| self.decode_record(item)).collect()
    }

    async fn get(&self, id: RecordId) -> Result<Record> {
        let value = self.send(Method::GET, self.item_url(id)?, None, Some(id)).await?;
        self.decode_record(value)
    }

    async fn create(&self, body: &Body) -> Result<Record> {
        let value = self.send(Method::POST, self.collection_url()?, Some(body), None).await?;
        self.decode_record(value)
    }

    async fn update(&self, id: RecordId, body: &Body) -> Result<Record> {
        let value = self.send(Method::PUT, self.item_url(id)?, Some(body), Some(id)).await?;
        self.decode_record(value)
    }

    async fn remove(&self, id: RecordId) -> Result<()> {
        self.send(Method::DELETE, self.item_url(id)?, None, Some(id)).await?;
        Ok(())
    }
}
