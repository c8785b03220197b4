//! Resource client
//!
//! One [`Resource`] per entity performs list/get/create/update/delete against
//! that entity's collection endpoint. Nothing is cached and nothing is
//! retried: every call is a fresh round trip and every failure is returned to
//! the caller as a typed [`Error`](crate::Error).
//!
//! Controllers never build resources themselves; they ask a
//! [`ResourceProvider`] so the HTTP implementation can be swapped for an
//! in-memory one.

pub mod http;

pub use http::{ApiClient, HttpResource};

use crate::error::Result;
use crate::model::{Record, RecordId};
use crate::schema::{Entity, EntityDescriptor};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Request body: field key -> wire value
pub type Body = Map<String, Value>;

/// CRUD operations on one entity's collection.
#[async_trait]
pub trait Resource: Send + Sync {
    fn descriptor(&self) -> &'static EntityDescriptor;

    /// All records, in server order.
    async fn list(&self) -> Result<Vec<Record>>;

    async fn get(&self, id: RecordId) -> Result<Record>;

    /// Forward a new record; the server assigns the id.
    async fn create(&self, body: &Body) -> Result<Record>;

    async fn update(&self, id: RecordId, body: &Body) -> Result<Record>;

    async fn remove(&self, id: RecordId) -> Result<()>;
}

/// Hands out the resource for an entity.
pub trait ResourceProvider: Send + Sync {
    fn resource(&self, entity: Entity) -> Arc<dyn Resource>;
}
