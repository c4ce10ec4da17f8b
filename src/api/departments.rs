use std::sync::Arc;

use reqwest::Method;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::api::models::{Department, DepartmentList, Message};
use crate::bulk::{invalidate_scopes, CacheScope};
use crate::cache::QueryCache;
use crate::error::{FetchError, FetchResult};
use crate::query::QueryDescriptor;
use crate::transport::Transport;

/// Department directory: cached listing plus the admin calls. Renames and
/// deletions reach into the devices cache too, because device rows embed
/// the joined department name and deletion clears membership server-side.
#[derive(Clone)]
pub struct DepartmentClient {
    transport: Arc<dyn Transport>,
    cache: Arc<QueryCache>,
}

impl DepartmentClient {
    pub fn new(transport: Arc<dyn Transport>, cache: Arc<QueryCache>) -> Self {
        DepartmentClient { transport, cache }
    }

    pub async fn list(&self) -> FetchResult<DepartmentList> {
        self.cache.fetch(&QueryDescriptor::new("departments")).await
    }

    pub async fn create(&self, name: &str) -> FetchResult<Department> {
        let value = self
            .transport
            .send_json(Method::POST, "departments", json!({ "name": name }))
            .await?;
        invalidate_scopes(&self.cache, &[CacheScope::Departments]);
        decode(value)
    }

    pub async fn rename(&self, id: Uuid, name: &str) -> FetchResult<Department> {
        let value = self
            .transport
            .send_json(Method::PUT, &format!("departments/{id}"), json!({ "name": name }))
            .await?;
        invalidate_scopes(&self.cache, &[CacheScope::Departments, CacheScope::Devices]);
        decode(value)
    }

    /// Former members come back with `department_id` cleared, so the device
    /// caches are stale the moment this succeeds.
    pub async fn delete(&self, id: Uuid) -> FetchResult<Message> {
        let value = self
            .transport
            .send_json(Method::DELETE, &format!("departments/{id}"), Value::Null)
            .await?;
        invalidate_scopes(&self.cache, &[CacheScope::Departments, CacheScope::Devices]);
        decode(value)
    }
}

fn decode<T: serde::de::DeserializeOwned>(value: Value) -> FetchResult<T> {
    serde_json::from_value(value).map_err(|e| FetchError::Malformed(e.to_string()))
}
