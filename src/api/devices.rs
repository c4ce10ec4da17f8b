use std::sync::Arc;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::api::models::{
    ActivityPage, BulkOutcome, DeviceDetail, DeviceListPage, DeviceStatus, Message,
};
use crate::bulk::{invalidate_scopes, invalidation_scopes, MutationKind};
use crate::cache::QueryCache;
use crate::error::{FetchError, FetchResult};
use crate::query::{FilterState, QueryDescriptor, DEFAULT_PAGE_SIZE};
use crate::transport::Transport;

/// Typed device endpoints. Reads go through the shared cache; mutations go
/// straight to the transport and invalidate per the rule table.
#[derive(Clone)]
pub struct DeviceClient {
    transport: Arc<dyn Transport>,
    cache: Arc<QueryCache>,
}

impl DeviceClient {
    pub fn new(transport: Arc<dyn Transport>, cache: Arc<QueryCache>) -> Self {
        DeviceClient { transport, cache }
    }

    // ─── Reads ──────────────────────────────────────────────────────────

    pub async fn list(&self, filter: &FilterState) -> FetchResult<DeviceListPage> {
        self.cache.fetch(&filter.descriptor()).await
    }

    pub async fn detail(&self, id: Uuid) -> FetchResult<DeviceDetail> {
        self.cache.fetch(&QueryDescriptor::new(format!("devices/{id}"))).await
    }

    pub async fn activity(&self, id: Uuid, page: u32, limit: u32) -> FetchResult<ActivityPage> {
        let descriptor = QueryDescriptor::new(format!("devices/{id}/activity"))
            .maybe_param("limit", (limit != DEFAULT_PAGE_SIZE).then(|| limit.to_string()))
            .maybe_param("page", (page > 1).then(|| page.to_string()));
        self.cache.fetch(&descriptor).await
    }

    // ─── Single-device mutations ────────────────────────────────────────

    pub async fn update_status(&self, id: Uuid, status: DeviceStatus) -> FetchResult<Message> {
        let value = self
            .transport
            .send_json(
                Method::PATCH,
                &format!("devices/{id}/status"),
                json!({ "status": status }),
            )
            .await?;
        invalidate_scopes(&self.cache, invalidation_scopes(MutationKind::StatusChange));
        decode(value)
    }

    pub async fn update_department(
        &self,
        id: Uuid,
        department_id: Option<Uuid>,
    ) -> FetchResult<Message> {
        let value = self
            .transport
            .send_json(
                Method::PATCH,
                &format!("devices/{id}/department"),
                json!({ "department_id": department_id }),
            )
            .await?;
        invalidate_scopes(&self.cache, invalidation_scopes(MutationKind::DepartmentChange));
        decode(value)
    }

    pub async fn delete(&self, id: Uuid) -> FetchResult<Message> {
        let value = self
            .transport
            .send_json(Method::DELETE, &format!("devices/{id}"), Value::Null)
            .await?;
        invalidate_scopes(&self.cache, invalidation_scopes(MutationKind::Deletion));
        decode(value)
    }

    // ─── Bulk mutations ─────────────────────────────────────────────────
    //
    // Crate-private: callers go through the orchestrator, which owns the
    // invalidation and selection bookkeeping for these.

    pub(crate) async fn bulk_update_status(
        &self,
        ids: &[Uuid],
        status: DeviceStatus,
    ) -> FetchResult<BulkOutcome> {
        let value = self
            .transport
            .send_json(
                Method::PATCH,
                "devices/bulk/status",
                json!({ "device_ids": ids, "status": status }),
            )
            .await?;
        decode(value)
    }

    pub(crate) async fn bulk_update_department(
        &self,
        ids: &[Uuid],
        department_id: Option<Uuid>,
    ) -> FetchResult<BulkOutcome> {
        let value = self
            .transport
            .send_json(
                Method::PATCH,
                "devices/bulk/department",
                json!({ "device_ids": ids, "department_id": department_id }),
            )
            .await?;
        decode(value)
    }

    pub(crate) async fn bulk_delete(&self, ids: &[Uuid]) -> FetchResult<BulkOutcome> {
        let value = self
            .transport
            .send_json(Method::POST, "devices/bulk/delete", json!({ "device_ids": ids }))
            .await?;
        decode(value)
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> FetchResult<T> {
    serde_json::from_value(value).map_err(|e| FetchError::Malformed(e.to_string()))
}
