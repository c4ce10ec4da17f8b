use std::sync::Arc;

use crate::api::models::DashboardStats;
use crate::cache::QueryCache;
use crate::error::FetchResult;
use crate::query::QueryDescriptor;

/// Read-only consumer of the aggregate device stats. Shares the cache with
/// the Explorer, so a bulk action's invalidation reaches it without any
/// coupling between the two.
#[derive(Clone)]
pub struct DashboardClient {
    cache: Arc<QueryCache>,
}

impl DashboardClient {
    pub fn new(cache: Arc<QueryCache>) -> Self {
        DashboardClient { cache }
    }

    pub async fn stats(&self) -> FetchResult<DashboardStats> {
        self.cache.fetch(&QueryDescriptor::new("dashboard/stats")).await
    }
}
