use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use futures::future::{BoxFuture, FutureExt, Shared};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::time::{Duration, Instant};

use crate::error::{FetchError, FetchResult};
use crate::query::QueryDescriptor;
use crate::transport::Transport;

type SharedFetch = Shared<BoxFuture<'static, FetchResult<Value>>>;

struct Entry {
    value: Value,
    fetched_at: Instant,
    stale: bool,
}

/// Process-wide result cache keyed by descriptor identity.
///
/// Semantics:
/// - at most one request in flight per distinct descriptor; concurrent
///   identical fetches share the same future and the same result;
/// - results are served from cache until invalidated or older than the
///   staleness window;
/// - invalidation marks entries stale without dropping the value, so a
///   rendered view keeps its data until the re-fetch resolves;
/// - failed fetches are never cached;
/// - transient network failures get one silent retry, nothing else does.
///
/// Reads insert entries; only mutation paths call `invalidate`.
pub struct QueryCache {
    transport: Arc<dyn Transport>,
    ttl: Duration,
    entries: Mutex<HashMap<QueryDescriptor, Entry>>,
    in_flight: Mutex<HashMap<QueryDescriptor, SharedFetch>>,
}

impl QueryCache {
    pub fn new(transport: Arc<dyn Transport>, ttl: Duration) -> Self {
        QueryCache {
            transport,
            ttl,
            entries: Mutex::new(HashMap::new()),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Typed read. Deserialization failure of a cached value surfaces as a
    /// malformed response for this call only.
    pub async fn fetch<T: DeserializeOwned>(&self, descriptor: &QueryDescriptor) -> FetchResult<T> {
        let value = self.fetch_value(descriptor).await?;
        serde_json::from_value(value).map_err(|e| FetchError::Malformed(e.to_string()))
    }

    pub async fn fetch_value(&self, descriptor: &QueryDescriptor) -> FetchResult<Value> {
        {
            let entries = self.entries.lock().expect("cache lock");
            if let Some(entry) = entries.get(descriptor) {
                if !entry.stale && entry.fetched_at.elapsed() < self.ttl {
                    return Ok(entry.value.clone());
                }
            }
        }

        let fut = {
            let mut in_flight = self.in_flight.lock().expect("cache lock");
            match in_flight.get(descriptor) {
                Some(existing) => existing.clone(),
                None => {
                    let transport = Arc::clone(&self.transport);
                    let d = descriptor.clone();
                    let fut = fetch_with_retry(transport, d).boxed().shared();
                    in_flight.insert(descriptor.clone(), fut.clone());
                    fut
                }
            }
        };

        let result = fut.clone().await;

        // Every waiter runs the bookkeeping; it is idempotent, and guarding
        // on pointer identity keeps a late waiter from evicting a newer
        // in-flight request for the same descriptor.
        {
            let mut in_flight = self.in_flight.lock().expect("cache lock");
            if in_flight.get(descriptor).is_some_and(|f| f.ptr_eq(&fut)) {
                in_flight.remove(descriptor);
            }
        }
        if let Ok(value) = &result {
            let mut entries = self.entries.lock().expect("cache lock");
            entries.insert(
                descriptor.clone(),
                Entry { value: value.clone(), fetched_at: Instant::now(), stale: false },
            );
        }

        result
    }

    /// Last cached value for a descriptor, stale or not. What a rendered
    /// view keeps showing while a re-fetch is on its way.
    pub fn cached(&self, descriptor: &QueryDescriptor) -> Option<Value> {
        let entries = self.entries.lock().expect("cache lock");
        entries.get(descriptor).map(|e| e.value.clone())
    }

    /// Marks every entry matching the predicate stale. Returns how many
    /// entries were newly invalidated.
    pub fn invalidate<P>(&self, predicate: P) -> usize
    where
        P: Fn(&QueryDescriptor) -> bool,
    {
        let mut entries = self.entries.lock().expect("cache lock");
        let mut marked = 0;
        for (descriptor, entry) in entries.iter_mut() {
            if !entry.stale && predicate(descriptor) {
                entry.stale = true;
                marked += 1;
            }
        }
        if marked > 0 {
            tracing::debug!("invalidated {} cache entries", marked);
        }
        marked
    }

    #[cfg(test)]
    fn is_stale(&self, descriptor: &QueryDescriptor) -> Option<bool> {
        self.entries.lock().unwrap().get(descriptor).map(|e| e.stale)
    }
}

/// One transport round trip with the single-retry policy for transient
/// network failures. HTTP-level answers (4xx/5xx/401) are never retried.
async fn fetch_with_retry(
    transport: Arc<dyn Transport>,
    descriptor: QueryDescriptor,
) -> FetchResult<Value> {
    match transport.get_json(descriptor.path(), descriptor.params()).await {
        Err(err) if err.is_transient() => {
            tracing::warn!("fetch {} failed ({}), retrying once", descriptor.cache_key(), err);
            transport.get_json(descriptor.path(), descriptor.params()).await
        }
        other => other,
    }
}
