use async_trait::async_trait;
use reqwest::{Client, Method, Response, StatusCode};
use serde_json::Value;

use crate::error::{FetchError, FetchResult};
use crate::session::SessionHandle;

/// Raw answer for the export side channel, which never goes through the
/// JSON pipeline.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub content_disposition: Option<String>,
    pub body: Vec<u8>,
}

/// HTTP boundary of the console. Everything above this trait is transport
/// agnostic, which is also what the test fakes implement.
///
/// Contract carried by every implementation: a 401 flips the process-wide
/// session state to `Expired` and surfaces as `FetchError::Unauthorized`,
/// no matter which component issued the request.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get_json(&self, path: &str, query: &[(String, String)]) -> FetchResult<Value>;

    async fn send_json(&self, method: Method, path: &str, body: Value) -> FetchResult<Value>;

    /// Binary fetch for the CSV export. Non-2xx statuses are errors here
    /// too: an export must fail loudly, never produce an empty file.
    async fn get_raw(&self, path: &str, query: &[(String, String)]) -> FetchResult<RawResponse>;
}

// ─── reqwest implementation ─────────────────────────────────────────────────

/// Production transport over reqwest. The session cookie set by the login
/// endpoint lives in the client's cookie store.
pub struct HttpTransport {
    client: Client,
    base_url: String,
    session: SessionHandle,
}

impl HttpTransport {
    pub fn new(base_url: &str, session: SessionHandle) -> FetchResult<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;
        Ok(HttpTransport {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Maps status-level failures. The body of a failed request is expected
    /// to be `{"error": "..."}`; anything else degrades to the status text.
    async fn check(&self, resp: Response) -> FetchResult<Response> {
        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED {
            self.session.expired();
            return Err(FetchError::Unauthorized);
        }
        if !status.is_success() {
            let message = resp
                .json::<Value>()
                .await
                .ok()
                .and_then(|v| v.get("error").and_then(Value::as_str).map(String::from))
                .unwrap_or_else(|| {
                    status.canonical_reason().unwrap_or("request failed").to_string()
                });
            return Err(FetchError::Api { status: status.as_u16(), message });
        }
        Ok(resp)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get_json(&self, path: &str, query: &[(String, String)]) -> FetchResult<Value> {
        let resp = self
            .client
            .get(self.url(path))
            .query(query)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;
        let resp = self.check(resp).await?;
        decode_json(resp).await
    }

    async fn send_json(&self, method: Method, path: &str, body: Value) -> FetchResult<Value> {
        let resp = self
            .client
            .request(method.clone(), self.url(path))
            .json(&body)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;
        let resp = self.check(resp).await?;
        decode_json(resp).await
    }

    async fn get_raw(&self, path: &str, query: &[(String, String)]) -> FetchResult<RawResponse> {
        let resp = self
            .client
            .get(self.url(path))
            .query(query)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;
        let resp = self.check(resp).await?;
        let status = resp.status().as_u16();
        let content_disposition = resp
            .headers()
            .get(reqwest::header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let body = resp
            .bytes()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?
            .to_vec();
        Ok(RawResponse { status, content_disposition, body })
    }
}

/// Empty bodies (204, empty 200) decode to null, mirroring endpoints that
/// answer with no content.
async fn decode_json(resp: Response) -> FetchResult<Value> {
    let bytes = resp.bytes().await.map_err(|e| FetchError::Network(e.to_string()))?;
    if bytes.is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_slice(&bytes).map_err(|e| FetchError::Malformed(e.to_string()))
}
