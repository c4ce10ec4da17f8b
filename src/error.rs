use thiserror::Error;

/// Error surface shared by every client component.
///
/// Variants are cheap to clone because cached in-flight requests hand the
/// same result to every waiter.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FetchError {
    /// Transport-level failure (DNS, connect, timeout). Retried once by the
    /// fetch layer before surfacing.
    #[error("network error: {0}")]
    Network(String),

    /// The server answered 401. Global signal, not a component-local error.
    #[error("session expired")]
    Unauthorized,

    /// Non-2xx answer carrying the server's error payload verbatim.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// 2xx answer whose body could not be decoded.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// CSV export failed; no file was produced.
    #[error("export failed: {0}")]
    Export(String),
}

impl FetchError {
    /// Message suitable for a UI banner: the server's own words when we have
    /// them, a generic fallback otherwise. Never a stack trace.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::Api { message, .. } if !message.is_empty() => message.clone(),
            FetchError::Unauthorized => "Your session has expired. Please log in again.".into(),
            FetchError::Export(msg) => format!("Export failed: {msg}"),
            _ => "Something went wrong. Please try again.".into(),
        }
    }

    /// True for failures worth one silent retry (transient transport
    /// errors). HTTP-level answers are never retried.
    pub fn is_transient(&self) -> bool {
        matches!(self, FetchError::Network(_))
    }
}

pub type FetchResult<T> = Result<T, FetchError>;
