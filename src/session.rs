use std::sync::Arc;
use tokio::sync::watch;

/// Lifecycle of the console's authentication session.
///
/// `Unknown` until a login succeeds (or after logout), `Expired` the moment
/// any request comes back 401. Only the transport boundary and the auth
/// client may change it; the navigation layer just watches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unknown,
    Authenticated,
    Expired,
}

/// Process-wide session handle. Clones share one underlying state.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: Arc<watch::Sender<SessionState>>,
}

impl SessionHandle {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(SessionState::Unknown);
        SessionHandle { tx: Arc::new(tx) }
    }

    pub fn state(&self) -> SessionState {
        *self.tx.borrow()
    }

    /// Single subscriber point for the navigation layer (router guard).
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.tx.subscribe()
    }

    pub fn authenticated(&self) {
        self.tx.send_replace(SessionState::Authenticated);
    }

    /// Called by the transport on any 401, regardless of which component
    /// issued the request.
    pub fn expired(&self) {
        let previous = self.tx.send_replace(SessionState::Expired);
        if previous != SessionState::Expired {
            tracing::warn!("session expired, redirect to login required");
        }
    }

    pub fn logged_out(&self) {
        self.tx.send_replace(SessionState::Unknown);
    }
}

impl Default for SessionHandle {
    fn default() -> Self {
        Self::new()
    }
}
