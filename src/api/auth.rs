use std::sync::Arc;

use reqwest::Method;
use serde_json::{json, Value};

use crate::api::models::CurrentUser;
use crate::error::{FetchError, FetchResult};
use crate::session::SessionHandle;
use crate::transport::Transport;

/// Login/logout against the dashboard auth endpoints. Besides the transport
/// boundary (which flips the session to Expired on 401), this is the only
/// writer of session state.
#[derive(Clone)]
pub struct AuthClient {
    transport: Arc<dyn Transport>,
    session: SessionHandle,
}

impl AuthClient {
    pub fn new(transport: Arc<dyn Transport>, session: SessionHandle) -> Self {
        AuthClient { transport, session }
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    /// The session cookie is set by the server; all we track locally is the
    /// state transition.
    pub async fn login(&self, username: &str, password: &str) -> FetchResult<()> {
        self.transport
            .send_json(
                Method::POST,
                "auth/login",
                json!({ "username": username, "password": password }),
            )
            .await?;
        self.session.authenticated();
        tracing::info!("logged in as {}", username);
        Ok(())
    }

    pub async fn logout(&self) -> FetchResult<()> {
        self.transport.send_json(Method::POST, "auth/logout", Value::Null).await?;
        self.session.logged_out();
        Ok(())
    }

    /// Never cached: the answer is who the cookie says we are right now.
    pub async fn current_user(&self) -> FetchResult<CurrentUser> {
        let value = self.transport.get_json("auth/me", &[]).await?;
        serde_json::from_value(value).map_err(|e| FetchError::Malformed(e.to_string()))
    }
}
