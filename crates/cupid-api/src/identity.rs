use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use crate::error::ApiError;

/// What the identity provider hands back for a one-time session id.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionData {
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub picture: Option<String>,
    pub session_token: String,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Trade the provider's session id for the user's profile and a session token.
    async fn exchange(&self, session_id: &str) -> Result<SessionData, ApiError>;
}

/// OAuth session-data endpoint client.
pub struct OAuthSessionClient {
    http: reqwest::Client,
    url: String,
}

impl OAuthSessionClient {
    pub fn new(http: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }
}

#[async_trait]
impl IdentityProvider for OAuthSessionClient {
    async fn exchange(&self, session_id: &str) -> Result<SessionData, ApiError> {
        let resp = self
            .http
            .get(&self.url)
            .header("X-Session-ID", session_id)
            .send()
            .await
            .map_err(|e| {
                warn!("Identity provider unreachable: {}", e);
                ApiError::Upstream(format!("Identity provider unreachable: {}", e))
            })?;

        if !resp.status().is_success() {
            warn!("Identity provider rejected session id ({})", resp.status());
            return Err(ApiError::InvalidSession);
        }

        resp.json::<SessionData>().await.map_err(|e| {
            warn!("Malformed session data from identity provider: {}", e);
            ApiError::InvalidSession
        })
    }
}
