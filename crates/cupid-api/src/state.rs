use std::sync::Arc;

use anyhow::anyhow;
use tracing::error;

use cupid_db::Database;

use crate::error::ApiError;
use crate::gateway::PaymentGateway;
use crate::identity::IdentityProvider;
use crate::notify::Notifier;

pub type AppState = Arc<AppStateInner>;

/// Process-wide dependencies, built once at startup and shared by every handler.
pub struct AppStateInner {
    pub db: Database,
    pub identity: Arc<dyn IdentityProvider>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub notifier: Arc<dyn Notifier>,
    /// Gateway key secret, also the HMAC key for checkout signatures.
    pub payment_secret: String,
}

/// Run a blocking DB closure off the async runtime.
pub async fn db_call<F, T>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&Database) -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || f(&state.db))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal(anyhow!("DB task failed: {}", e))
        })?
        .map_err(ApiError::Internal)
}
