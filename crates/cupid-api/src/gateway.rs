use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ApiError;

#[derive(Debug, Clone, Serialize)]
pub struct OrderNotes {
    pub bundle_type: String,
    pub timezone: String,
}

/// Order creation payload, amounts in minor units.
#[derive(Debug, Clone, Serialize)]
pub struct NewOrder {
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
    pub notes: OrderNotes,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatedOrder {
    pub id: String,
    pub amount: i64,
    pub currency: String,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_order(&self, order: &NewOrder) -> Result<CreatedOrder, ApiError>;
}

/// Razorpay Orders API over HTTP basic auth.
pub struct RazorpayClient {
    http: reqwest::Client,
    base_url: String,
    key_id: String,
    key_secret: String,
}

#[derive(Deserialize)]
struct RazorpayErrorBody {
    error: RazorpayError,
}

#[derive(Deserialize)]
struct RazorpayError {
    description: String,
}

impl RazorpayClient {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        key_id: impl Into<String>,
        key_secret: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            key_id: key_id.into(),
            key_secret: key_secret.into(),
        }
    }
}

#[async_trait]
impl PaymentGateway for RazorpayClient {
    async fn create_order(&self, order: &NewOrder) -> Result<CreatedOrder, ApiError> {
        let resp = self
            .http
            .post(format!("{}/orders", self.base_url))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(order)
            .send()
            .await
            .map_err(|e| ApiError::Upstream(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<RazorpayErrorBody>(&text)
                .map(|b| b.error.description)
                .unwrap_or_else(|_| format!("Payment gateway returned {}", status));
            warn!("Order creation failed for receipt {}: {}", order.receipt, message);
            return Err(ApiError::Upstream(message));
        }

        resp.json::<CreatedOrder>()
            .await
            .map_err(|e| ApiError::Upstream(format!("Malformed order response: {}", e)))
    }
}
