use serde::{Deserialize, Serialize};

// -- Valentines --

#[derive(Debug, Deserialize)]
pub struct CreateValentineRequest {
    pub template_id: String,
    pub from_name: String,
    pub to_name: String,
    pub message: String,
    #[serde(default = "default_emoji_style")]
    pub emoji_style: String,
    #[serde(default = "default_background_theme")]
    pub background_theme: String,
}

fn default_emoji_style() -> String {
    "cute".to_string()
}

fn default_background_theme() -> String {
    "pink".to_string()
}

/// Kept as a raw string so an unknown answer is reported as a validation
/// error rather than a body rejection.
#[derive(Debug, Deserialize)]
pub struct RecordResponseRequest {
    pub response: String,
}

/// Generic `{ "message": ... }` acknowledgement body.
#[derive(Debug, Serialize, Deserialize)]
pub struct Ack {
    pub message: String,
}

impl Ack {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// -- Pricing --

#[derive(Debug, Default, Deserialize)]
pub struct PricingRequest {
    pub timezone: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prices {
    pub single: f64,
    pub bundle_3: f64,
    pub bundle_5: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PricingResponse {
    pub timezone: String,
    pub region: String,
    pub currency: String,
    pub symbol: String,
    pub prices: Prices,
}

// -- Payments --

/// `amount` and `currency` are sent by older clients; the server always
/// prices the order itself.
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub valentine_id: String,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub bundle_type: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OrderResponse {
    pub order_id: String,
    pub amount: i64,
    pub currency: String,
    pub bundle_type: String,
    pub display_amount: f64,
}

#[derive(Debug, Deserialize)]
pub struct VerifyPaymentRequest {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
    pub valentine_id: String,
}

// -- Errors --

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}
