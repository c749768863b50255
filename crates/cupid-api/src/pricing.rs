//! Regional pricing, chosen by the timezone the client reports.
//!
//! Matching is an exact string comparison against a fixed list. There is no
//! geolocation or locale inference; anything unrecognised is International.

use axum::{Json, body::Bytes};

use cupid_types::api::{Prices, PricingRequest, PricingResponse};

/// Timezone ids of India, Pakistan, Bangladesh, Sri Lanka, Nepal, Bhutan,
/// the Maldives and Afghanistan.
pub const SOUTH_ASIAN_TIMEZONES: &[&str] = &[
    "Asia/Kolkata",
    "Asia/Calcutta",
    "Asia/Karachi",
    "Asia/Dhaka",
    "Asia/Colombo",
    "Asia/Kathmandu",
    "Asia/Thimphu",
    "Indian/Maldives",
    "Asia/Kabul",
];

/// Timezone assumed when the client sends none.
pub const DEFAULT_TIMEZONE: &str = "UTC";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceTable {
    pub region: &'static str,
    pub currency: &'static str,
    pub symbol: &'static str,
    pub prices: Prices,
}

pub const SOUTH_ASIA: PriceTable = PriceTable {
    region: "South Asia",
    currency: "INR",
    symbol: "₹",
    prices: Prices {
        single: 9.99,
        bundle_3: 24.99,
        bundle_5: 34.99,
    },
};

pub const INTERNATIONAL: PriceTable = PriceTable {
    region: "International",
    currency: "USD",
    symbol: "$",
    prices: Prices {
        single: 2.99,
        bundle_3: 7.49,
        bundle_5: 10.49,
    },
};

pub fn resolve_pricing(timezone: &str) -> PriceTable {
    if SOUTH_ASIAN_TIMEZONES.contains(&timezone) {
        SOUTH_ASIA
    } else {
        INTERNATIONAL
    }
}

/// How many valentine unlocks one payment covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BundleType {
    Single,
    Bundle3,
    Bundle5,
}

impl BundleType {
    /// Unknown or missing values fall back to `Single`.
    pub fn parse_or_default(raw: Option<&str>) -> Self {
        match raw {
            Some("bundle_3") => BundleType::Bundle3,
            Some("bundle_5") => BundleType::Bundle5,
            _ => BundleType::Single,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BundleType::Single => "single",
            BundleType::Bundle3 => "bundle_3",
            BundleType::Bundle5 => "bundle_5",
        }
    }
}

impl PriceTable {
    pub fn price(&self, bundle: BundleType) -> f64 {
        match bundle {
            BundleType::Single => self.prices.single,
            BundleType::Bundle3 => self.prices.bundle_3,
            BundleType::Bundle5 => self.prices.bundle_5,
        }
    }
}

/// Decimal price to the gateway's integer minor unit (paise, cents),
/// rounding half up.
pub fn to_minor_units(price: f64) -> i64 {
    (price * 100.0).round() as i64
}

/// POST /payment/pricing: body is optional; anything unreadable means UTC.
pub async fn get_pricing(body: Bytes) -> Json<PricingResponse> {
    let timezone = serde_json::from_slice::<PricingRequest>(&body)
        .ok()
        .and_then(|req| req.timezone)
        .unwrap_or_else(|| DEFAULT_TIMEZONE.to_string());

    let table = resolve_pricing(&timezone);

    Json(PricingResponse {
        timezone,
        region: table.region.to_string(),
        currency: table.currency.to_string(),
        symbol: table.symbol.to_string(),
        prices: table.prices,
    })
}
