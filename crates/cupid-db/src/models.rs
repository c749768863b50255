//! Database row types. These map directly to SQLite rows and stay distinct
//! from the cupid-types API models; callers validate enum-like columns and
//! timestamps when converting.

use anyhow::{Result, anyhow};
use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};

pub struct UserRow {
    pub user_id: String,
    pub email: String,
    pub name: String,
    pub picture: Option<String>,
    pub created_at: String,
}

pub struct SessionRow {
    pub session_token: String,
    pub user_id: String,
    pub expires_at: String,
    pub created_at: String,
}

pub struct ValentineRow {
    pub valentine_id: String,
    pub user_id: String,
    pub template_id: String,
    pub from_name: String,
    pub to_name: String,
    pub message: String,
    pub emoji_style: String,
    pub background_theme: String,
    pub unique_link: String,
    pub payment_status: String,
    pub payment_id: Option<String>,
    pub response: Option<String>,
    pub response_at: Option<String>,
    pub created_at: String,
}

/// Canonical on-disk timestamp form (RFC 3339, UTC, microseconds).
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a stored timestamp. Values written without an offset (SQLite's
/// `datetime('now')` or older imports) are taken to be UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }

    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|ndt| ndt.and_utc())
        .ok_or_else(|| anyhow!("Unparseable timestamp '{}'", raw))
}
