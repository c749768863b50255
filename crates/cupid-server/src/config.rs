use anyhow::{Context, Result, bail};
use std::env;
use std::path::PathBuf;

/// Placeholder gateway secrets that MUST NOT be used.
const PLACEHOLDER_SECRETS: &[&str] = &["change-me", "your_key_secret", "rzp_secret_placeholder"];

const DEFAULT_AUTH_SESSION_URL: &str =
    "https://demobackend.emergentagent.com/auth/v1/env/oauth/session-data";

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from_address: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    /// Empty means any origin (mirrored so credentials still work).
    pub cors_origins: Vec<String>,
    pub auth_session_url: String,
    pub razorpay_key_id: String,
    pub razorpay_key_secret: String,
    pub razorpay_api_url: String,
    pub app_url: String,
    pub smtp: Option<SmtpConfig>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let port: u16 = or("CUPID_PORT", "8001")
            .parse()
            .context("CUPID_PORT must be a port number")?;

        let razorpay_key_secret = get("RAZORPAY_KEY_SECRET").unwrap_or_default();
        if razorpay_key_secret.is_empty()
            || PLACEHOLDER_SECRETS.contains(&razorpay_key_secret.as_str())
        {
            bail!("RAZORPAY_KEY_SECRET is unset or still a placeholder");
        }

        let cors_origins = or("CUPID_CORS_ORIGINS", "*")
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty() && *o != "*")
            .map(str::to_string)
            .collect();

        let smtp = match get("SMTP_HOST").filter(|h| !h.is_empty()) {
            Some(host) => Some(SmtpConfig {
                host,
                port: or("SMTP_PORT", "587")
                    .parse()
                    .context("SMTP_PORT must be a port number")?,
                username: get("SMTP_USERNAME").filter(|u| !u.is_empty()),
                password: get("SMTP_PASSWORD"),
                from_address: or("SMTP_FROM_ADDRESS", "hello@cupids-prank.local"),
            }),
            None => None,
        };

        Ok(Config {
            host: or("CUPID_HOST", "0.0.0.0"),
            port,
            db_path: or("CUPID_DB_PATH", "cupid.db").into(),
            cors_origins,
            auth_session_url: or("CUPID_AUTH_SESSION_URL", DEFAULT_AUTH_SESSION_URL),
            razorpay_key_id: get("RAZORPAY_KEY_ID").unwrap_or_default(),
            razorpay_key_secret,
            razorpay_api_url: or("RAZORPAY_API_URL", "https://api.razorpay.com/v1"),
            app_url: or("CUPID_APP_URL", "http://localhost:3000"),
            smtp,
        })
    }
}
