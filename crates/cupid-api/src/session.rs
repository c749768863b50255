use anyhow::Result;
use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Authorization, Cookie, HeaderMapExt, authorization::Bearer};
use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use cupid_db::models::{UserRow, parse_timestamp};
use cupid_types::models::User;

use crate::error::ApiError;
use crate::state::{AppState, db_call};

pub const SESSION_COOKIE: &str = "session_token";
pub const SESSION_TTL_DAYS: i64 = 7;

pub fn session_ttl() -> Duration {
    Duration::days(SESSION_TTL_DAYS)
}

/// `Set-Cookie` value for a fresh session. SameSite=None so the frontend can
/// live on another origin, which in turn requires Secure.
pub fn session_cookie(token: &str) -> String {
    format!(
        "{}={}; Path=/; Max-Age={}; HttpOnly; Secure; SameSite=None",
        SESSION_COOKIE,
        token,
        session_ttl().num_seconds()
    )
}

pub fn clear_session_cookie() -> String {
    format!(
        "{}=; Path=/; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT; HttpOnly; Secure; SameSite=None",
        SESSION_COOKIE
    )
}

pub fn cookie_token(headers: &HeaderMap) -> Option<String> {
    headers
        .typed_get::<Cookie>()
        .and_then(|c| c.get(SESSION_COOKIE).map(str::to_string))
        .filter(|t| !t.is_empty())
}

/// Cookie first, then `Authorization: Bearer`.
pub fn request_token(headers: &HeaderMap) -> Option<String> {
    cookie_token(headers).or_else(|| {
        headers
            .typed_get::<Authorization<Bearer>>()
            .map(|auth| auth.token().to_string())
            .filter(|t| !t.is_empty())
    })
}

/// A session is live strictly before its expiry instant.
pub fn session_is_live(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now < expires_at
}

pub fn user_from_row(row: UserRow) -> Result<User> {
    Ok(User {
        created_at: parse_timestamp(&row.created_at)?,
        user_id: row.user_id,
        email: row.email,
        name: row.name,
        picture: row.picture,
    })
}

/// Look up the user behind a session token. Unknown and expired tokens both
/// yield `None`; expired rows are left in place.
pub async fn resolve_user(state: &AppState, token: &str) -> Result<Option<User>, ApiError> {
    let token = token.to_string();
    db_call(state, move |db| {
        let Some(session) = db.get_session(&token)? else {
            return Ok(None);
        };

        let expires_at = parse_timestamp(&session.expires_at)?;
        if !session_is_live(expires_at, Utc::now()) {
            debug!("Session for user {} expired at {}", session.user_id, expires_at);
            return Ok(None);
        }

        db.get_user_by_id(&session.user_id)?
            .map(user_from_row)
            .transpose()
    })
    .await
}

/// Resolve the caller's session and stash the `User` in request extensions.
pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = request_token(req.headers()).ok_or(ApiError::Unauthenticated)?;
    let user = resolve_user(&state, &token)
        .await?
        .ok_or(ApiError::Unauthenticated)?;

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}
