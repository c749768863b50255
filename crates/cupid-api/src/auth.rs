use axum::{
    Extension, Json,
    extract::State,
    http::{HeaderMap, header},
    response::IntoResponse,
};
use chrono::Utc;
use tracing::info;

use cupid_crypto::ids::generate_user_id;
use cupid_db::models::format_timestamp;
use cupid_types::api::Ack;
use cupid_types::models::User;

use crate::error::ApiError;
use crate::notify::{Notification, dispatch};
use crate::session::{
    clear_session_cookie, cookie_token, session_cookie, session_ttl, user_from_row,
};
use crate::state::{AppState, db_call};

pub const SESSION_ID_HEADER: &str = "X-Session-ID";

/// POST /auth/session: trade the identity provider's session id for a user
/// record and a session cookie.
pub async fn create_session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let session_id = headers
        .get(SESSION_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::Validation(format!("{} header required", SESSION_ID_HEADER)))?;

    let data = state.identity.exchange(session_id).await?;

    let now = Utc::now();
    let created_at = format_timestamp(now);
    let expires_at = format_timestamp(now + session_ttl());
    let token = data.session_token.clone();

    let (row, is_new) = db_call(&state, move |db| {
        let (row, is_new) = db.upsert_user(
            &generate_user_id(),
            &data.email,
            &data.name,
            data.picture.as_deref(),
            &created_at,
        )?;
        db.create_session(&data.session_token, &row.user_id, &expires_at, &created_at)?;
        Ok((row, is_new))
    })
    .await?;

    let user = user_from_row(row)?;
    if is_new {
        info!("New user {} ({})", user.user_id, user.email);
        dispatch(
            state.notifier.clone(),
            Notification::Welcome {
                to_email: user.email.clone(),
                name: user.name.clone(),
            },
        );
    }
    info!("Session created for user {}", user.user_id);

    Ok(([(header::SET_COOKIE, session_cookie(&token))], Json(user)))
}

/// GET /auth/me
pub async fn me(Extension(user): Extension<User>) -> Json<User> {
    Json(user)
}

/// POST /auth/logout: idempotent; only the cookie is consulted.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(token) = cookie_token(&headers) {
        let removed = db_call(&state, move |db| db.delete_session(&token)).await?;
        if removed > 0 {
            info!("Session deleted");
        }
    }

    Ok((
        [(header::SET_COOKIE, clear_session_cookie())],
        Json(Ack::new("Logged out")),
    ))
}
