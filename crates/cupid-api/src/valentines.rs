use anyhow::{Context, Result};
use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use chrono::Utc;
use tracing::{info, warn};

use cupid_crypto::ids::generate_valentine_id;
use cupid_db::models::{ValentineRow, format_timestamp, parse_timestamp};
use cupid_types::api::{Ack, CreateValentineRequest, RecordResponseRequest};
use cupid_types::models::{Answer, PaymentStatus, User, Valentine};

use crate::error::ApiError;
use crate::notify::{Notification, dispatch};
use crate::state::{AppState, db_call};
use crate::templates::is_known_template;

/// Reserved id served from memory for the landing-page preview.
pub const DEMO_ID: &str = "demo";

/// Fixed preview card. Built fresh per call and never written to the store.
pub fn demo_valentine() -> Valentine {
    Valentine {
        valentine_id: DEMO_ID.to_string(),
        user_id: "demo_user".to_string(),
        template_id: "runaway_no".to_string(),
        from_name: "Alex".to_string(),
        to_name: "You".to_string(),
        message: "I've been wanting to ask you this for so long... Will you be my Valentine? 💕"
            .to_string(),
        emoji_style: "cute".to_string(),
        background_theme: "pink".to_string(),
        unique_link: DEMO_ID.to_string(),
        payment_status: PaymentStatus::Completed,
        payment_id: Some("demo_payment".to_string()),
        response: None,
        response_at: None,
        created_at: Utc::now(),
    }
}

/// Validate a stored row on the way out; bad enum values or timestamps are errors.
pub fn valentine_from_row(row: ValentineRow) -> Result<Valentine> {
    let id = row.valentine_id.clone();
    Ok(Valentine {
        payment_status: row
            .payment_status
            .parse::<PaymentStatus>()
            .with_context(|| format!("valentine {} payment_status", id))?,
        response: row
            .response
            .as_deref()
            .map(str::parse::<Answer>)
            .transpose()
            .with_context(|| format!("valentine {} response", id))?,
        response_at: row.response_at.as_deref().map(parse_timestamp).transpose()?,
        created_at: parse_timestamp(&row.created_at)?,
        valentine_id: row.valentine_id,
        user_id: row.user_id,
        template_id: row.template_id,
        from_name: row.from_name,
        to_name: row.to_name,
        message: row.message,
        emoji_style: row.emoji_style,
        background_theme: row.background_theme,
        unique_link: row.unique_link,
        payment_id: row.payment_id,
    })
}

/// POST /valentines
pub async fn create_valentine(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    WithRejection(Json(req), _): WithRejection<Json<CreateValentineRequest>, ApiError>,
) -> Result<Json<Valentine>, ApiError> {
    if !is_known_template(&req.template_id) {
        return Err(ApiError::Validation(format!(
            "Unknown template '{}'",
            req.template_id
        )));
    }

    let valentine_id = generate_valentine_id();
    let row = ValentineRow {
        unique_link: valentine_id.clone(),
        valentine_id,
        user_id: user.user_id.clone(),
        template_id: req.template_id,
        from_name: req.from_name,
        to_name: req.to_name,
        message: req.message,
        emoji_style: req.emoji_style,
        background_theme: req.background_theme,
        payment_status: PaymentStatus::Pending.as_str().to_string(),
        payment_id: None,
        response: None,
        response_at: None,
        created_at: format_timestamp(Utc::now()),
    };

    let stored = db_call(&state, move |db| {
        db.insert_valentine(&row)?;
        db.get_valentine(&row.valentine_id)?
            .context("valentine missing right after insert")
    })
    .await?;

    let valentine = valentine_from_row(stored)?;
    info!("Valentine {} created by {}", valentine.valentine_id, user.user_id);
    Ok(Json(valentine))
}

/// GET /valentines: everything the caller owns, possibly empty.
pub async fn list_valentines(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<Vec<Valentine>>, ApiError> {
    let rows = db_call(&state, move |db| db.list_valentines_by_user(&user.user_id)).await?;
    let valentines = rows
        .into_iter()
        .map(valentine_from_row)
        .collect::<Result<Vec<_>>>()?;
    Ok(Json(valentines))
}

/// GET /valentines/{id}: public, recipients have no account.
pub async fn get_valentine(
    State(state): State<AppState>,
    Path(valentine_id): Path<String>,
) -> Result<Json<Valentine>, ApiError> {
    if valentine_id == DEMO_ID {
        return Ok(Json(demo_valentine()));
    }

    let row = db_call(&state, move |db| db.get_valentine(&valentine_id))
        .await?
        .ok_or(ApiError::NotFound("Valentine"))?;

    Ok(Json(valentine_from_row(row)?))
}

/// POST /valentines/{id}/response: records the recipient's answer,
/// replacing any earlier one, then tells the owner.
pub async fn record_response(
    State(state): State<AppState>,
    Path(valentine_id): Path<String>,
    WithRejection(Json(req), _): WithRejection<Json<RecordResponseRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let answer: Answer = req
        .response
        .parse()
        .map_err(|_| ApiError::Validation("response must be \"yes\" or \"no\"".to_string()))?;

    let responded_at = format_timestamp(Utc::now());
    let id = valentine_id.clone();
    let found = db_call(&state, move |db| {
        let Some(valentine) = db.get_valentine(&id)? else {
            return Ok(None);
        };
        db.set_valentine_response(&id, answer.as_str(), &responded_at)?;
        let owner = db.get_user_by_id(&valentine.user_id)?;
        Ok(Some((valentine, owner)))
    })
    .await?;

    let Some((valentine, owner)) = found else {
        return Err(ApiError::NotFound("Valentine"));
    };
    info!("Valentine {} answered '{}'", valentine_id, answer.as_str());

    match owner {
        Some(owner) => dispatch(
            state.notifier.clone(),
            Notification::ResponseReceived {
                to_email: owner.email,
                owner_name: owner.name,
                to_name: valentine.to_name,
                answer,
                valentine_id,
            },
        ),
        None => warn!(
            "Owner {} of valentine {} not found, skipping notification",
            valentine.user_id, valentine_id
        ),
    }

    Ok(Json(Ack::new("Response recorded")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> ValentineRow {
        ValentineRow {
            valentine_id: "val_1".into(),
            user_id: "user_1".into(),
            template_id: "destiny_mode".into(),
            from_name: "Sam".into(),
            to_name: "Kai".into(),
            message: "hi".into(),
            emoji_style: "cute".into(),
            background_theme: "pink".into(),
            unique_link: "val_1".into(),
            payment_status: "pending".into(),
            payment_id: None,
            response: None,
            response_at: None,
            created_at: "2025-02-01 10:00:00".into(),
        }
    }

    #[test]
    fn row_conversion_validates_enums() {
        let v = valentine_from_row(row()).unwrap();
        assert_eq!(v.payment_status, PaymentStatus::Pending);
        assert_eq!(v.response, None);

        let mut bad = row();
        bad.payment_status = "refunded".into();
        assert!(valentine_from_row(bad).is_err());

        let mut bad = row();
        bad.response = Some("maybe".into());
        assert!(valentine_from_row(bad).is_err());
    }

    #[test]
    fn answered_row_converts() {
        let mut answered = row();
        answered.response = Some("yes".into());
        answered.response_at = Some("2025-02-14T08:00:00Z".into());
        let v = valentine_from_row(answered).unwrap();
        assert_eq!(v.response, Some(Answer::Yes));
        assert!(v.response_at.is_some());
    }

    #[test]
    fn demo_is_paid_and_unanswered() {
        let demo = demo_valentine();
        assert_eq!(demo.valentine_id, "demo");
        assert_eq!(demo.payment_status, PaymentStatus::Completed);
        assert!(demo.response.is_none());
    }
}
