use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub user_id: String,
    pub email: String,
    pub name: String,
    pub picture: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Payment state of a valentine. Only ever moves `Pending -> Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
}

impl PaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PaymentStatus::Pending),
            "completed" => Ok(PaymentStatus::Completed),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

/// A recipient's answer to a valentine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Answer {
    Yes,
    No,
}

impl Answer {
    pub fn as_str(self) -> &'static str {
        match self {
            Answer::Yes => "yes",
            Answer::No => "no",
        }
    }
}

impl FromStr for Answer {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "yes" => Ok(Answer::Yes),
            "no" => Ok(Answer::No),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown value '{0}'")]
pub struct UnknownVariant(pub String);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Valentine {
    pub valentine_id: String,
    pub user_id: String,
    pub template_id: String,
    pub from_name: String,
    pub to_name: String,
    pub message: String,
    pub emoji_style: String,
    pub background_theme: String,
    pub unique_link: String,
    pub payment_status: PaymentStatus,
    pub payment_id: Option<String>,
    pub response: Option<Answer>,
    pub response_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Static catalog entry. Templates are configuration, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Template {
    pub template_id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub interaction_type: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unanswered_valentine_serializes_null_response() {
        let valentine = Valentine {
            valentine_id: "val_1".into(),
            user_id: "user_1".into(),
            template_id: "runaway_no".into(),
            from_name: "Sam".into(),
            to_name: "Kai".into(),
            message: "hi".into(),
            emoji_style: "cute".into(),
            background_theme: "pink".into(),
            unique_link: "val_1".into(),
            payment_status: PaymentStatus::Pending,
            payment_id: None,
            response: None,
            response_at: None,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&valentine).unwrap();
        assert_eq!(json["payment_status"], "pending");
        assert!(json["response"].is_null());
        assert!(json["response_at"].is_null());
        assert!(json["payment_id"].is_null());
    }

    #[test]
    fn answer_parses_only_lowercase_yes_no() {
        assert_eq!("yes".parse::<Answer>(), Ok(Answer::Yes));
        assert_eq!("no".parse::<Answer>(), Ok(Answer::No));
        assert!("YES".parse::<Answer>().is_err());
        assert!("maybe".parse::<Answer>().is_err());
    }

    #[test]
    fn payment_status_rejects_unknown_values() {
        assert_eq!(
            "completed".parse::<PaymentStatus>(),
            Ok(PaymentStatus::Completed)
        );
        assert!("refunded".parse::<PaymentStatus>().is_err());
    }

    #[test]
    fn unknown_variant_names_the_value() {
        let err = "refunded".parse::<PaymentStatus>().unwrap_err();
        assert_eq!(err.to_string(), "unknown value 'refunded'");
        let _: &dyn std::error::Error = &err;
    }
}
