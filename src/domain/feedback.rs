// src/domain/feedback.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::ServerError;

pub const MIN_NAME_CHARS: usize = 2;
pub const MAX_NAME_CHARS: usize = 50;
pub const MIN_MESSAGE_CHARS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackType {
    Suggestion,
    Complaint,
    Praise,
    Other,
}

impl FeedbackType {
    pub const ALL: [FeedbackType; 4] = [
        FeedbackType::Suggestion,
        FeedbackType::Complaint,
        FeedbackType::Praise,
        FeedbackType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackType::Suggestion => "suggestion",
            FeedbackType::Complaint => "complaint",
            FeedbackType::Praise => "praise",
            FeedbackType::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FeedbackType::Suggestion => "Suggestion",
            FeedbackType::Complaint => "Complaint",
            FeedbackType::Praise => "Praise",
            FeedbackType::Other => "Other",
        }
    }
}

impl FromStr for FeedbackType {
    type Err = ServerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "suggestion" => Ok(FeedbackType::Suggestion),
            "complaint" => Ok(FeedbackType::Complaint),
            "praise" => Ok(FeedbackType::Praise),
            "other" => Ok(FeedbackType::Other),
            other => Err(ServerError::BadRequest(format!(
                "unknown feedback type '{other}'"
            ))),
        }
    }
}

impl fmt::Display for FeedbackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub rating: u8,
    #[serde(rename = "type")]
    pub feedback_type: FeedbackType,
    pub subject: String,
    pub message: String,
    /// Unix seconds.
    pub created_at: i64,
}

/// Submitted by the public form or `POST /api/feedback`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub rating: Option<i64>,
    #[serde(default, alias = "type")]
    pub feedback_type: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewFeedback {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub rating: u8,
    pub feedback_type: FeedbackType,
    pub subject: String,
    pub message: String,
}

/// Loose shape check: one `@`, something before it, a dotted domain after it.
pub fn looks_like_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !value.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}

impl FeedbackInput {
    pub fn validate(&self) -> Result<NewFeedback, ServerError> {
        let mut errors = Vec::new();

        let name = self.name.trim();
        let name_len = name.chars().count();
        if name_len < MIN_NAME_CHARS || name_len > MAX_NAME_CHARS {
            errors.push(format!(
                "Name must be between {MIN_NAME_CHARS} and {MAX_NAME_CHARS} characters"
            ));
        }

        let email = self.email.trim();
        if !looks_like_email(email) {
            errors.push("A valid email address is required".to_string());
        }

        let rating = match self.rating {
            Some(r @ 1..=5) => Some(r as u8),
            _ => {
                errors.push("Rating must be between 1 and 5".to_string());
                None
            }
        };

        let feedback_type = match self.feedback_type.parse::<FeedbackType>() {
            Ok(t) => Some(t),
            Err(_) => {
                errors.push("Feedback type must be suggestion, complaint, praise or other".to_string());
                None
            }
        };

        let subject = self.subject.trim();
        if subject.is_empty() {
            errors.push("Subject is required".to_string());
        }

        let message = self.message.trim();
        if message.chars().count() < MIN_MESSAGE_CHARS {
            errors.push(format!(
                "Message must be at least {MIN_MESSAGE_CHARS} characters"
            ));
        }

        match (rating, feedback_type) {
            (Some(rating), Some(feedback_type)) if errors.is_empty() => Ok(NewFeedback {
                name: name.to_string(),
                email: email.to_string(),
                phone: self.phone.trim().to_string(),
                rating,
                feedback_type,
                subject: subject.to_string(),
                message: message.to_string(),
            }),
            _ => Err(ServerError::Validation(errors)),
        }
    }
}
