use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Attachment, User};

/// Knowledge-base article written by a plumber and moderated by admins
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user: User,
    #[serde(default)]
    pub ai_review_score: Option<f64>,
    #[serde(default)]
    pub ai_review_summary: Option<String>,
    #[serde(default)]
    pub ai_review_concerns: Option<ReviewConcerns>,
}

/// Findings of the automated pre-moderation pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewConcerns {
    #[serde(default)]
    pub safety: Vec<String>,
    #[serde(default)]
    pub inappropriate: bool,
}

/// Article draft; every field is optional on update
#[derive(Debug, Clone, Default)]
pub struct ArticleDraft {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<Attachment>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArticleApproval {
    pub is_approved: bool,
}
