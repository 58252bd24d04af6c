use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UserRef;

/// What a report points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportTarget {
    Post,
    Comment,
    CommentReply,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub id: i64,
    pub reason: String,
    pub user: UserRef,
    pub target_type: ReportTarget,
    pub target_id: i64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewReport {
    pub reason: String,
    pub target_type: ReportTarget,
    pub target_id: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportUpdate {
    pub reason: String,
}
