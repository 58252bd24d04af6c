use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintType {
    InappropriateBehavior,
    PoorServiceQuality,
    PaymentIssues,
    SpamHarassment,
    FraudScam,
    Other,
}

impl ComplaintType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InappropriateBehavior => "inappropriate_behavior",
            Self::PoorServiceQuality => "poor_service_quality",
            Self::PaymentIssues => "payment_issues",
            Self::SpamHarassment => "spam_harassment",
            Self::FraudScam => "fraud_scam",
            Self::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintStatus {
    Pending,
    InProgress,
    Resolved,
    Rejected,
}

impl ComplaintStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Resolved => "resolved",
            Self::Rejected => "rejected",
        }
    }
}

/// Party of a complaint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplaintParty {
    pub id: i64,
    pub name: String,
    pub role: String,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Complaint {
    pub id: i64,
    pub from_user: ComplaintParty,
    pub to_user: ComplaintParty,
    pub complaint_type: ComplaintType,
    #[serde(default)]
    pub complaint_type_display: Option<String>,
    pub description: String,
    #[serde(default)]
    pub related_chat: Option<i64>,
    pub status: ComplaintStatus,
    #[serde(default)]
    pub status_display: Option<String>,
    #[serde(default)]
    pub admin_notes: String,
    #[serde(default)]
    pub resolved_by: Option<ComplaintParty>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub resolved_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewComplaint {
    pub to_user_id: i64,
    pub complaint_type: ComplaintType,
    pub description: String,
}

/// Status change or moderator notes on an existing complaint
#[derive(Debug, Clone, Default, Serialize)]
pub struct ComplaintUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ComplaintStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ComplaintFilter {
    pub complaint_type: Option<ComplaintType>,
    pub status: Option<ComplaintStatus>,
    pub search: Option<String>,
    pub ordering: Option<String>,
}

impl ComplaintFilter {
    pub fn query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(kind) = self.complaint_type {
            query.push(("complaint_type".to_string(), kind.as_str().to_string()));
        }
        if let Some(status) = self.status {
            query.push(("status".to_string(), status.as_str().to_string()));
        }
        if let Some(search) = &self.search {
            query.push(("search".to_string(), search.clone()));
        }
        if let Some(ordering) = &self.ordering {
            query.push(("ordering".to_string(), ordering.clone()));
        }
        query
    }
}

/// Counters; admins get the global fields, other users the filed/received ones
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplaintStats {
    pub total_complaints: Option<u32>,
    pub pending_complaints: Option<u32>,
    pub in_progress_complaints: Option<u32>,
    pub resolved_complaints: Option<u32>,
    pub rejected_complaints: Option<u32>,
    pub complaints_by_type: Option<HashMap<String, u32>>,
    pub filed_complaints: Option<u32>,
    pub received_complaints: Option<u32>,
    pub pending_filed: Option<u32>,
    pub resolved_filed: Option<u32>,
    pub pending_received: Option<u32>,
    pub resolved_received: Option<u32>,
}
