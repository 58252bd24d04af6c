use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    NewMessage,
    NewChat,
    ComplaintStatus,
    System,
    Reminder,
}

impl NotificationKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NewMessage => "new_message",
            Self::NewChat => "new_chat",
            Self::ComplaintStatus => "complaint_status",
            Self::System => "system",
            Self::Reminder => "reminder",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub notification_type: NotificationKind,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub is_important: bool,
    #[serde(default)]
    pub action_url: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub read_at: Option<DateTime<Utc>>,
}

/// Query filters for listing notifications
#[derive(Debug, Clone, Copy, Default)]
pub struct NotificationFilter {
    pub is_read: Option<bool>,
    pub kind: Option<NotificationKind>,
    pub is_important: Option<bool>,
}

impl NotificationFilter {
    pub fn query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(is_read) = self.is_read {
            query.push(("is_read".to_string(), is_read.to_string()));
        }
        if let Some(kind) = self.kind {
            query.push(("notification_type".to_string(), kind.as_str().to_string()));
        }
        if let Some(is_important) = self.is_important {
            query.push(("is_important".to_string(), is_important.to_string()));
        }
        query
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationStats {
    pub total_notifications: u32,
    pub unread_notifications: u32,
    pub important_notifications: u32,
    #[serde(default)]
    pub notifications_by_type: HashMap<String, u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkAllReadResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub updated_count: u32,
}
