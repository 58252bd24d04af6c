use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Attachment, UserSummary};

/// One-to-one conversation between a client and a plumber
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
    pub sender: UserSummary,
    pub receiver: UserSummary,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub last_message: Option<String>,
    #[serde(default)]
    pub unread_count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Text,
    Image,
    File,
    Link,
    System,
}

impl MessageKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::File => "file",
            Self::Link => "link",
            Self::System => "system",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: i64,
    pub chat: i64,
    pub sender: UserSummary,
    pub content: String,
    pub message_type: MessageKind,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OpenChatRequest {
    pub receiver_id: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewTextMessage {
    pub chat: i64,
    pub content: String,
    pub message_type: MessageKind,
}

/// Message carrying an image or a file; the kind picks the field name
#[derive(Debug, Clone)]
pub struct NewAttachmentMessage {
    pub chat: i64,
    pub content: String,
    pub kind: MessageKind,
    pub attachment: Attachment,
}

#[derive(Debug, Clone, Serialize)]
pub struct MarkReadRequest {
    pub chat_id: i64,
}
