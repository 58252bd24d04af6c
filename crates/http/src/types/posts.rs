use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Attachment, User};

/// Community post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub statement: String,
    #[serde(default)]
    pub image: Option<String>,
    pub author: User,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub likes_count: u32,
    #[serde(default)]
    pub is_liked: bool,
}

/// Post submission, always sent as multipart
#[derive(Debug, Clone, Default)]
pub struct NewPost {
    pub statement: String,
    pub image: Option<Attachment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub comment: String,
    pub post: i64,
    pub author: User,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub replies: Vec<Reply>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewComment {
    pub comment: String,
    pub post: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    pub id: i64,
    pub reply: String,
    pub comment: i64,
    pub author: User,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewReply {
    pub reply: String,
    pub comment: i64,
}

/// Result of toggling a like; the backend answers 201 or 204 without a body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeState {
    Liked,
    Unliked,
}
