//! Request and response types of the PlumbConnect REST API

mod articles;
mod auth;
mod chats;
mod complaints;
mod notifications;
mod posts;
mod reports;
mod services;
mod users;

pub use articles::*;
pub use auth::*;
pub use chats::*;
pub use complaints::*;
pub use notifications::*;
pub use posts::*;
pub use reports::*;
pub use services::*;
pub use users::*;

use serde::{Deserialize, Serialize};

/// Body of list endpoints
///
/// Paginated endpoints wrap items in `{ "results": [...] }`, the rest answer
/// with a bare array.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListPayload<T> {
    Paged { results: Vec<T> },
    Bare(Vec<T>),
}

impl<T> ListPayload<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::Paged { results } | Self::Bare(results) => results,
        }
    }
}

/// Plain acknowledgement returned by action endpoints
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

/// A file uploaded as one multipart field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes: bytes.into(),
        }
    }
}
