use serde::{Deserialize, Serialize};

use super::Attachment;

/// Account role on the marketplace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Client,
    Plumber,
    Admin,
}

/// A governorate/city users and plumbers are attached to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: i64,
    pub city: String,
}

/// Full user profile as returned by `/users/...`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<Location>,
    pub role: UserRole,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

/// Reduced user shape embedded in chats, complaints and reviews
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    pub role: UserRole,
    #[serde(default)]
    pub image: Option<String>,
}

/// A user reference that the backend renders either as a bare id or nested
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserRef {
    Id(i64),
    Summary(UserSummary),
}

impl UserRef {
    pub const fn id(&self) -> i64 {
        match self {
            Self::Id(id) => *id,
            Self::Summary(user) => user.id,
        }
    }
}

/// New account registration
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub location_id: i64,
    pub role: UserRole,
}

/// Partial profile update; an image switches the request to multipart
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub location_id: Option<i64>,
    pub image: Option<Attachment>,
}

/// Password change for the signed-in user
#[derive(Debug, Clone, Serialize)]
pub struct PasswordChange {
    pub old_password: String,
    #[serde(rename = "password")]
    pub new_password: String,
}

/// Account entry offered as a complaint target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserOption {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub role: UserRole,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}
