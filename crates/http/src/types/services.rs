use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Pending,
    Accepted,
    Rejected,
    Completed,
}

/// A client's request for a plumber's service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRequest {
    pub id: i64,
    pub sender: i64,
    pub receiver: i64,
    #[serde(default)]
    pub sender_details: Option<User>,
    #[serde(default)]
    pub receiver_details: Option<User>,
    pub status: ServiceStatus,
    /// Decimal amount rendered by the backend as a string
    #[serde(default)]
    pub amount: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewServiceRequest {
    pub receiver: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceUpdate {
    pub status: ServiceStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AcceptServiceRequest {
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceReview {
    pub id: i64,
    pub service_request: i64,
    pub reviewer: i64,
    pub plumber: i64,
    #[serde(default)]
    pub reviewer_details: Option<User>,
    #[serde(default)]
    pub plumber_details: Option<User>,
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewServiceReview {
    pub service_request: i64,
    pub rating: u8,
    pub comment: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlumberRating {
    pub average_rating: f64,
    pub total_reviews: u32,
}
