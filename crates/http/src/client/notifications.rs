//! User notifications

use super::{ApiRequest, ClientError, PlumbClient};
use crate::types::{MarkAllReadResponse, Notification, NotificationFilter, NotificationStats};

impl PlumbClient {
    pub async fn notifications(
        &self,
        filter: &NotificationFilter,
    ) -> Result<Vec<Notification>, ClientError> {
        let request = ApiRequest::get("/notifications/").query(filter.query());
        self.execute_list(request).await
    }

    pub async fn notification(&self, id: i64) -> Result<Notification, ClientError> {
        self.execute(ApiRequest::get(format!("/notifications/{id}/")))
            .await
    }

    pub async fn mark_notification_read(&self, id: i64) -> Result<Notification, ClientError> {
        let request = ApiRequest::patch(format!("/notifications/{id}/"))
            .json(&serde_json::json!({ "is_read": true }))?;
        self.execute(request).await
    }

    pub async fn mark_all_notifications_read(&self) -> Result<MarkAllReadResponse, ClientError> {
        self.execute(ApiRequest::patch("/notifications/mark-all-read/"))
            .await
    }

    pub async fn delete_notification(&self, id: i64) -> Result<(), ClientError> {
        self.execute_empty(ApiRequest::delete(format!("/notifications/{id}/")))
            .await
    }

    pub async fn notification_stats(&self) -> Result<NotificationStats, ClientError> {
        self.execute(ApiRequest::get("/notifications/stats/"))
            .await
    }

    /// Unread notification count, read from the stats endpoint
    pub async fn unread_notification_count(&self) -> Result<u32, ClientError> {
        Ok(self.notification_stats().await?.unread_notifications)
    }
}
