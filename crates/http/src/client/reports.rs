//! Abuse reports on posts, comments and replies

use super::{ApiRequest, ClientError, PlumbClient};
use crate::types::{NewReport, Report, ReportUpdate};

impl PlumbClient {
    pub async fn create_report(&self, report: &NewReport) -> Result<Report, ClientError> {
        self.execute(ApiRequest::post("/reports/").json(report)?)
            .await
    }

    /// Reports filed by the signed-in user
    pub async fn my_reports(&self) -> Result<Vec<Report>, ClientError> {
        self.reports_by("user", "current".to_string()).await
    }

    pub async fn post_reports(&self, post_id: i64) -> Result<Vec<Report>, ClientError> {
        self.reports_by("post", post_id.to_string()).await
    }

    pub async fn comment_reports(&self, comment_id: i64) -> Result<Vec<Report>, ClientError> {
        self.reports_by("comment", comment_id.to_string()).await
    }

    pub async fn reply_reports(&self, reply_id: i64) -> Result<Vec<Report>, ClientError> {
        self.reports_by("reply", reply_id.to_string()).await
    }

    async fn reports_by(&self, key: &str, value: String) -> Result<Vec<Report>, ClientError> {
        self.execute_list(ApiRequest::get("/reports/").query([(key, value)]))
            .await
    }

    pub async fn report(&self, id: i64) -> Result<Report, ClientError> {
        self.execute(ApiRequest::get(format!("/reports/{id}/")))
            .await
    }

    pub async fn update_report(&self, id: i64, reason: impl Into<String>) -> Result<Report, ClientError> {
        let request = ApiRequest::patch(format!("/reports/{id}/")).json(&ReportUpdate {
            reason: reason.into(),
        })?;
        self.execute(request).await
    }

    pub async fn delete_report(&self, id: i64) -> Result<(), ClientError> {
        self.execute_empty(ApiRequest::delete(format!("/reports/{id}/")))
            .await
    }
}
