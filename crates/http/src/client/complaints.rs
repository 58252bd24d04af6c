//! Complaints filed between users

use super::{ApiRequest, ClientError, PlumbClient};
use crate::types::{Complaint, ComplaintFilter, ComplaintStats, ComplaintUpdate, NewComplaint};

impl PlumbClient {
    pub async fn complaints(&self, filter: &ComplaintFilter) -> Result<Vec<Complaint>, ClientError> {
        let request = ApiRequest::get("/complaints/").query(filter.query());
        self.execute_list(request).await
    }

    pub async fn complaint(&self, id: i64) -> Result<Complaint, ClientError> {
        self.execute(ApiRequest::get(format!("/complaints/{id}/")))
            .await
    }

    pub async fn create_complaint(&self, complaint: &NewComplaint) -> Result<Complaint, ClientError> {
        self.execute(ApiRequest::post("/complaints/").json(complaint)?)
            .await
    }

    pub async fn update_complaint(
        &self,
        id: i64,
        update: &ComplaintUpdate,
    ) -> Result<Complaint, ClientError> {
        let request = ApiRequest::patch(format!("/complaints/{id}/")).json(update)?;
        self.execute(request).await
    }

    pub async fn delete_complaint(&self, id: i64) -> Result<(), ClientError> {
        self.execute_empty(ApiRequest::delete(format!("/complaints/{id}/")))
            .await
    }

    /// Global counters for admins, filed/received counters for everyone else
    pub async fn complaint_stats(&self) -> Result<ComplaintStats, ClientError> {
        self.execute(ApiRequest::get("/complaints/stats/"))
            .await
    }
}
