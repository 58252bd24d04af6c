//! Service requests, reviews and plumber ratings

use super::{ApiRequest, ClientError, PlumbClient};
use crate::types::{
    AcceptServiceRequest, NewServiceRequest, NewServiceReview, PlumberRating, ServiceRequest,
    ServiceReview, ServiceStatus, ServiceUpdate,
};

impl PlumbClient {
    pub async fn create_service_request(
        &self,
        request: &NewServiceRequest,
    ) -> Result<ServiceRequest, ClientError> {
        self.execute(ApiRequest::post("/services/create/").json(request)?)
            .await
    }

    /// Service requests the signed-in user sent or received
    pub async fn service_requests(&self) -> Result<Vec<ServiceRequest>, ClientError> {
        self.execute_list(ApiRequest::get("/services/list/"))
            .await
    }

    pub async fn service_request(&self, id: i64) -> Result<ServiceRequest, ClientError> {
        self.execute(ApiRequest::get(format!("/services/{id}/")))
            .await
    }

    pub async fn update_service_request(
        &self,
        id: i64,
        update: &ServiceUpdate,
    ) -> Result<ServiceRequest, ClientError> {
        let request = ApiRequest::patch(format!("/services/{id}/update/")).json(update)?;
        self.execute(request).await
    }

    /// Accept a request at `price`; plumbers only
    pub async fn accept_service_request(
        &self,
        id: i64,
        price: f64,
    ) -> Result<ServiceRequest, ClientError> {
        let request = ApiRequest::post(format!("/services/{id}/accept/"))
            .json(&AcceptServiceRequest { price })?;
        self.execute(request).await
    }

    pub async fn reject_service_request(&self, id: i64) -> Result<ServiceRequest, ClientError> {
        self.execute(ApiRequest::post(format!("/services/{id}/reject/")))
            .await
    }

    pub async fn complete_service_request(&self, id: i64) -> Result<ServiceRequest, ClientError> {
        let update = ServiceUpdate {
            status: ServiceStatus::Completed,
            price: None,
        };
        self.update_service_request(id, &update).await
    }

    pub async fn create_review(&self, review: &NewServiceReview) -> Result<ServiceReview, ClientError> {
        self.execute(ApiRequest::post("/services/reviews/create/").json(review)?)
            .await
    }

    pub async fn plumber_reviews(&self, plumber_id: i64) -> Result<Vec<ServiceReview>, ClientError> {
        self.execute_list(ApiRequest::get(format!(
            "/services/plumber/{plumber_id}/reviews/"
        )))
        .await
    }

    pub async fn plumber_rating(&self, plumber_id: i64) -> Result<PlumberRating, ClientError> {
        self.execute(ApiRequest::get(format!(
            "/services/plumber/{plumber_id}/rating/"
        )))
        .await
    }

    pub async fn reviews(&self) -> Result<Vec<ServiceReview>, ClientError> {
        self.execute_list(ApiRequest::get("/reviews/")).await
    }
}
