//! Knowledge-base articles

use super::request::FormBuilder;
use super::{ApiRequest, ClientError, FormField, PlumbClient};
use crate::types::{Article, ArticleApproval, ArticleDraft};

fn draft_fields(draft: &ArticleDraft) -> Vec<FormField> {
    FormBuilder::default()
        .opt_text("title", draft.title.as_deref())
        .opt_text("description", draft.description.as_deref())
        .file("image", draft.image.as_ref())
        .finish()
}

impl PlumbClient {
    pub async fn articles(&self) -> Result<Vec<Article>, ClientError> {
        self.execute_list(ApiRequest::get("/articles/")).await
    }

    pub async fn article(&self, id: i64) -> Result<Article, ClientError> {
        self.execute(ApiRequest::get(format!("/articles/{id}/")))
            .await
    }

    /// Submit an article for moderation
    pub async fn create_article(&self, draft: &ArticleDraft) -> Result<Article, ClientError> {
        if draft.title.is_none() || draft.description.is_none() {
            return Err(ClientError::BadRequest {
                message: "title and description are required".into(),
                errors: None,
            });
        }
        let request = ApiRequest::post("/articles/").multipart(draft_fields(draft));
        self.execute(request).await
    }

    pub async fn update_article(
        &self,
        id: i64,
        draft: &ArticleDraft,
    ) -> Result<Article, ClientError> {
        let request = ApiRequest::patch(format!("/articles/{id}/")).multipart(draft_fields(draft));
        self.execute(request).await
    }

    pub async fn delete_article(&self, id: i64) -> Result<(), ClientError> {
        self.execute_empty(ApiRequest::delete(format!("/articles/{id}/")))
            .await
    }

    /// Publish or withdraw an article; admins only
    pub async fn approve_article(&self, id: i64, approved: bool) -> Result<Article, ClientError> {
        let request = ApiRequest::patch(format!("/articles/{id}/approve/")).json(&ArticleApproval {
            is_approved: approved,
        })?;
        self.execute(request).await
    }
}
