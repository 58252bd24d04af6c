//! Community posts, comments and replies

use reqwest::StatusCode;

use super::request::FormBuilder;
use super::{ApiRequest, ClientError, FormField, PlumbClient};
use crate::types::{Comment, LikeState, NewComment, NewPost, NewReply, Post, Reply};

fn post_fields(post: &NewPost) -> Vec<FormField> {
    FormBuilder::default()
        .text("statement", &post.statement)
        .file("image", post.image.as_ref())
        .finish()
}

impl PlumbClient {
    pub async fn posts(&self) -> Result<Vec<Post>, ClientError> {
        self.execute_list(ApiRequest::get("/posts/")).await
    }

    pub async fn post(&self, id: i64) -> Result<Post, ClientError> {
        self.execute(ApiRequest::get(format!("/posts/{id}/"))).await
    }

    pub async fn create_post(&self, post: &NewPost) -> Result<Post, ClientError> {
        let request = ApiRequest::post("/posts/").multipart(post_fields(post));
        self.execute(request).await
    }

    pub async fn update_post(&self, id: i64, post: &NewPost) -> Result<Post, ClientError> {
        let request = ApiRequest::patch(format!("/posts/{id}/")).multipart(post_fields(post));
        self.execute(request).await
    }

    pub async fn delete_post(&self, id: i64) -> Result<(), ClientError> {
        self.execute_empty(ApiRequest::delete(format!("/posts/{id}/")))
            .await
    }

    /// Like or unlike a post; the backend answers 201 or 204 with no body
    pub async fn toggle_like(&self, id: i64) -> Result<LikeState, ClientError> {
        let status = self
            .execute_status(ApiRequest::post(format!("/posts/{id}/like/")))
            .await?;
        Ok(if status == StatusCode::CREATED {
            LikeState::Liked
        } else {
            LikeState::Unliked
        })
    }

    pub async fn comments(&self, post_id: i64) -> Result<Vec<Comment>, ClientError> {
        let request = ApiRequest::get("/comments/").query([("post", post_id.to_string())]);
        self.execute_list(request).await
    }

    pub async fn create_comment(&self, comment: &NewComment) -> Result<Comment, ClientError> {
        self.execute(ApiRequest::post("/comments/").json(comment)?)
            .await
    }

    pub async fn update_comment(&self, id: i64, text: &str) -> Result<Comment, ClientError> {
        let request = ApiRequest::patch(format!("/comments/{id}/"))
            .json(&serde_json::json!({ "comment": text }))?;
        self.execute(request).await
    }

    pub async fn delete_comment(&self, id: i64) -> Result<(), ClientError> {
        self.execute_empty(ApiRequest::delete(format!("/comments/{id}/")))
            .await
    }

    pub async fn replies(&self, comment_id: i64) -> Result<Vec<Reply>, ClientError> {
        let request = ApiRequest::get("/replies/").query([("comment", comment_id.to_string())]);
        self.execute_list(request).await
    }

    pub async fn create_reply(&self, reply: &NewReply) -> Result<Reply, ClientError> {
        self.execute(ApiRequest::post("/replies/").json(reply)?)
            .await
    }

    pub async fn update_reply(&self, id: i64, text: &str) -> Result<Reply, ClientError> {
        let request = ApiRequest::patch(format!("/replies/{id}/"))
            .json(&serde_json::json!({ "reply": text }))?;
        self.execute(request).await
    }

    pub async fn delete_reply(&self, id: i64) -> Result<(), ClientError> {
        self.execute_empty(ApiRequest::delete(format!("/replies/{id}/")))
            .await
    }
}
