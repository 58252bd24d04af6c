//! Profile endpoints

use std::time::Duration;

use super::request::FormBuilder;
use super::{ApiRequest, ClientError, PlumbClient};
use crate::types::{PasswordChange, ProfileUpdate, User, UserOption};

/// How long a password change may take before it is reported as timed out
pub const PASSWORD_CHANGE_TIMEOUT: Duration = Duration::from_secs(5);

impl PlumbClient {
    /// Profile of the signed-in user
    pub async fn current_user(&self) -> Result<User, ClientError> {
        self.execute(ApiRequest::get("/users/me/")).await
    }

    /// Update the signed-in user's profile and refresh the cached copy
    ///
    /// Sent as multipart when a new image is attached, JSON otherwise.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ClientError> {
        let request = ApiRequest::patch("/users/me/");
        let request = if update.image.is_some() {
            request.multipart(
                FormBuilder::default()
                    .opt_text("name", update.name.as_deref())
                    .opt_text("phone", update.phone.as_deref())
                    .opt_text("location_id", update.location_id)
                    .file("image", update.image.as_ref())
                    .finish(),
            )
        } else {
            let mut body = serde_json::Map::new();
            if let Some(name) = &update.name {
                body.insert("name".into(), name.clone().into());
            }
            if let Some(phone) = &update.phone {
                body.insert("phone".into(), phone.clone().into());
            }
            if let Some(location_id) = update.location_id {
                body.insert("location_id".into(), location_id.into());
            }
            request.json(&body)?
        };

        let user: User = self.execute(request).await?;
        self.storage().store_user(&user)?;
        Ok(user)
    }

    /// Change the signed-in user's password
    ///
    /// Fails with [`ClientError::Timeout`] if the backend does not answer
    /// within [`PASSWORD_CHANGE_TIMEOUT`].
    pub async fn change_password(&self, change: &PasswordChange) -> Result<(), ClientError> {
        let request = ApiRequest::patch("/users/me/").json(change)?;
        tokio::time::timeout(PASSWORD_CHANGE_TIMEOUT, self.execute_empty(request))
            .await
            .map_err(|_| ClientError::Timeout(PASSWORD_CHANGE_TIMEOUT))?
    }

    pub async fn user(&self, id: i64) -> Result<User, ClientError> {
        self.execute(ApiRequest::get(format!("/users/{id}/"))).await
    }

    /// Active accounts a complaint can be filed against
    pub async fn complaint_targets(&self) -> Result<Vec<UserOption>, ClientError> {
        let users: Vec<UserOption> = self.execute_list(ApiRequest::get("/users/")).await?;
        Ok(users
            .into_iter()
            .filter(|user| user.status.as_deref() == Some("active"))
            .collect())
    }
}
