//! Public endpoints and session lifecycle
//!
//! None of these attach a bearer token, and none of them take part in the
//! refresh protocol.

use super::{ApiRequest, ClientError, PlumbClient};
use crate::types::{
    AuthTokens, ListPayload, Location, LoginRequest, MessageResponse, PasswordResetConfirm,
    PasswordResetRequest, RegisterRequest, User,
};

impl PlumbClient {
    /// Sign in and persist the issued tokens and the caller's profile
    pub async fn login(
        &self,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<User, ClientError> {
        let request = ApiRequest::post("/token/").json(&LoginRequest {
            email: email.into(),
            password: password.into(),
        })?;
        let tokens: AuthTokens = self.execute_public(request).await?;

        let storage = self.storage();
        storage.store_tokens(&tokens.access, Some(&tokens.refresh))?;

        let user = self.current_user().await?;
        storage.store_user(&user)?;
        info!(user_id = user.id, role = ?user.role, "Signed in");
        Ok(user)
    }

    /// Forget the session locally; the backend keeps no session to end
    pub fn logout(&self) -> Result<(), ClientError> {
        self.storage().clear()?;
        info!("Signed out");
        Ok(())
    }

    pub async fn register(&self, registration: &RegisterRequest) -> Result<User, ClientError> {
        let request = ApiRequest::post("/users/").json(registration)?;
        self.execute_public(request).await
    }

    pub async fn locations(&self) -> Result<Vec<Location>, ClientError> {
        let payload: ListPayload<Location> =
            self.execute_public(ApiRequest::get("/locations/")).await?;
        Ok(payload.into_vec())
    }

    /// Plumbers listed publicly on the marketplace
    pub async fn plumbers(&self) -> Result<Vec<User>, ClientError> {
        let payload: ListPayload<User> =
            self.execute_public(ApiRequest::get("/users/plumbers/")).await?;
        Ok(payload.into_vec())
    }

    pub async fn request_password_reset(
        &self,
        email: impl Into<String>,
    ) -> Result<MessageResponse, ClientError> {
        let request = ApiRequest::post("/password-reset/").json(&PasswordResetRequest {
            email: email.into(),
        })?;
        self.execute_public(request).await
    }

    pub async fn confirm_password_reset(
        &self,
        confirm: &PasswordResetConfirm,
    ) -> Result<MessageResponse, ClientError> {
        let request = ApiRequest::post("/password-reset/confirm/").json(confirm)?;
        self.execute_public(request).await
    }

    /// Follow the activation link mailed on registration
    pub async fn activate_account(
        &self,
        uidb64: &str,
        token: &str,
    ) -> Result<MessageResponse, ClientError> {
        self.execute_public(ApiRequest::get(format!("/activate/{uidb64}/{token}/")))
            .await
    }
}
