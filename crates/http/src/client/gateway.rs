//! Authenticated request gateway
//!
//! Attaches the stored bearer token to a request and, when the backend
//! answers 401, obtains a new access token exactly once per failure episode
//! before replaying the request. Callers that hit a 401 while a refresh is
//! running are queued and replayed after it settles.

use futures::future::BoxFuture;
use reqwest::{Response, StatusCode, header};
use serde_json::Value;

use super::error::{RefreshError, extract_message};
use super::refresh::Claim;
use super::{ApiRequest, ClientError, PlumbClient};
use crate::types::{RefreshRequest, RefreshResponse};

const TOKEN_REFRESH_PATH: &str = "/token/refresh/";

impl PlumbClient {
    /// Send `request` with the stored access token
    ///
    /// Fails with [`ClientError::Unauthenticated`] without touching the
    /// network when no token is stored. Any response other than 401 is
    /// returned as is; a 401 goes through the refresh protocol and the
    /// request is retried with the new token. If the refresh fails the
    /// session is cleared, the navigator is sent to the login path and the
    /// call fails with [`ClientError::RefreshFailed`].
    pub fn send<'a>(&'a self, request: &'a ApiRequest) -> BoxFuture<'a, Result<Response, ClientError>> {
        Box::pin(async move {
            let token = self
                .inner
                .storage
                .access_token()
                .ok_or(ClientError::Unauthenticated)?;

            let response = self.dispatch(request, Some(&token)).await?;
            if response.status() != StatusCode::UNAUTHORIZED {
                return Ok(response);
            }

            debug!(method = %request.method(), path = request.path(), "Access token rejected");

            match self.inner.refresh.claim(&token) {
                Claim::Lead(ticket) => {
                    let outcome = self.refresh_access_token().await;
                    ticket.settle(outcome.clone());
                    let token = outcome?;
                    self.dispatch(request, Some(&token)).await
                }
                Claim::Wait(settled) => match settled.await.unwrap_or(Err(RefreshError::Abandoned)) {
                    // Re-enter with whatever token is stored now
                    Ok(_) | Err(RefreshError::Abandoned) => self.send(request).await,
                    Err(err) => Err(err.into()),
                },
                Claim::Settled(Ok(_)) => match self.inner.storage.access_token() {
                    Some(current) if current != token => self.dispatch(request, Some(&current)).await,
                    Some(_) => Ok(response),
                    None => Err(ClientError::Unauthenticated),
                },
                Claim::Settled(Err(err)) => Err(err.into()),
            }
        })
    }

    /// Issue one HTTP exchange, with a bearer token when one is given
    pub(crate) async fn dispatch(
        &self,
        request: &ApiRequest,
        token: Option<&str>,
    ) -> Result<Response, ClientError> {
        let mut builder = request.build(&self.inner.http, &self.inner.base_url)?;
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        debug!(method = %request.method(), path = request.path(), authenticated = token.is_some(), "Sending request");
        Ok(builder.send().await?)
    }

    /// Exchange the stored refresh token for a new access token
    ///
    /// On failure the session is ended before the error is returned.
    async fn refresh_access_token(&self) -> Result<String, RefreshError> {
        let outcome = self.request_new_tokens().await;
        match &outcome {
            Ok(_) => info!("Access token refreshed"),
            Err(err) => {
                warn!("Token refresh failed: {err}");
                self.end_session();
            }
        }
        outcome
    }

    async fn request_new_tokens(&self) -> Result<String, RefreshError> {
        let storage = &self.inner.storage;
        let refresh = storage
            .refresh_token()
            .ok_or(RefreshError::MissingRefreshToken)?;

        let response = self
            .inner
            .http
            .post(format!("{}{TOKEN_REFRESH_PATH}", self.inner.base_url))
            .json(&RefreshRequest { refresh })
            .send()
            .await
            .map_err(|err| RefreshError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .as_ref()
                .and_then(extract_message)
                .unwrap_or_else(|| status.to_string());
            return Err(RefreshError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let tokens: RefreshResponse = response
            .json()
            .await
            .map_err(|err| RefreshError::InvalidResponse(err.to_string()))?;

        storage
            .store_tokens(&tokens.access, tokens.refresh.as_deref())
            .map_err(|err| RefreshError::Storage(err.to_string()))?;

        Ok(tokens.access)
    }

    /// Drop every stored credential and send the session to the login path
    pub(crate) fn end_session(&self) {
        if let Err(err) = self.inner.storage.clear() {
            error!("Failed to clear session storage: {err}");
        }
        self.inner.navigator.navigate(&self.inner.login_path);
    }
}
