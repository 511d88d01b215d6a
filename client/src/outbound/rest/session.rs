//! Session lookup against the hosted auth endpoint.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use super::client::{RestConfig, RestSetupError, build_client, map_status_error};
use super::dto::AuthUserDto;
use super::query::Endpoints;
use crate::domain::AuthUser;
use crate::domain::ports::{BackendError, SessionError, SessionProvider};

/// Resolves the signed-in user from the configured access token.
#[derive(Debug, Clone)]
pub struct RestSessionProvider {
    client: Client,
    endpoints: Endpoints,
    has_token: bool,
}

impl RestSessionProvider {
    /// Build a provider sharing the adapter's credentials.
    ///
    /// # Errors
    ///
    /// Returns an error when the credentials are not valid header values.
    pub fn new(config: &RestConfig) -> Result<Self, RestSetupError> {
        Ok(Self {
            client: build_client(config)?,
            endpoints: Endpoints::new(config.service_url.clone()),
            has_token: config
                .access_token
                .as_deref()
                .is_some_and(|token| !token.trim().is_empty()),
        })
    }
}

fn map_lookup_error(error: &BackendError) -> SessionError {
    SessionError::lookup(error.message())
}

/// Classify an auth endpoint failure: rejected tokens mean nobody is signed in.
fn classify_status(status: StatusCode, body: &[u8]) -> SessionError {
    if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
        SessionError::missing()
    } else {
        map_lookup_error(&map_status_error(status, body))
    }
}

#[async_trait]
impl SessionProvider for RestSessionProvider {
    async fn current_user(&self) -> Result<AuthUser, SessionError> {
        if !self.has_token {
            debug!("no access token configured");
            return Err(SessionError::missing());
        }
        let url = self
            .endpoints
            .auth_user()
            .map_err(|err| SessionError::lookup(format!("invalid service URL: {err}")))?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| SessionError::lookup(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            let error = classify_status(status, body.as_ref());
            warn!(status = status.as_u16(), %error, "session lookup rejected");
            return Err(error);
        }

        let dto: AuthUserDto = decode_user(response).await?;
        Ok(AuthUser::from(dto))
    }
}

async fn decode_user(response: reqwest::Response) -> Result<AuthUserDto, SessionError> {
    let body = response
        .bytes()
        .await
        .map_err(|err| SessionError::lookup(err.to_string()))?;
    serde_json::from_slice(body.as_ref())
        .map_err(|err| SessionError::lookup(format!("invalid user payload: {err}")))
}
