//! Session authentication against the platform's auth service.
//!
//! Every submission route is guarded by [`require_session`]: the bearer token
//! is introspected before the handler runs, and unauthenticated callers are
//! redirected to the auth entry point carrying the original path in `next`,
//! without touching any stored data. Resolved sessions travel to handlers as
//! an explicitly inserted [`SessionContext`] extension.

use async_trait::async_trait;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("auth service error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("auth service returned status {0}")]
    Unexpected(u16),
}

/// A resolved session, valid until `expires_at`.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionContext {
    pub username: String,
    pub expires_at: DateTime<Utc>,
}

#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Resolves a bearer token to a session. `None` means the platform
    /// considers the caller unauthenticated; `Err` means the check itself
    /// could not be performed.
    async fn authenticate(&self, token: &str) -> Result<Option<SessionContext>, AuthError>;
}

/// Token introspection against the platform auth endpoint.
pub struct PlatformAuth {
    client: reqwest::Client,
    endpoint: String,
}

impl PlatformAuth {
    pub fn new(endpoint: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("Failed to build HTTP client");
        Self { client, endpoint }
    }
}

#[async_trait]
impl Authenticator for PlatformAuth {
    async fn authenticate(&self, token: &str) -> Result<Option<SessionContext>, AuthError> {
        let response = self
            .client
            .get(format!("{}/session", self.endpoint.trim_end_matches('/')))
            .bearer_auth(token)
            .send()
            .await?;

        match response.status().as_u16() {
            200 => Ok(Some(response.json::<SessionContext>().await?)),
            401 | 403 => Ok(None),
            status => Err(AuthError::Unexpected(status)),
        }
    }
}

fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Middleware guarding the submission routes.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Owned copy so no borrow of the request is held across the await.
    let token = bearer_token(&request).map(str::to_owned);
    let session = match token {
        Some(token) => state
            .auth
            .authenticate(&token)
            .await
            .map_err(|e| AppError::Auth(e.to_string()))?,
        None => None,
    };

    match session {
        Some(session) if session.expires_at > Utc::now() => {
            debug!(user = %session.username, "session resolved");
            request.extensions_mut().insert(session);
            Ok(next.run(request).await)
        }
        _ => {
            let path = request.uri().path();
            warn!("unauthenticated request to {path}, redirecting");
            let target = format!("{}?next={path}", state.config.auth_login_url);
            Ok(Redirect::temporary(&target).into_response())
        }
    }
}
