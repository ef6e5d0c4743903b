//! OAuth2 client-credentials tokens for Microsoft Graph.

use crate::config::GraphConfig;
use crate::error::ServiceError;
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{header, Client};
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Tokens are considered stale this long before their declared expiry.
const EXPIRY_SKEW: Duration = Duration::from_secs(60);
const DEFAULT_EXPIRES_IN: u64 = 3600;

/// Source of bearer tokens for Graph calls.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn access_token(&self) -> Result<String, ServiceError>;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

/// Authenticates against `{login_base}/{tenant}/oauth2/v2.0/token` on every
/// call. No caching and no retry.
pub struct ClientCredentialsProvider {
    http: Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    scope: String,
}

impl ClientCredentialsProvider {
    pub fn new(http: Client, config: &GraphConfig) -> Self {
        Self {
            http,
            token_url: format!(
                "{}/{}/oauth2/v2.0/token",
                config.login_base.trim_end_matches('/'),
                config.tenant_id
            ),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            scope: config.scope.clone(),
        }
    }

    async fn request(&self) -> Result<TokenResponse, ServiceError> {
        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("scope", self.scope.as_str()),
        ];
        let response = self
            .http
            .post(&self.token_url)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .form(&form)
            .send()
            .await
            .map_err(|e| ServiceError::Auth(e.to_string()))?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(ServiceError::Auth(format!(
                "token endpoint returned {}: {}",
                status.as_u16(),
                body
            )));
        }

        let payload: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| ServiceError::Auth(format!("invalid token response: {e}")))?;
        if payload.access_token.is_empty() {
            return Err(ServiceError::Auth(
                "missing access_token in token response".to_string(),
            ));
        }
        debug!("obtained Graph access token");
        Ok(payload)
    }
}

#[async_trait]
impl TokenProvider for ClientCredentialsProvider {
    async fn access_token(&self) -> Result<String, ServiceError> {
        self.request().await.map(|t| t.access_token)
    }
}

struct CachedToken {
    value: String,
    expires_at: Instant,
}

/// Wraps a [`ClientCredentialsProvider`] and hands out the same token until
/// shortly before its declared expiry.
pub struct CachedTokenProvider {
    inner: ClientCredentialsProvider,
    cached: Mutex<Option<CachedToken>>,
}

impl CachedTokenProvider {
    pub fn new(inner: ClientCredentialsProvider) -> Self {
        Self {
            inner,
            cached: Mutex::new(None),
        }
    }
}

#[async_trait]
impl TokenProvider for CachedTokenProvider {
    async fn access_token(&self) -> Result<String, ServiceError> {
        let mut guard = self.cached.lock().await;
        if let Some(token) = guard.as_ref() {
            if token.expires_at > Instant::now() {
                return Ok(token.value.clone());
            }
        }

        let fresh = self.inner.request().await?;
        let lifetime = Duration::from_secs(fresh.expires_in.unwrap_or(DEFAULT_EXPIRES_IN));
        match Instant::now().checked_add(lifetime.saturating_sub(EXPIRY_SKEW)) {
            Some(expires_at) => {
                *guard = Some(CachedToken {
                    value: fresh.access_token.clone(),
                    expires_at,
                });
            }
            None => {
                warn!("expires_in {:?} is out of range, token not cached", fresh.expires_in);
                *guard = None;
            }
        }
        Ok(fresh.access_token)
    }
}
