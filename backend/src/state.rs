//! Shared application state, built once in `main.rs` and handed to every
//! handler as `web::Data<AppState>`.

use crate::config::AppConfig;
use crate::error::ServiceError;
use crate::graph::{
    self, CachedTokenProvider, ClientCredentialsProvider, DriveClient, TokenProvider,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub drive: DriveClient,
    pub tokens: Arc<dyn TokenProvider>,
    /// Client for the non-Graph proxies.
    pub http: reqwest::Client,
}

impl AppState {
    /// Wires the Graph clients described by `config`.
    pub fn from_config(config: AppConfig) -> Result<Self, ServiceError> {
        let http = graph::http_client(&config.graph)?;
        let provider = ClientCredentialsProvider::new(http.clone(), &config.graph);
        let tokens: Arc<dyn TokenProvider> = if config.graph.cache_tokens {
            Arc::new(CachedTokenProvider::new(provider))
        } else {
            Arc::new(provider)
        };
        let drive = DriveClient::new(http.clone(), &config.graph);
        Ok(Self::new(config, drive, tokens, http))
    }

    pub fn new(
        config: AppConfig,
        drive: DriveClient,
        tokens: Arc<dyn TokenProvider>,
        http: reqwest::Client,
    ) -> Self {
        Self {
            config: Arc::new(config),
            drive,
            tokens,
            http,
        }
    }
}
