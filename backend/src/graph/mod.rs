//! Microsoft Graph access: the client-credentials token provider and the
//! drive operations the provisioning core and the file services build on.

pub mod drive;
pub mod path;
pub mod token;

pub use drive::{CreateFolderOutcome, DriveClient};
pub use token::{CachedTokenProvider, ClientCredentialsProvider, TokenProvider};

use crate::config::GraphConfig;
use crate::error::ServiceError;
use std::time::Duration;

/// Builds the HTTP client shared by every Graph call. A timeout is applied
/// only when `graph.timeout_secs` is configured.
pub fn http_client(config: &GraphConfig) -> Result<reqwest::Client, ServiceError> {
    let mut builder = reqwest::Client::builder();
    if let Some(secs) = config.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder
        .build()
        .map_err(|e| ServiceError::configuration(format!("failed to build HTTP client: {e}")))
}
