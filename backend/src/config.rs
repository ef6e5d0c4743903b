//! # Application Configuration
//!
//! Everything the service needs to reach Microsoft Graph and to namespace the
//! dossier folders is read from a TOML file at start-up and passed down to
//! the components that use it. Nothing is compiled in.
//!
//! The file path comes from `DOSSIER_CONFIG` (default `dossier.toml`). Secrets
//! can be left out of the file and supplied through the environment instead:
//!
//! - `GRAPH_TENANT_ID`, `GRAPH_CLIENT_ID`, `GRAPH_CLIENT_SECRET`
//! - `GOOGLE_MAPS_API_KEY`
//!
//! A minimal file:
//!
//! ```toml
//! [graph]
//! drive_id = "b!abc"
//! site_id = "contoso.sharepoint.com,1,2"
//!
//! [provisioning]
//! master = "Samuel Guay"
//!
//! [[surveyors]]
//! name = "Samuel Guay"
//! initials = "SG"
//!
//! [[users]]
//! token = "front-end-token"
//! email = "bureau@example.com"
//! admin = true
//! ```

use crate::error::ServiceError;
use common::model::surveyor::SurveyorTable;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

pub const CONFIG_PATH_ENV: &str = "DOSSIER_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "dossier.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub graph: GraphConfig,
    #[serde(default)]
    pub provisioning: ProvisioningConfig,
    #[serde(default)]
    pub surveyors: SurveyorTable,
    #[serde(default)]
    pub users: Vec<UserEntry>,
    #[serde(default)]
    pub maps: MapsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Upper bound on JSON bodies; uploads travel base64-encoded.
    #[serde(default = "default_json_limit")]
    pub json_limit: usize,
    /// Upper bound on the buffered fields of a multipart upload.
    #[serde(default = "default_upload_limit")]
    pub upload_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            json_limit: default_json_limit(),
            upload_limit: default_upload_limit(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphConfig {
    #[serde(default)]
    pub tenant_id: String,
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    pub drive_id: String,
    #[serde(default)]
    pub site_id: String,
    #[serde(default = "default_login_base")]
    pub login_base: String,
    #[serde(default = "default_graph_base")]
    pub graph_base: String,
    #[serde(default = "default_scope")]
    pub scope: String,
    /// Reuse a token until shortly before it expires instead of
    /// authenticating on every request.
    #[serde(default)]
    pub cache_tokens: bool,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProvisioningConfig {
    #[serde(default = "default_root")]
    pub root: String,
    #[serde(default = "default_dossier_dir")]
    pub dossier_dir: String,
    #[serde(default = "default_skeleton")]
    pub skeleton: Vec<String>,
    /// Full name of the surveyor whose template seeds everyone else's.
    #[serde(default)]
    pub master: String,
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for ProvisioningConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            dossier_dir: default_dossier_dir(),
            skeleton: default_skeleton(),
            master: String::new(),
            max_depth: default_max_depth(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserEntry {
    pub token: String,
    pub email: String,
    #[serde(default)]
    pub admin: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MapsConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_maps_base")]
    pub base: String,
}

impl Default for MapsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base: default_maps_base(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_json_limit() -> usize {
    10 * 1024 * 1024
}

fn default_upload_limit() -> usize {
    25 * 1024 * 1024
}

fn default_login_base() -> String {
    "https://login.microsoftonline.com".to_string()
}

fn default_graph_base() -> String {
    "https://graph.microsoft.com/v1.0".to_string()
}

fn default_scope() -> String {
    "https://graph.microsoft.com/.default".to_string()
}

fn default_root() -> String {
    "ARPENTEUR".to_string()
}

fn default_dossier_dir() -> String {
    "DOSSIER".to_string()
}

fn default_skeleton() -> Vec<String> {
    ["INTRANTS", "RESULTATS", "FACTURES"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_max_depth() -> usize {
    20
}

fn default_maps_base() -> String {
    "https://maps.googleapis.com/maps/api".to_string()
}

impl AppConfig {
    /// Loads the file named by `DOSSIER_CONFIG`, applies environment
    /// overrides and validates the result.
    pub fn load() -> Result<Self, ServiceError> {
        let path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut config = Self::from_file(Path::new(&path))?;
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ServiceError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ServiceError::configuration(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ServiceError> {
        toml::from_str(raw).map_err(|e| ServiceError::configuration(e.to_string()))
    }

    /// Overrides secrets with the values `lookup` returns for the known
    /// environment keys. Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(v) = get("GRAPH_TENANT_ID") {
            self.graph.tenant_id = v;
        }
        if let Some(v) = get("GRAPH_CLIENT_ID") {
            self.graph.client_id = v;
        }
        if let Some(v) = get("GRAPH_CLIENT_SECRET") {
            self.graph.client_secret = v;
        }
        if let Some(v) = get("GOOGLE_MAPS_API_KEY") {
            self.maps.api_key = Some(v);
        }
    }

    pub fn validate(&self) -> Result<(), ServiceError> {
        let required = [
            ("graph.tenant_id", &self.graph.tenant_id),
            ("graph.client_id", &self.graph.client_id),
            ("graph.client_secret", &self.graph.client_secret),
            ("graph.drive_id", &self.graph.drive_id),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(ServiceError::configuration(format!("{key} must be set")));
            }
        }

        if self.provisioning.max_depth == 0 {
            return Err(ServiceError::configuration(
                "provisioning.max_depth must be greater than zero",
            ));
        }

        let mut names = HashSet::new();
        let mut initials = HashSet::new();
        for surveyor in self.surveyors.iter() {
            if surveyor.name.is_empty() || surveyor.name.trim() != surveyor.name {
                return Err(ServiceError::configuration(format!(
                    "surveyor name `{}` is empty or has surrounding whitespace",
                    surveyor.name
                )));
            }
            if surveyor.initials.trim().is_empty() || surveyor.initials.contains('/') {
                return Err(ServiceError::configuration(format!(
                    "invalid initials for surveyor `{}`",
                    surveyor.name
                )));
            }
            if !names.insert(surveyor.name.as_str()) {
                return Err(ServiceError::configuration(format!(
                    "surveyor `{}` is listed twice",
                    surveyor.name
                )));
            }
            if !initials.insert(surveyor.initials.as_str()) {
                return Err(ServiceError::configuration(format!(
                    "initials `{}` are used twice",
                    surveyor.initials
                )));
            }
        }

        if self.surveyors.find(&self.provisioning.master).is_none() {
            return Err(ServiceError::configuration(format!(
                "master surveyor `{}` is not in the surveyor table",
                self.provisioning.master
            )));
        }

        Ok(())
    }
}
