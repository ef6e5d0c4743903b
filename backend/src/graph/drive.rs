//! Drive operations against one SharePoint document library.
//!
//! Reads are forgiving: an existence probe that fails for any reason answers
//! "does not exist", and a listing that fails answers "no children". Writes
//! propagate their failures, except a folder creation that hits an existing
//! name, which is reported as [`CreateFolderOutcome::AlreadyExisted`].

use crate::config::GraphConfig;
use crate::error::ServiceError;
use crate::graph::path;
use common::model::drive_item::{DriveItem, FolderListing, GraphErrorBody};
use log::{debug, info, warn};
use reqwest::{header, Client, Response};
use serde_json::json;

pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateFolderOutcome {
    Created,
    AlreadyExisted,
}

impl CreateFolderOutcome {
    pub fn created(self) -> bool {
        self == CreateFolderOutcome::Created
    }

    pub fn already_existed(self) -> bool {
        self == CreateFolderOutcome::AlreadyExisted
    }
}

#[derive(Clone)]
pub struct DriveClient {
    http: Client,
    graph_base: String,
    drive_id: String,
    site_id: String,
}

impl DriveClient {
    pub fn new(http: Client, config: &GraphConfig) -> Self {
        Self {
            http,
            graph_base: config.graph_base.trim_end_matches('/').to_string(),
            drive_id: config.drive_id.clone(),
            site_id: config.site_id.clone(),
        }
    }

    pub fn drive_id(&self) -> &str {
        &self.drive_id
    }

    fn item_url(&self, item_path: &str) -> String {
        let item_path = path::normalize(item_path);
        if item_path.is_empty() {
            format!("{}/drives/{}/root", self.graph_base, self.drive_id)
        } else {
            format!(
                "{}/drives/{}/root:/{}",
                self.graph_base,
                self.drive_id,
                path::encode(item_path)
            )
        }
    }

    fn children_url(&self, parent: &str) -> String {
        let parent = path::normalize(parent);
        if parent.is_empty() {
            format!("{}/drives/{}/root/children", self.graph_base, self.drive_id)
        } else {
            format!("{}:/children", self.item_url(parent))
        }
    }

    /// True iff a metadata GET on `item_path` answers 2xx.
    pub async fn folder_exists(&self, token: &str, item_path: &str) -> bool {
        let result = self
            .http
            .get(self.item_url(item_path))
            .bearer_auth(token)
            .send()
            .await;
        let exists = matches!(&result, Ok(r) if r.status().is_success());
        debug!("exists `{}`: {}", item_path, exists);
        exists
    }

    /// Immediate children of `item_path`, files and folders alike. Any failure
    /// yields an empty list.
    pub async fn list_children(&self, token: &str, item_path: &str) -> Vec<DriveItem> {
        let response = match self
            .http
            .get(self.children_url(item_path))
            .bearer_auth(token)
            .send()
            .await
        {
            Ok(r) if r.status().is_success() => r,
            Ok(r) => {
                warn!("listing `{}` returned {}", item_path, r.status());
                return Vec::new();
            }
            Err(e) => {
                warn!("listing `{}` failed: {}", item_path, e);
                return Vec::new();
            }
        };

        match response.json::<FolderListing>().await {
            Ok(listing) => {
                debug!("listed `{}`: {} entries", item_path, listing.value.len());
                listing.value
            }
            Err(e) => {
                warn!("listing `{}` returned an unreadable body: {}", item_path, e);
                Vec::new()
            }
        }
    }

    /// Creates `parent/name` with conflict behavior `fail`.
    pub async fn create_folder(
        &self,
        token: &str,
        parent: &str,
        name: &str,
    ) -> Result<CreateFolderOutcome, ServiceError> {
        let full_path = path::join(parent, name);
        let body = json!({
            "name": name,
            "folder": {},
            "@microsoft.graph.conflictBehavior": "fail",
        });
        let response = self
            .http
            .post(self.children_url(parent))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| ServiceError::FolderCreate {
                path: full_path.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if status.is_success() {
            info!("created folder `{}`", full_path);
            return Ok(CreateFolderOutcome::Created);
        }

        let raw = response.text().await.unwrap_or_default();
        match serde_json::from_str::<GraphErrorBody>(&raw) {
            Ok(body) if body.is_name_conflict() => {
                debug!("folder `{}` already exists", full_path);
                Ok(CreateFolderOutcome::AlreadyExisted)
            }
            Ok(body) => Err(ServiceError::FolderCreate {
                path: full_path,
                reason: format!("{} {}: {}", status.as_u16(), body.error.code, body.error.message),
            }),
            Err(_) => Err(ServiceError::FolderCreate {
                path: full_path,
                reason: format!("{}: {}", status.as_u16(), raw),
            }),
        }
    }

    /// Moves the item `item_id` under `destination`.
    pub async fn move_item(
        &self,
        token: &str,
        item_id: &str,
        destination: &str,
    ) -> Result<DriveItem, ServiceError> {
        let url = format!(
            "{}/sites/{}/drives/{}/items/{}",
            self.graph_base,
            self.site_id,
            self.drive_id,
            urlencoding::encode(item_id)
        );
        let body = json!({
            "parentReference": {
                "path": format!("/drives/{}/root:/{}", self.drive_id, path::normalize(destination)),
            }
        });
        let response = self
            .http
            .patch(url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;
        let item: DriveItem = decode(response).await?;
        info!("moved item `{}` to `{}`", item_id, destination);
        Ok(item)
    }

    /// Uploads `bytes` as the content of `item_path`.
    pub async fn upload_content(
        &self,
        token: &str,
        item_path: &str,
        bytes: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<DriveItem, ServiceError> {
        let url = format!("{}:/content", self.item_url(item_path));
        let size = bytes.len();
        let response = self
            .http
            .put(url)
            .bearer_auth(token)
            .header(header::CONTENT_TYPE, content_type.unwrap_or(DEFAULT_CONTENT_TYPE))
            .body(bytes)
            .send()
            .await?;
        let item: DriveItem = decode(response).await?;
        info!("uploaded {} bytes to `{}`", size, item_path);
        Ok(item)
    }
}

async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, ServiceError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(ServiceError::Upstream {
            status: status.as_u16(),
            body,
        });
    }
    serde_json::from_str(&body).map_err(|e| ServiceError::Upstream {
        status: status.as_u16(),
        body: format!("unreadable response: {e}"),
    })
}
