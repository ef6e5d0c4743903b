//! Microsoft Graph drive-item payloads, decoded once at the HTTP boundary.
//!
//! Only the fields the backend reads are modelled; serde ignores the rest.
//! See <https://learn.microsoft.com/graph/api/resources/driveitem>.

use serde::{Deserialize, Serialize};

/// Graph error code returned when a create with conflict behavior `fail`
/// hits an existing name.
pub const NAME_ALREADY_EXISTS: &str = "nameAlreadyExists";

/// Marker facet: present only on folders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderFacet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_count: Option<u64>,
}

/// Marker facet: present only on files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileFacet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveItem {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<FolderFacet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<FileFacet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_url: Option<String>,
}

impl DriveItem {
    pub fn is_folder(&self) -> bool {
        self.folder.is_some()
    }
}

/// Body of `GET .../children`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FolderListing {
    #[serde(default)]
    pub value: Vec<DriveItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphErrorDetail {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

/// Body Graph sends with any non-2xx answer.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphErrorBody {
    pub error: GraphErrorDetail,
}

impl GraphErrorBody {
    pub fn is_name_conflict(&self) -> bool {
        self.error.code == NAME_ALREADY_EXISTS
    }
}
