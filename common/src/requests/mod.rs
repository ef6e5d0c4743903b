use serde::{Deserialize, Serialize};

/// Payload of `POST /api/sharepoint/folders/provision`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionFolderRequest {
    #[serde(default)]
    pub surveyor: Option<String>,
    #[serde(default)]
    pub case_number: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListFolderRequest {
    #[serde(default)]
    pub path: String,
}

/// Moves the drive item `item_id` under the folder `destination`
/// (a path relative to the drive root).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveFileRequest {
    pub item_id: String,
    pub destination: String,
}

/// Uploads `content_base64` to `path`, replacing any file already there.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadFileRequest {
    pub path: String,
    pub content_base64: String,
    #[serde(default)]
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistanceRequest {
    pub origins: String,
    pub destinations: String,
}

/// Body of every non-2xx answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
