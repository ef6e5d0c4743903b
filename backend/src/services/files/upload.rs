//! File upload to a drive path.
//!
//! The content type sent to Graph is, in order: the one the caller supplied,
//! one guessed from the file name, or `application/octet-stream`.

use crate::auth::Caller;
use crate::error::ServiceError;
use crate::state::AppState;
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use common::requests::UploadFileRequest;
use futures_util::StreamExt;
use log::info;

/// Handler for `POST /api/sharepoint/files/upload` (JSON, base64 content).
pub(crate) async fn process_json(
    caller: Caller,
    state: web::Data<AppState>,
    payload: web::Json<UploadFileRequest>,
) -> Result<HttpResponse, ServiceError> {
    let UploadFileRequest {
        path,
        content_base64,
        content_type,
    } = payload.into_inner();
    let bytes = STANDARD
        .decode(content_base64.trim())
        .map_err(|e| ServiceError::validation(format!("contentBase64 is not valid base64: {e}")))?;
    upload(&caller, &state, &path, bytes, content_type).await
}

/// Handler for `POST /api/sharepoint/files/upload_form` (multipart).
///
/// Only the `path` and `file` fields are buffered, and together they may not
/// exceed `server.upload_limit` bytes. Other fields are drained and dropped.
pub(crate) async fn process_form(
    caller: Caller,
    state: web::Data<AppState>,
    mut payload: Multipart,
) -> Result<HttpResponse, ServiceError> {
    let limit = state.config.server.upload_limit;
    let mut buffered = 0usize;
    let mut target: Option<String> = None;
    let mut file: Option<(Vec<u8>, Option<String>)> = None;

    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| ServiceError::validation(format!("invalid multipart body: {e}")))?;
        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(|n| n.to_string()));
        let keep = matches!(name.as_deref(), Some("path") | Some("file"));

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk =
                chunk.map_err(|e| ServiceError::validation(format!("invalid multipart body: {e}")))?;
            if !keep {
                continue;
            }
            buffered = buffered.saturating_add(chunk.len());
            if buffered > limit {
                return Err(ServiceError::validation(format!(
                    "multipart upload exceeds {limit} bytes"
                )));
            }
            bytes.extend_from_slice(&chunk);
        }

        match name.as_deref() {
            Some("path") => {
                let value = String::from_utf8(bytes)
                    .map_err(|_| ServiceError::validation("path is not valid UTF-8"))?;
                target = Some(value);
            }
            Some("file") => {
                let declared = field
                    .content_type()
                    .map(|m| m.essence_str().to_string())
                    .filter(|m| m != "application/octet-stream");
                file = Some((bytes, declared));
            }
            _ => {}
        }
    }

    let path = target.ok_or_else(|| ServiceError::validation("missing `path` field"))?;
    let (bytes, content_type) = file.ok_or_else(|| ServiceError::validation("missing `file` field"))?;
    upload(&caller, &state, &path, bytes, content_type).await
}

async fn upload(
    caller: &Caller,
    state: &AppState,
    path: &str,
    bytes: Vec<u8>,
    content_type: Option<String>,
) -> Result<HttpResponse, ServiceError> {
    let path = path.trim().trim_matches('/');
    if path.is_empty() {
        return Err(ServiceError::validation("path is required"));
    }
    let content_type = resolve_content_type(path, content_type);

    info!("{} uploads {} bytes to `{}`", caller.email, bytes.len(), path);
    let token = state.tokens.access_token().await?;
    let item = state
        .drive
        .upload_content(&token, path, bytes, content_type.as_deref())
        .await?;
    Ok(HttpResponse::Ok().json(item))
}

/// Supplied type if any, else a guess from the extension of `path`.
fn resolve_content_type(path: &str, supplied: Option<String>) -> Option<String> {
    supplied
        .filter(|t| !t.trim().is_empty())
        .or_else(|| mime_guess::from_path(path).first().map(|m| m.to_string()))
}
