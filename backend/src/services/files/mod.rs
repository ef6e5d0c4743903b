//! Routes under `/api/sharepoint/files`: moving drive items between folders
//! and uploading file content, either as base64 inside JSON or as a
//! `multipart/form-data` form.

mod move_file;
mod upload;

use actix_web::web::{post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/sharepoint/files";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/move", post().to(move_file::process))
        .route("/upload", post().to(upload::process_json))
        // Multipart upload: `path` text field first, then `file`.
        .route("/upload_form", post().to(upload::process_form))
}
