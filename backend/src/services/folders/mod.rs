//! # SharePoint Folder Service Module
//!
//! Routes under `/api/sharepoint/folders`. The provisioning logic itself
//! lives in `provision` (per-case folder trees and the recursive copier) and
//! `bootstrap` (the one-shot per-surveyor template setup).

pub mod bootstrap;
mod list;
pub mod provision;

use actix_web::web::{post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/sharepoint/folders";

/// Configures and returns the Actix `Scope` for the folder routes.
///
/// # Registered Routes:
///
/// *   **`POST /provision`**: ensures the folder tree of one dossier exists.
///     Body `{"surveyor": "...", "caseNumber": "..."}`, answers a
///     `ProvisionOutcome`.
///
/// *   **`POST /bootstrap`**: admin only. Clones the master surveyor's
///     template into every surveyor that lacks one and answers a
///     `BootstrapReport`.
///
/// *   **`POST /list`**: immediate children of `{"path": "..."}`.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/provision", post().to(provision::process))
        .route("/bootstrap", post().to(bootstrap::process))
        .route("/list", post().to(list::process))
}
