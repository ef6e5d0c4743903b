//! # Dossier Folder Provisioning
//!
//! Ensures that the SharePoint folder tree of a dossier exists. A dossier is
//! identified by its surveyor and case number and lives at
//! `<root>/<INITIALS>/<dossier_dir>/<INITIALS>-<case>`.
//!
//! ## Workflow
//!
//! 1.  **Validation**: the surveyor must be in the surveyor table and the
//!     case number must be a legal folder name. Nothing touches the network
//!     before this passes, not even the token provider.
//!
//! 2.  **Already provisioned**: if the case folder exists the request ends
//!     there with `alreadyExists = true` and no writes.
//!
//! 3.  **Template clone**: otherwise, if the surveyor's template
//!     `<INITIALS>-0` exists, its folder structure is copied (files are
//!     skipped) into the new case folder.
//!
//! 4.  **Skeleton**: without a template, the case folder is created with the
//!     configured skeleton sub-folders, one after the other.
//!
//! Every creation uses conflict behavior `fail` and treats "name already
//! exists" as success, so two requests racing on the same dossier both end
//! with the same single tree.

use crate::auth::Caller;
use crate::config::ProvisioningConfig;
use crate::error::ServiceError;
use crate::graph::{path, DriveClient};
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::model::provision::ProvisionOutcome;
use common::requests::ProvisionFolderRequest;
use futures_util::future::BoxFuture;
use log::{debug, info};
use regex::Regex;
use std::sync::LazyLock;
use uuid::Uuid;

/// Characters SharePoint refuses in a folder name, plus the separator.
const ILLEGAL_NAME_PATTERN: &str = r#"["*:<>?/\\|]"#;

static ILLEGAL_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(ILLEGAL_NAME_PATTERN).expect("valid folder-name pattern"));

/// Case number reserved for the surveyor's template folder.
pub const TEMPLATE_CASE: &str = "0";

/// Actix web handler for `POST /api/sharepoint/folders/provision`.
///
/// # Returns
/// - `200 OK` with the `ProvisionOutcome` as JSON.
/// - `400 Bad Request` when the surveyor or case number is missing or invalid.
/// - `500 Internal Server Error` when Graph or the identity endpoint fails.
pub(crate) async fn process(
    caller: Caller,
    state: web::Data<AppState>,
    payload: web::Json<ProvisionFolderRequest>,
) -> Result<HttpResponse, ServiceError> {
    let request_id = Uuid::new_v4();
    info!(
        "[{}] {} requested dossier folder {:?}/{:?}",
        request_id, caller.email, payload.surveyor, payload.case_number
    );
    let outcome = provision_dossier(&state, &payload).await?;
    info!(
        "[{}] `{}` ready (already existed: {}, template used: {})",
        request_id, outcome.path, outcome.already_exists, outcome.template_used
    );
    Ok(HttpResponse::Ok().json(outcome))
}

/// `<root>/<initials>/<dossier_dir>`
pub fn dossier_parent(settings: &ProvisioningConfig, initials: &str) -> String {
    path::join(&path::join(&settings.root, initials), &settings.dossier_dir)
}

/// `<initials>-<case>`; the template folder is case `0`.
pub fn dossier_name(initials: &str, case_number: &str) -> String {
    format!("{initials}-{case_number}")
}

pub fn template_path(settings: &ProvisioningConfig, initials: &str) -> String {
    path::join(
        &dossier_parent(settings, initials),
        &dossier_name(initials, TEMPLATE_CASE),
    )
}

/// Checks the request and resolves the surveyor's initials.
fn validate<'a>(
    state: &'a AppState,
    request: &'a ProvisionFolderRequest,
) -> Result<(&'a str, &'a str), ServiceError> {
    let surveyor = request
        .surveyor
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ServiceError::validation("surveyor is required"))?;
    let case_number = request
        .case_number
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ServiceError::validation("caseNumber is required"))?;

    if ILLEGAL_NAME.is_match(case_number) || case_number.ends_with('.') {
        return Err(ServiceError::validation(format!(
            "caseNumber `{case_number}` is not a valid folder name"
        )));
    }

    let initials = state
        .config
        .surveyors
        .initials_for(surveyor)
        .ok_or_else(|| ServiceError::validation(format!("unknown surveyor `{surveyor}`")))?;

    if dossier_name(initials, case_number) == dossier_name(initials, TEMPLATE_CASE) {
        return Err(ServiceError::validation(format!(
            "caseNumber `{case_number}` is reserved for the template folder"
        )));
    }
    Ok((initials, case_number))
}

/// Runs the provisioning state machine for one dossier.
pub async fn provision_dossier(
    state: &AppState,
    request: &ProvisionFolderRequest,
) -> Result<ProvisionOutcome, ServiceError> {
    let (initials, case_number) = validate(state, request)?;
    let settings = &state.config.provisioning;
    let parent = dossier_parent(settings, initials);
    let name = dossier_name(initials, case_number);
    let dest = path::join(&parent, &name);

    let token = state.tokens.access_token().await?;
    let drive = &state.drive;

    if drive.folder_exists(&token, &dest).await {
        return Ok(ProvisionOutcome {
            path: dest,
            already_exists: true,
            template_used: false,
        });
    }

    let template = template_path(settings, initials);
    if drive.folder_exists(&token, &template).await {
        debug!("cloning `{}` into `{}`", template, dest);
        copy_structure(drive, &token, &template, &parent, &name, settings.max_depth).await?;
        return Ok(ProvisionOutcome {
            path: dest,
            already_exists: false,
            template_used: true,
        });
    }

    debug!("no template for {}, creating skeleton `{}`", initials, dest);
    drive.create_folder(&token, &parent, &name).await?;
    for sub in &settings.skeleton {
        drive.create_folder(&token, &dest, sub).await?;
    }
    Ok(ProvisionOutcome {
        path: dest,
        already_exists: false,
        template_used: false,
    })
}

/// Creates `dest_parent/dest_name`, then replicates every sub-folder found
/// under `source`, depth first. Files are not copied. A source that is
/// missing or cannot be listed contributes no children.
///
/// Trees deeper than `max_depth` levels stop the copy with a configuration
/// error instead of recursing further.
pub async fn copy_structure(
    drive: &DriveClient,
    token: &str,
    source: &str,
    dest_parent: &str,
    dest_name: &str,
    max_depth: usize,
) -> Result<(), ServiceError> {
    copy_level(drive, token, source, dest_parent, dest_name, 0, max_depth).await
}

fn copy_level<'a>(
    drive: &'a DriveClient,
    token: &'a str,
    source: &'a str,
    dest_parent: &'a str,
    dest_name: &'a str,
    depth: usize,
    max_depth: usize,
) -> BoxFuture<'a, Result<(), ServiceError>> {
    Box::pin(async move {
        if depth >= max_depth {
            return Err(ServiceError::configuration(format!(
                "folder tree under `{source}` is deeper than {max_depth} levels"
            )));
        }

        drive.create_folder(token, dest_parent, dest_name).await?;
        let dest = path::join(dest_parent, dest_name);

        for child in drive.list_children(token, source).await {
            if !child.is_folder() {
                continue;
            }
            let child_source = path::join(source, &child.name);
            copy_level(
                drive,
                token,
                &child_source,
                &dest,
                &child.name,
                depth + 1,
                max_depth,
            )
            .await?;
        }
        Ok(())
    })
}
