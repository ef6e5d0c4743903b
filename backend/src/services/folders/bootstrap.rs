//! One-shot setup of the per-surveyor template folders (`<INITIALS>-0`),
//! cloned from the master surveyor's template.
//!
//! Surveyors are handled one at a time. The first failure aborts the run;
//! running it again skips every template that already exists.

use crate::auth::Caller;
use crate::error::ServiceError;
use crate::services::folders::provision::{
    copy_structure, dossier_name, dossier_parent, template_path, TEMPLATE_CASE,
};
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::model::provision::{BootstrapEntry, BootstrapReport, BootstrapStatus};
use log::info;

pub(crate) async fn process(
    caller: Caller,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ServiceError> {
    caller.require_admin()?;
    info!("{} started the template bootstrap", caller.email);
    let report = bootstrap_templates(&state).await?;
    Ok(HttpResponse::Ok().json(report))
}

pub async fn bootstrap_templates(state: &AppState) -> Result<BootstrapReport, ServiceError> {
    let config = &state.config;
    let settings = &config.provisioning;
    let master = config.surveyors.find(&settings.master).ok_or_else(|| {
        ServiceError::configuration(format!(
            "master surveyor `{}` is not in the surveyor table",
            settings.master
        ))
    })?;

    let token = state.tokens.access_token().await?;
    let drive = &state.drive;

    let source = template_path(settings, &master.initials);
    if !drive.folder_exists(&token, &source).await {
        return Err(ServiceError::configuration(format!(
            "master template `{source}` does not exist"
        )));
    }

    let mut report = BootstrapReport::default();
    for surveyor in config.surveyors.iter() {
        let status = if surveyor.name == master.name {
            BootstrapStatus::Source
        } else if drive
            .folder_exists(&token, &template_path(settings, &surveyor.initials))
            .await
        {
            BootstrapStatus::Existing
        } else {
            copy_structure(
                drive,
                &token,
                &source,
                &dossier_parent(settings, &surveyor.initials),
                &dossier_name(&surveyor.initials, TEMPLATE_CASE),
                settings.max_depth,
            )
            .await?;
            info!("created template for {}", surveyor.initials);
            BootstrapStatus::Created
        };
        report.entries.push(BootstrapEntry {
            surveyor: surveyor.name.clone(),
            initials: surveyor.initials.clone(),
            status,
        });
    }
    Ok(report)
}
