mod support;

use backend::error::ServiceError;
use backend::services::folders::bootstrap::bootstrap_templates;
use common::model::provision::BootstrapStatus;
use std::sync::Arc;
use support::{state, CountingTokens, FakeDrive};
use wiremock::MockServer;

fn seeded_drive() -> FakeDrive {
    let drive = FakeDrive::with_folders(&[
        "ARPENTEUR/SG/DOSSIER/SG-0/INTRANTS/PLANS",
        "ARPENTEUR/SG/DOSSIER/SG-0/RESULTATS",
        "ARPENTEUR/SG/DOSSIER/SG-0/FACTURES",
        "ARPENTEUR/JT/DOSSIER/JT-0/AUTRE",
        "ARPENTEUR/MAR/DOSSIER",
        "ARPENTEUR/PL/DOSSIER",
        "ARPENTEUR/NC/DOSSIER",
    ]);
    drive.add_file("ARPENTEUR/SG/DOSSIER/SG-0/INTRANTS/modele.docx");
    drive
}

#[tokio::test]
async fn clones_master_template_for_missing_surveyors() {
    let server = MockServer::start().await;
    let drive = seeded_drive();
    drive.mount(&server).await;
    let state = state(&server, Arc::new(CountingTokens::default()));

    let report = bootstrap_templates(&state).await.unwrap();

    assert_eq!(report.entries.len(), 5);
    assert_eq!(report.status_of("SG"), Some(BootstrapStatus::Source));
    assert_eq!(report.status_of("JT"), Some(BootstrapStatus::Existing));
    for initials in ["MAR", "PL", "NC"] {
        assert_eq!(report.status_of(initials), Some(BootstrapStatus::Created));
        let template = format!("ARPENTEUR/{initials}/DOSSIER/{initials}-0");
        assert_eq!(
            drive.children(&template),
            vec!["FACTURES", "INTRANTS", "RESULTATS"]
        );
        assert_eq!(drive.children(&format!("{template}/INTRANTS")), vec!["PLANS"]);
    }

    // Existing templates are left untouched.
    assert_eq!(drive.children("ARPENTEUR/JT/DOSSIER/JT-0"), vec!["AUTRE"]);
}

#[tokio::test]
async fn rerun_reports_every_template_as_existing() {
    let server = MockServer::start().await;
    seeded_drive().mount(&server).await;
    let state = state(&server, Arc::new(CountingTokens::default()));

    bootstrap_templates(&state).await.unwrap();
    let report = bootstrap_templates(&state).await.unwrap();

    for initials in ["JT", "MAR", "PL", "NC"] {
        assert_eq!(report.status_of(initials), Some(BootstrapStatus::Existing));
    }
}

#[tokio::test]
async fn missing_master_template_is_a_configuration_error() {
    let server = MockServer::start().await;
    let drive = FakeDrive::with_folders(&["ARPENTEUR/SG/DOSSIER"]);
    drive.mount(&server).await;
    let state = state(&server, Arc::new(CountingTokens::default()));

    let err = bootstrap_templates(&state).await.unwrap_err();

    assert!(matches!(err, ServiceError::Configuration(_)));
    assert!(drive.children("ARPENTEUR/SG/DOSSIER").is_empty());
}

#[tokio::test]
async fn missing_parent_folder_aborts_the_batch() {
    let server = MockServer::start().await;
    let drive = FakeDrive::with_folders(&["ARPENTEUR/SG/DOSSIER/SG-0/INTRANTS"]);
    drive.mount(&server).await;
    let state = state(&server, Arc::new(CountingTokens::default()));

    let err = bootstrap_templates(&state).await.unwrap_err();

    assert!(matches!(err, ServiceError::FolderCreate { .. }));
}
