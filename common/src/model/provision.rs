use serde::{Deserialize, Serialize};

/// Result of a dossier folder provisioning request.
///
/// `already_exists` is set when the case folder was found and nothing was
/// written; `template_used` tells whether the tree was cloned from the
/// surveyor's `<INITIALS>-0` template or built from the fixed skeleton.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionOutcome {
    pub path: String,
    pub already_exists: bool,
    pub template_used: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BootstrapStatus {
    /// The master surveyor; never written.
    Source,
    /// Template already present, skipped.
    Existing,
    /// Template cloned from the master.
    Created,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootstrapEntry {
    pub surveyor: String,
    pub initials: String,
    pub status: BootstrapStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootstrapReport {
    pub entries: Vec<BootstrapEntry>,
}

impl BootstrapReport {
    pub fn status_of(&self, initials: &str) -> Option<BootstrapStatus> {
        self.entries
            .iter()
            .find(|e| e.initials == initials)
            .map(|e| e.status)
    }
}
