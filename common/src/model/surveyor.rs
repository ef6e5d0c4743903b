use serde::{Deserialize, Serialize};

/// A surveyor of the firm and the short code that namespaces their folders
/// (`ARPENTEUR/<INITIALS>/DOSSIER/...`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Surveyor {
    /// Full name, as entered on the case ("Samuel Guay").
    pub name: String,
    /// Two or three letter code ("SG").
    pub initials: String,
}

/// The fixed surveyor table, looked up by full name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SurveyorTable(Vec<Surveyor>);

impl SurveyorTable {
    pub fn new(entries: Vec<Surveyor>) -> Self {
        Self(entries)
    }

    /// Returns the entry whose name matches `name` once surrounding
    /// whitespace is removed. Matching is case sensitive.
    pub fn find(&self, name: &str) -> Option<&Surveyor> {
        let name = name.trim();
        self.0.iter().find(|s| s.name == name)
    }

    pub fn initials_for(&self, name: &str) -> Option<&str> {
        self.find(name).map(|s| s.initials.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Surveyor> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Surveyor>> for SurveyorTable {
    fn from(entries: Vec<Surveyor>) -> Self {
        Self(entries)
    }
}
