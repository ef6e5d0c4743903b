//! Shared fixtures: an in-memory drive served through wiremock, a counting
//! token provider and a ready-made configuration.

#![allow(dead_code)]

use async_trait::async_trait;
use backend::config::AppConfig;
use backend::error::ServiceError;
use backend::graph::{DriveClient, TokenProvider};
use backend::state::AppState;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use wiremock::matchers::any;
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

pub const DRIVE_ID: &str = "drive-1";
pub const USER_TOKEN: &str = "user-token";
pub const ADMIN_TOKEN: &str = "admin-token";

#[derive(Default)]
pub struct CountingTokens {
    calls: AtomicUsize,
}

impl CountingTokens {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenProvider for CountingTokens {
    async fn access_token(&self) -> Result<String, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok("graph-token".to_string())
    }
}

pub fn config_toml(graph_base: &str) -> String {
    format!(
        r#"
        [graph]
        tenant_id = "tenant"
        client_id = "client"
        client_secret = "secret"
        drive_id = "{DRIVE_ID}"
        site_id = "site-1"
        graph_base = "{graph_base}"
        login_base = "{graph_base}"

        [provisioning]
        master = "Samuel Guay"

        [maps]
        api_key = "maps-key"
        base = "{graph_base}/maps"

        [[surveyors]]
        name = "Samuel Guay"
        initials = "SG"

        [[surveyors]]
        name = "Julie Tremblay"
        initials = "JT"

        [[surveyors]]
        name = "Marc-Antoine Roy"
        initials = "MAR"

        [[surveyors]]
        name = "Patrick Lavoie"
        initials = "PL"

        [[surveyors]]
        name = "Nadia Caron"
        initials = "NC"

        [[users]]
        token = "{USER_TOKEN}"
        email = "bureau@example.com"

        [[users]]
        token = "{ADMIN_TOKEN}"
        email = "admin@example.com"
        admin = true
        "#
    )
}

pub fn config(graph_base: &str) -> AppConfig {
    let config = AppConfig::from_toml(&config_toml(graph_base)).expect("config");
    config.validate().expect("valid config");
    config
}

pub fn state(server: &MockServer, tokens: Arc<CountingTokens>) -> AppState {
    state_with(server, tokens, |_| {})
}

/// Like [`state`], with `adjust` applied to the configuration first.
pub fn state_with<F>(server: &MockServer, tokens: Arc<CountingTokens>, adjust: F) -> AppState
where
    F: FnOnce(&mut AppConfig),
{
    let mut config = config(&server.uri());
    adjust(&mut config);
    let http = reqwest::Client::new();
    let drive = DriveClient::new(http.clone(), &config.graph);
    AppState::new(config, drive, tokens, http)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Folder,
    File,
}

/// A drive tree keyed by full path, answering the Graph calls the backend
/// makes: item GET, children GET and children POST.
#[derive(Clone, Default)]
pub struct FakeDrive {
    nodes: Arc<Mutex<BTreeMap<String, Node>>>,
}

impl FakeDrive {
    pub fn with_folders(paths: &[&str]) -> Self {
        let drive = Self::default();
        for path in paths {
            drive.add_folder(path);
        }
        drive
    }

    pub fn add_folder(&self, path: &str) {
        let mut nodes = self.nodes.lock().unwrap();
        let mut current = String::new();
        for segment in path.split('/') {
            if !current.is_empty() {
                current.push('/');
            }
            current.push_str(segment);
            nodes.entry(current.clone()).or_insert(Node::Folder);
        }
    }

    pub fn add_file(&self, path: &str) {
        if let Some((parent, _)) = path.rsplit_once('/') {
            self.add_folder(parent);
        }
        self.nodes.lock().unwrap().insert(path.to_string(), Node::File);
    }

    pub fn contains(&self, path: &str) -> bool {
        self.nodes.lock().unwrap().contains_key(path)
    }

    /// Sorted names of the direct children of `path`.
    pub fn children(&self, path: &str) -> Vec<String> {
        let prefix = format!("{path}/");
        let nodes = self.nodes.lock().unwrap();
        nodes
            .keys()
            .filter_map(|k| k.strip_prefix(&prefix))
            .filter(|rest| !rest.contains('/'))
            .map(|s| s.to_string())
            .collect()
    }

    /// Every path under `path`, relative to it, sorted.
    pub fn subtree(&self, path: &str) -> Vec<(String, Node)> {
        let prefix = format!("{path}/");
        let nodes = self.nodes.lock().unwrap();
        nodes
            .iter()
            .filter_map(|(k, v)| k.strip_prefix(&prefix).map(|rest| (rest.to_string(), v.clone())))
            .collect()
    }

    pub async fn mount(&self, server: &MockServer) {
        Mock::given(any())
            .respond_with(self.clone())
            .mount(server)
            .await;
    }

    fn not_found() -> ResponseTemplate {
        ResponseTemplate::new(404).set_body_json(json!({
            "error": {"code": "itemNotFound", "message": "The resource could not be found."}
        }))
    }

    fn item_json(name: &str, node: &Node) -> serde_json::Value {
        match node {
            Node::Folder => json!({"id": format!("id-{name}"), "name": name, "folder": {}}),
            Node::File => json!({"id": format!("id-{name}"), "name": name, "file": {}}),
        }
    }
}

impl Respond for FakeDrive {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let raw = request.url.path().to_string();
        let decoded = urlencoding::decode(&raw).map(|s| s.into_owned()).unwrap_or(raw);
        let base = format!("/drives/{DRIVE_ID}/");
        let Some(rest) = decoded.strip_prefix(&base) else {
            return Self::not_found();
        };

        let (item, children) = if rest == "root/children" {
            (String::new(), true)
        } else if let Some(p) = rest.strip_prefix("root:/") {
            match p.strip_suffix(":/children") {
                Some(p) => (p.to_string(), true),
                None => (p.to_string(), false),
            }
        } else {
            return Self::not_found();
        };

        let method = request.method.as_str();
        let mut nodes = self.nodes.lock().unwrap();
        let exists = item.is_empty() || nodes.get(&item) == Some(&Node::Folder);

        match (method, children) {
            ("GET", false) => match nodes.get(&item) {
                Some(node) => ResponseTemplate::new(200).set_body_json(Self::item_json(&item, node)),
                None => Self::not_found(),
            },
            ("GET", true) if exists => {
                let prefix = if item.is_empty() { String::new() } else { format!("{item}/") };
                let value: Vec<_> = nodes
                    .iter()
                    .filter_map(|(k, v)| {
                        k.strip_prefix(&prefix)
                            .filter(|rest| !rest.is_empty() && !rest.contains('/'))
                            .map(|name| Self::item_json(name, v))
                    })
                    .collect();
                ResponseTemplate::new(200).set_body_json(json!({ "value": value }))
            }
            ("POST", true) if exists => {
                let body: serde_json::Value =
                    serde_json::from_slice(&request.body).unwrap_or_default();
                let name = body["name"].as_str().unwrap_or_default().to_string();
                let full = if item.is_empty() { name.clone() } else { format!("{item}/{name}") };
                if nodes.contains_key(&full) {
                    return ResponseTemplate::new(409).set_body_json(json!({
                        "error": {"code": "nameAlreadyExists", "message": "Name already exists"}
                    }));
                }
                nodes.insert(full, Node::Folder);
                ResponseTemplate::new(201).set_body_json(Self::item_json(&name, &Node::Folder))
            }
            _ => Self::not_found(),
        }
    }
}

/// Number of folder-creation calls the server received.
pub async fn create_calls(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.method.as_str() == "POST")
        .count()
}
