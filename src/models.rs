//! Data structures for registry entries and installed config entries.

use std::collections::BTreeMap;

use serde::Serialize;

/// Placeholder in launch args replaced with the user's answer at install time.
pub const USER_DIRECTORY_PLACEHOLDER: &str = "{user_directory}";

/// Launch descriptor written under `mcpServers.<name>` in the client config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LaunchConfig {
    pub command: String,
    pub args: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env: Option<BTreeMap<String, String>>,
}

/// A known MCP server in the static registry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerDescriptor {
    pub name: String,
    pub description: String,
    pub maintainer: String,
    pub launch_config: LaunchConfig,
    pub required_config: Vec<String>,
    pub dependencies: Vec<String>,
    pub requires_user_input: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_input_prompt: Option<String>,
}

/// Dependency classes the checker knows how to probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dependency {
    /// Node.js runtime plus npm.
    NodeRuntime,
    /// Docker engine.
    Docker,
}

impl Dependency {
    /// Classify a dependency name. Unknown names yield `None`.
    pub fn classify(name: &str) -> Option<Self> {
        match name {
            "Node.js" | "npm" => Some(Dependency::NodeRuntime),
            "Docker" => Some(Dependency::Docker),
            _ => None,
        }
    }
}

/// Target client for install/uninstall. Only Claude is supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Client {
    Claude,
    Cursor,
}

impl Client {
    pub fn is_supported(self) -> bool {
        self == Client::Claude
    }
}

/// Installation scope. Accepted on the command line but not acted upon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Scope {
    Global,
    Project,
}

/// An entry found under `mcpServers` joined with registry metadata.
#[derive(Debug, Clone, Serialize)]
pub struct InstalledServer {
    pub name: String,
    /// `None` when the entry is not in the registry (only listed with `--all`).
    pub description: Option<String>,
    pub maintainer: Option<String>,
    pub config: serde_json::Value,
}

impl InstalledServer {
    pub fn is_known(&self) -> bool {
        self.description.is_some()
    }
}
