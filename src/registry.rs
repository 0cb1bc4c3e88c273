//! Static catalog of known MCP servers.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::models::{LaunchConfig, ServerDescriptor};

static SERVERS: LazyLock<Vec<ServerDescriptor>> = LazyLock::new(build_registry);

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn build_registry() -> Vec<ServerDescriptor> {
    let documents = shellexpand::tilde("~/Documents").into_owned();

    vec![
        ServerDescriptor {
            name: "filesystem".into(),
            description: "MCP server for filesystem operations".into(),
            maintainer: "Anthropic".into(),
            launch_config: LaunchConfig {
                command: "npx".into(),
                args: vec![
                    "-y".into(),
                    "@modelcontextprotocol/server-filesystem".into(),
                    documents,
                ],
                env: None,
            },
            required_config: strings(&["Allowed directory paths that the server can access"]),
            dependencies: strings(&["Node.js", "npm"]),
            requires_user_input: false,
            user_input_prompt: None,
        },
        ServerDescriptor {
            name: "playwright".into(),
            description: "MCP server for browser automation with Playwright".into(),
            maintainer: "Anthropic".into(),
            launch_config: LaunchConfig {
                command: "npx".into(),
                args: strings(&["@playwright/mcp@latest"]),
                env: Some(BTreeMap::from([("PLAYWRIGHT_DEBUG".to_string(), "1".to_string())])),
            },
            required_config: vec![],
            dependencies: strings(&["Node.js", "npm"]),
            requires_user_input: false,
            user_input_prompt: None,
        },
        ServerDescriptor {
            name: "fetch".into(),
            description: "MCP server for making HTTP requests".into(),
            maintainer: "MCP".into(),
            launch_config: LaunchConfig {
                command: "docker".into(),
                args: strings(&["run", "-i", "--rm", "mcp/fetch"]),
                env: None,
            },
            required_config: vec![],
            dependencies: strings(&["Docker"]),
            requires_user_input: false,
            user_input_prompt: None,
        },
        ServerDescriptor {
            name: "memory".into(),
            description: "MCP server for managing Claude's memory".into(),
            maintainer: "MCP".into(),
            launch_config: LaunchConfig {
                command: "docker".into(),
                args: strings(&["run", "-i", "-v", "claude-memory:/app/dist", "--rm", "mcp/memory"]),
                env: None,
            },
            required_config: vec![],
            dependencies: strings(&["Docker"]),
            requires_user_input: false,
            user_input_prompt: None,
        },
        ServerDescriptor {
            name: "git".into(),
            description: "MCP server for Git operations".into(),
            maintainer: "MCP".into(),
            launch_config: LaunchConfig {
                command: "docker".into(),
                args: strings(&[
                    "run",
                    "--rm",
                    "-i",
                    "--mount",
                    "type=bind,src={user_directory},dst={user_directory}",
                    "mcp/git",
                ]),
                env: None,
            },
            required_config: strings(&["Directory path to mount for Git operations"]),
            dependencies: strings(&["Docker"]),
            requires_user_input: true,
            user_input_prompt: Some(
                "Enter the directory path you want to make available to the MCP Server (absolute path only):"
                    .into(),
            ),
        },
    ]
}

/// All registered servers, in registry order.
pub fn all_servers() -> &'static [ServerDescriptor] {
    &SERVERS
}

/// Exact, case-sensitive lookup by name.
pub fn get_server_info(name: &str) -> Option<&'static ServerDescriptor> {
    SERVERS.iter().find(|s| s.name == name)
}

/// Names of servers whose name or description contains `keyword`, ignoring case.
pub fn search_servers(keyword: &str) -> Vec<&'static str> {
    let keyword = keyword.to_lowercase();
    SERVERS
        .iter()
        .filter(|s| {
            s.name.to_lowercase().contains(&keyword)
                || s.description.to_lowercase().contains(&keyword)
        })
        .map(|s| s.name.as_str())
        .collect()
}

/// Launch config as JSON, ready to be written into the client config.
/// `env` is omitted entirely when the descriptor has none.
pub fn get_launch_config(name: &str) -> Option<serde_json::Value> {
    let server = get_server_info(name)?;
    serde_json::to_value(&server.launch_config).ok()
}
