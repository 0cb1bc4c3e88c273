//! mcp-manager - MCP server installer
//!
//! Searches a built-in catalog of MCP servers and installs them into the
//! Claude desktop config.

pub mod config;
pub mod dependencies;
pub mod install;
pub mod models;
pub mod paths;
pub mod prompt;
pub mod registry;

pub use config::{list_installed, read_config, remove_server, set_config_path, upsert_server, ConfigError, SetPathOutcome};
pub use dependencies::{check_dependencies, DependencyReport, Probe, SystemProbe};
pub use install::{install, uninstall, InstallError, InstallOptions, UninstallError};
pub use models::{Client, InstalledServer, LaunchConfig, Scope, ServerDescriptor};
pub use paths::{Paths, PointerError};
pub use prompt::{Prompt, TerminalPrompt};
pub use registry::{get_launch_config, get_server_info, search_servers};
