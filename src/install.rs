//! Install and uninstall MCP servers in the Claude desktop config.

use std::path::PathBuf;

use serde_json::Value;
use tracing::debug;

use crate::config::{self, ConfigError};
use crate::dependencies::{check_dependencies, Probe};
use crate::models::{Client, Scope, USER_DIRECTORY_PLACEHOLDER};
use crate::paths::{Paths, PointerError};
use crate::prompt::{Prompt, PromptError};
use crate::registry;

/// Flags accepted by `install`.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstallOptions {
    pub client: Option<Client>,
    /// Accepted but ignored.
    pub scope: Option<Scope>,
}

#[derive(Debug, thiserror::Error)]
pub enum InstallError {
    #[error("Server not found: {0}")]
    ServerNotFound(String),
    #[error("Currently only Claude installation is supported")]
    UnsupportedClient,
    #[error("Missing required dependencies: {}", .0.join(", "))]
    MissingDependencies(Vec<String>),
    #[error("Claude config file not found at: {}", .0.display())]
    ConfigFileMissing(PathBuf),
    #[error(transparent)]
    Prompt(#[from] PromptError),
    #[error(transparent)]
    Pointer(#[from] PointerError),
    #[error("Error updating Claude config: {0}")]
    Config(#[from] ConfigError),
}

/// Install `name` into the resolved Claude config.
///
/// Steps run in order and stop at the first failure: registry lookup,
/// client check, dependency check, placeholder substitution, config file
/// presence, write. The config file is never created here.
/// Returns the config path written to.
pub fn install(
    paths: &Paths,
    name: &str,
    options: InstallOptions,
    probe: &dyn Probe,
    prompt: &dyn Prompt,
) -> Result<PathBuf, InstallError> {
    let server = registry::get_server_info(name)
        .ok_or_else(|| InstallError::ServerNotFound(name.to_string()))?;

    if let Some(client) = options.client {
        if !client.is_supported() {
            return Err(InstallError::UnsupportedClient);
        }
    }
    if let Some(scope) = options.scope {
        debug!(?scope, "--scope is accepted but has no effect");
    }

    if !server.dependencies.is_empty() {
        let report = check_dependencies(server.dependencies.as_slice(), probe);
        if !report.all_present() {
            return Err(InstallError::MissingDependencies(report.missing));
        }
    }

    let mut launch_config = registry::get_launch_config(name)
        .ok_or_else(|| InstallError::ServerNotFound(name.to_string()))?;

    if server.requires_user_input {
        if let Some(message) = server.user_input_prompt.as_deref() {
            let answer = prompt.input(message)?;
            launch_config = substitute_placeholder(&launch_config, &answer);
        }
    }

    let config_path = paths.resolve_config_path()?;
    if !config_path.exists() {
        return Err(InstallError::ConfigFileMissing(config_path));
    }

    config::upsert_server(&config_path, name, launch_config)?;
    debug!(server = name, path = %config_path.display(), "installed");
    Ok(config_path)
}

/// Copy of `launch_config` with the user directory placeholder replaced in
/// every string entry of `args`. Non-string entries pass through.
pub fn substitute_placeholder(launch_config: &Value, value: &str) -> Value {
    let mut result = launch_config.clone();
    if let Some(args) = result.get_mut("args").and_then(Value::as_array_mut) {
        for arg in args.iter_mut() {
            if let Value::String(s) = arg {
                *s = s.replace(USER_DIRECTORY_PLACEHOLDER, value);
            }
        }
    }
    result
}

#[derive(Debug, thiserror::Error)]
pub enum UninstallError {
    #[error("Currently only Claude deletion is supported")]
    UnsupportedClient,
    #[error("Claude config file not found at: {}", .0.display())]
    ConfigFileMissing(PathBuf),
    #[error("Server {0} is not installed in Claude config")]
    NotInstalled(String),
    #[error(transparent)]
    Pointer(#[from] PointerError),
    #[error("Error updating Claude config: {0}")]
    Config(#[from] ConfigError),
}

/// Remove `name` from the resolved Claude config. Returns the config path.
pub fn uninstall(paths: &Paths, name: &str, client: Option<Client>) -> Result<PathBuf, UninstallError> {
    if let Some(client) = client {
        if !client.is_supported() {
            return Err(UninstallError::UnsupportedClient);
        }
    }

    let config_path = paths.resolve_config_path()?;
    if !config_path.exists() {
        return Err(UninstallError::ConfigFileMissing(config_path));
    }

    if !config::remove_server(&config_path, name)? {
        return Err(UninstallError::NotInstalled(name.to_string()));
    }
    debug!(server = name, path = %config_path.display(), "uninstalled");
    Ok(config_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::scripted::ScriptedPrompt;
    use serde_json::json;
    use std::path::Path;
    use tempfile::TempDir;

    struct AllPresent;

    impl Probe for AllPresent {
        fn has_executable(&self, _program: &str) -> bool {
            true
        }

        fn daemon_running(&self, _program: &str) -> bool {
            true
        }
    }

    struct NothingInstalled;

    impl Probe for NothingInstalled {
        fn has_executable(&self, _program: &str) -> bool {
            false
        }

        fn daemon_running(&self, _program: &str) -> bool {
            false
        }
    }

    fn setup(content: Option<&str>) -> (TempDir, Paths) {
        let dir = TempDir::new().expect("create temp dir");
        let paths = Paths {
            pointer_file: dir.path().join(".mcp_manager_config"),
            default_config: dir.path().join("claude_desktop_config.json"),
        };
        if let Some(content) = content {
            std::fs::write(&paths.default_config, content).expect("write config");
        }
        (dir, paths)
    }

    fn read_json(path: &Path) -> Value {
        serde_json::from_str(&std::fs::read_to_string(path).expect("read")).expect("parse")
    }

    fn claude() -> InstallOptions {
        InstallOptions {
            client: Some(Client::Claude),
            scope: None,
        }
    }

    #[test]
    fn install_filesystem_into_empty_config() {
        let (_dir, paths) = setup(Some("{}"));

        install(&paths, "filesystem", InstallOptions::default(), &AllPresent, &ScriptedPrompt::default())
            .expect("install");

        let documents = shellexpand::tilde("~/Documents").into_owned();
        assert_eq!(
            read_json(&paths.default_config),
            json!({"mcpServers": {"filesystem": {
                "command": "npx",
                "args": ["-y", "@modelcontextprotocol/server-filesystem", documents]
            }}})
        );
    }

    #[test]
    fn install_playwright_writes_env() {
        let (_dir, paths) = setup(Some("{}"));

        install(&paths, "playwright", claude(), &AllPresent, &ScriptedPrompt::default()).expect("install");

        let value = read_json(&paths.default_config);
        assert_eq!(value["mcpServers"]["playwright"]["env"], json!({"PLAYWRIGHT_DEBUG": "1"}));
    }

    #[test]
    fn install_unknown_server() {
        let (_dir, paths) = setup(Some("{}"));
        let result = install(&paths, "nonexistent", claude(), &AllPresent, &ScriptedPrompt::default());
        assert!(matches!(result, Err(InstallError::ServerNotFound(name)) if name == "nonexistent"));
    }

    #[test]
    fn cursor_client_is_rejected_for_every_server() {
        let original = r#"{"keep": true}"#;
        let (_dir, paths) = setup(Some(original));
        let options = InstallOptions {
            client: Some(Client::Cursor),
            scope: Some(Scope::Project),
        };

        for server in registry::all_servers() {
            let result = install(&paths, &server.name, options, &AllPresent, &ScriptedPrompt::default());
            assert!(matches!(result, Err(InstallError::UnsupportedClient)));
        }
        assert_eq!(std::fs::read_to_string(&paths.default_config).expect("read"), original);
    }

    #[test]
    fn missing_dependencies_stop_install() {
        let original = "{}";
        let (_dir, paths) = setup(Some(original));

        let result = install(&paths, "playwright", claude(), &NothingInstalled, &ScriptedPrompt::default());

        match result {
            Err(InstallError::MissingDependencies(missing)) => {
                assert_eq!(missing, vec!["Node.js", "npm"]);
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(std::fs::read_to_string(&paths.default_config).expect("read"), original);
    }

    #[test]
    fn fetch_reports_missing_docker() {
        let (_dir, paths) = setup(Some("{}"));
        let result = install(&paths, "fetch", claude(), &NothingInstalled, &ScriptedPrompt::default());
        assert!(matches!(result, Err(InstallError::MissingDependencies(m)) if m == vec!["Docker"]));
    }

    #[test]
    fn install_never_creates_config_file() {
        let (_dir, paths) = setup(None);
        let result = install(&paths, "fetch", claude(), &AllPresent, &ScriptedPrompt::default());
        assert!(matches!(result, Err(InstallError::ConfigFileMissing(p)) if p == paths.default_config));
        assert!(!paths.default_config.exists());
    }

    #[test]
    fn git_prompts_and_substitutes_every_placeholder() {
        let (_dir, paths) = setup(Some("{}"));
        let prompt = ScriptedPrompt::with_input("/home/me/repo");

        install(&paths, "git", claude(), &AllPresent, &prompt).expect("install");

        let git = registry::get_server_info("git").expect("git");
        assert_eq!(*prompt.asked.borrow(), vec![git.user_input_prompt.clone().expect("prompt")]);
        let value = read_json(&paths.default_config);
        assert_eq!(
            value["mcpServers"]["git"]["args"],
            json!(["run", "--rm", "-i", "--mount", "type=bind,src=/home/me/repo,dst=/home/me/repo", "mcp/git"])
        );
        assert!(git.launch_config.args[4].contains(USER_DIRECTORY_PLACEHOLDER));
    }

    #[test]
    fn repeated_git_installs_reuse_the_template() {
        let (_dir, paths) = setup(Some("{}"));

        install(&paths, "git", claude(), &AllPresent, &ScriptedPrompt::with_input("/a")).expect("first");
        install(&paths, "git", claude(), &AllPresent, &ScriptedPrompt::with_input("/b")).expect("second");

        let value = read_json(&paths.default_config);
        assert_eq!(value["mcpServers"]["git"]["args"][4], "type=bind,src=/b,dst=/b");
    }

    #[test]
    fn substitution_passes_non_strings_through() {
        let template = json!({"command": "x", "args": ["{user_directory}", 3, null, "a{user_directory}b"]});
        let result = substitute_placeholder(&template, "/d");
        assert_eq!(result["args"], json!(["/d", 3, null, "a/db"]));
        assert_eq!(template["args"][0], "{user_directory}");
    }

    #[test]
    fn install_follows_pointer_file() {
        let (dir, paths) = setup(None);
        let custom = dir.path().join("custom.json");
        std::fs::write(&custom, "{}").expect("write custom");
        std::fs::write(&paths.pointer_file, custom.to_string_lossy().as_bytes()).expect("write pointer");

        let written = install(&paths, "memory", claude(), &AllPresent, &ScriptedPrompt::default())
            .expect("install");

        assert_eq!(written, custom);
        assert!(read_json(&custom)["mcpServers"]["memory"].is_object());
    }

    #[test]
    fn uninstall_missing_server_leaves_file_unmodified() {
        let original = "{\n  \"mcpServers\": {\n    \"git\": {}\n  }\n}";
        let (_dir, paths) = setup(Some(original));

        let result = uninstall(&paths, "fetch", None);

        assert!(matches!(result, Err(UninstallError::NotInstalled(n)) if n == "fetch"));
        assert_eq!(std::fs::read_to_string(&paths.default_config).expect("read"), original);
    }

    #[test]
    fn uninstall_requires_config_file() {
        let (_dir, paths) = setup(None);
        assert!(matches!(uninstall(&paths, "fetch", None), Err(UninstallError::ConfigFileMissing(_))));
    }

    #[test]
    fn uninstall_rejects_cursor() {
        let (_dir, paths) = setup(Some("{}"));
        assert!(matches!(
            uninstall(&paths, "fetch", Some(Client::Cursor)),
            Err(UninstallError::UnsupportedClient)
        ));
    }

    #[test]
    fn install_then_uninstall_restores_document() {
        let original = json!({
            "globalShortcut": "Ctrl+Space",
            "mcpServers": {"custom": {"command": "x", "args": []}},
        });
        let (_dir, paths) = setup(Some(&original.to_string()));

        install(&paths, "fetch", claude(), &AllPresent, &ScriptedPrompt::default()).expect("install");
        assert!(read_json(&paths.default_config)["mcpServers"]["fetch"].is_object());

        uninstall(&paths, "fetch", Some(Client::Claude)).expect("uninstall");
        assert_eq!(read_json(&paths.default_config), original);
    }

    #[test]
    fn parse_failure_is_reported_as_config_error() {
        let (_dir, paths) = setup(Some("not json"));
        let result = install(&paths, "fetch", claude(), &AllPresent, &ScriptedPrompt::default());
        let err = result.expect_err("should fail");
        assert!(err.to_string().starts_with("Error updating Claude config:"));
    }

    #[test]
    fn unreadable_pointer_stops_install_without_touching_default() {
        let original = "{}";
        let (_dir, paths) = setup(Some(original));
        std::fs::create_dir(&paths.pointer_file).expect("create dir in place of pointer");

        let result = install(&paths, "fetch", claude(), &AllPresent, &ScriptedPrompt::default());

        assert!(matches!(result, Err(InstallError::Pointer(_))));
        assert_eq!(std::fs::read_to_string(&paths.default_config).expect("read"), original);
    }

    #[test]
    fn unreadable_pointer_stops_uninstall() {
        let original = r#"{"mcpServers": {"fetch": {}}}"#;
        let (_dir, paths) = setup(Some(original));
        std::fs::create_dir(&paths.pointer_file).expect("create dir in place of pointer");

        assert!(matches!(uninstall(&paths, "fetch", None), Err(UninstallError::Pointer(_))));
        assert_eq!(std::fs::read_to_string(&paths.default_config).expect("read"), original);
    }

    #[test]
    fn write_failure_surfaces_as_config_update_error() {
        let dir = TempDir::new().expect("create temp dir");
        let unwritable = dir.path().join("missing-dir/claude_desktop_config.json");

        let err = config::upsert_server(&unwritable, "fetch", json!({"command": "docker"}))
            .expect_err("write should fail");
        let message = InstallError::from(err).to_string();

        assert!(
            message.starts_with("Error updating Claude config: Failed to write"),
            "{message}"
        );
    }
}
