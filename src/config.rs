//! Read-modify-write access to the `mcpServers` section of the Claude config.
//!
//! Every call re-reads the file. Writes replace the whole document in place;
//! there is no locking and no temp-file rename.

use std::io;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::debug;

use crate::models::InstalledServer;
use crate::paths::{expand_tilde, Paths, PointerError};
use crate::prompt::{Prompt, PromptError};
use crate::registry;

/// Top-level key holding installed servers.
pub const MCP_SERVERS_KEY: &str = "mcpServers";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Expected a JSON object in {}", .path.display())]
    NotAnObject { path: PathBuf },
    #[error("Failed to serialize config: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("Failed to write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// Load the config document. A missing file yields an empty object.
pub fn read_config(path: &Path) -> Result<Map<String, Value>, ConfigError> {
    if !path.exists() {
        debug!(path = %path.display(), "config file absent, treating as empty");
        return Ok(Map::new());
    }
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let value: Value = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(ConfigError::NotAnObject {
            path: path.to_path_buf(),
        }),
    }
}

/// Write the whole document with 2-space indentation, overwriting the file.
pub fn write_config(path: &Path, config: &Map<String, Value>) -> Result<(), ConfigError> {
    let output = serde_json::to_string_pretty(config).map_err(ConfigError::Serialize)?;
    std::fs::write(path, output).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "wrote config");
    Ok(())
}

fn servers_mut<'a>(
    config: &'a mut Map<String, Value>,
    path: &Path,
) -> Result<&'a mut Map<String, Value>, ConfigError> {
    config
        .entry(MCP_SERVERS_KEY)
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
        .ok_or_else(|| ConfigError::NotAnObject {
            path: path.to_path_buf(),
        })
}

/// Set `mcpServers[name] = launch_config`, creating `mcpServers` if needed.
/// Other top-level keys are preserved.
pub fn upsert_server(path: &Path, name: &str, launch_config: Value) -> Result<(), ConfigError> {
    let mut config = read_config(path)?;
    servers_mut(&mut config, path)?.insert(name.to_string(), launch_config);
    write_config(path, &config)
}

/// Delete `mcpServers[name]`. Returns `false`, without writing, when it is
/// not there.
pub fn remove_server(path: &Path, name: &str) -> Result<bool, ConfigError> {
    let mut config = read_config(path)?;
    let removed = config
        .get_mut(MCP_SERVERS_KEY)
        .and_then(Value::as_object_mut)
        .and_then(|servers| servers.shift_remove(name))
        .is_some();
    if !removed {
        return Ok(false);
    }
    write_config(path, &config)?;
    Ok(true)
}

/// Installed servers in file order, joined with registry metadata.
/// Entries not in the registry are skipped unless `include_unknown` is set.
pub fn list_installed(path: &Path, include_unknown: bool) -> Result<Vec<InstalledServer>, ConfigError> {
    let config = read_config(path)?;
    let Some(servers) = config.get(MCP_SERVERS_KEY).and_then(Value::as_object) else {
        return Ok(vec![]);
    };

    let mut installed = Vec::new();
    for (name, raw) in servers {
        match registry::get_server_info(name) {
            Some(info) => installed.push(InstalledServer {
                name: name.clone(),
                description: Some(info.description.clone()),
                maintainer: Some(info.maintainer.clone()),
                config: raw.clone(),
            }),
            None if include_unknown => installed.push(InstalledServer {
                name: name.clone(),
                description: None,
                maintainer: None,
                config: raw.clone(),
            }),
            None => debug!(server = %name, "skipping entry not in registry"),
        }
    }
    Ok(installed)
}

#[derive(Debug, thiserror::Error)]
pub enum SetPathError {
    #[error("Failed to resolve {}: {source}", .path.display())]
    Absolute { path: PathBuf, source: io::Error },
    #[error("Failed to create directory {}: {source}", .path.display())]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("Failed to copy config to {}: {source}", .path.display())]
    Copy { path: PathBuf, source: io::Error },
    #[error("Failed to save config path to {}: {source}", .path.display())]
    WritePointer { path: PathBuf, source: io::Error },
    #[error(transparent)]
    Pointer(#[from] PointerError),
    #[error(transparent)]
    Prompt(#[from] PromptError),
}

/// What `set_config_path` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetPathOutcome {
    /// Pointer updated. `copied_from` is set when the old config was copied over.
    Updated {
        path: PathBuf,
        copied_from: Option<PathBuf>,
    },
    /// The user declined to overwrite an existing file. Nothing changed.
    Aborted,
}

/// Point the tool at a new config location.
///
/// The new path is made absolute against the current directory. Creates
/// parent directories, copies the currently resolved config to the new
/// location if one exists and is a different file (asking before
/// overwriting), then records the new location in the pointer file.
pub fn set_config_path(
    paths: &Paths,
    new_path: &str,
    prompt: &dyn Prompt,
) -> Result<SetPathOutcome, SetPathError> {
    let typed = expand_tilde(new_path.trim());
    let new_path = std::path::absolute(&typed).map_err(|source| SetPathError::Absolute {
        path: typed.clone(),
        source,
    })?;

    if let Some(parent) = new_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| SetPathError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let current = paths.resolve_config_path()?;
    let mut copied_from = None;
    if current.exists() && !same_file(&current, &new_path) {
        if new_path.exists() {
            let message = format!(
                "A config file already exists at {}. Overwrite it?",
                new_path.display()
            );
            if !prompt.confirm(&message)? {
                debug!(path = %new_path.display(), "config path change aborted");
                return Ok(SetPathOutcome::Aborted);
            }
        }
        std::fs::copy(&current, &new_path).map_err(|source| SetPathError::Copy {
            path: new_path.clone(),
            source,
        })?;
        copied_from = Some(current);
    }

    paths
        .write_pointer(&new_path)
        .map_err(|source| SetPathError::WritePointer {
            path: paths.pointer_file().to_path_buf(),
            source,
        })?;
    debug!(pointer = %paths.pointer_file().display(), path = %new_path.display(), "saved config path");

    Ok(SetPathOutcome::Updated {
        path: new_path,
        copied_from,
    })
}

/// Whether both paths name the same existing file, through `..`, symlinks
/// or relative spellings.
fn same_file(a: &Path, b: &Path) -> bool {
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
