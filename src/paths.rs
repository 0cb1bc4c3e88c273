//! Path resolution for the pointer file and the Claude desktop config.
//!
//! Uses env vars when set, otherwise platform defaults.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

/// The pointer file exists but could not be turned into a path.
#[derive(Debug, thiserror::Error)]
#[error("Failed to read config path from {}: {source}", .path.display())]
pub struct PointerError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Resolved locations used by every command.
#[derive(Debug, Clone)]
pub struct Paths {
    pub pointer_file: PathBuf,
    pub default_config: PathBuf,
}

impl Paths {
    /// Resolve paths from environment, falling back to platform defaults.
    pub fn resolve() -> Self {
        let pointer_file = resolve_path(
            "MCP_MANAGER_POINTER_FILE",
            dirs::home_dir().map(|p| p.join(".mcp_manager_config")),
            "~/.mcp_manager_config",
        );
        let default_config = dirs::config_dir()
            .map(|p| p.join("Claude/claude_desktop_config.json"))
            .unwrap_or_else(|| {
                expand_tilde("~/Library/Application Support/Claude/claude_desktop_config.json")
            });

        Self {
            pointer_file,
            default_config,
        }
    }

    /// Pointer file holding a user-chosen config location.
    pub fn pointer_file(&self) -> &Path {
        &self.pointer_file
    }

    /// Config location used when no pointer file exists.
    pub fn default_config(&self) -> &Path {
        &self.default_config
    }

    /// Location of the Claude desktop config: the pointer file's content
    /// (trimmed) if it exists, otherwise the default. Only a missing pointer
    /// file falls back; any other read failure is an error.
    pub fn resolve_config_path(&self) -> Result<PathBuf, PointerError> {
        let bytes = match std::fs::read(&self.pointer_file) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(self.default_config.clone()),
            Err(source) => {
                return Err(PointerError {
                    path: self.pointer_file.clone(),
                    source,
                })
            }
        };

        let trimmed = bytes.trim_ascii();
        if trimmed.is_empty() {
            debug!(pointer = %self.pointer_file.display(), "empty pointer file, using default");
            return Ok(self.default_config.clone());
        }
        let path = match std::str::from_utf8(trimmed) {
            Ok(text) => expand_tilde(text),
            Err(_) => PathBuf::from(bytes_to_os_string(trimmed).map_err(|source| PointerError {
                path: self.pointer_file.clone(),
                source,
            })?),
        };
        debug!(pointer = %self.pointer_file.display(), path = %path.display(), "using config path override");
        Ok(path)
    }

    /// Record `path` in the pointer file, byte for byte where the platform allows.
    pub fn write_pointer(&self, path: &Path) -> io::Result<()> {
        std::fs::write(&self.pointer_file, os_str_to_bytes(path.as_os_str()))
    }
}

#[cfg(unix)]
fn bytes_to_os_string(bytes: &[u8]) -> io::Result<OsString> {
    use std::os::unix::ffi::OsStrExt;
    Ok(std::ffi::OsStr::from_bytes(bytes).to_os_string())
}

#[cfg(not(unix))]
fn bytes_to_os_string(_bytes: &[u8]) -> io::Result<OsString> {
    Err(io::Error::new(io::ErrorKind::InvalidData, "config path is not valid UTF-8"))
}

#[cfg(unix)]
fn os_str_to_bytes(s: &std::ffi::OsStr) -> Vec<u8> {
    use std::os::unix::ffi::OsStrExt;
    s.as_bytes().to_vec()
}

#[cfg(not(unix))]
fn os_str_to_bytes(s: &std::ffi::OsStr) -> Vec<u8> {
    s.to_string_lossy().into_owned().into_bytes()
}

fn resolve_path(env_var: &str, home_default: Option<PathBuf>, fallback: &str) -> PathBuf {
    if let Ok(val) = std::env::var(env_var) {
        let trimmed = val.trim();
        if !trimmed.is_empty() {
            return expand_tilde(trimmed);
        }
    }
    home_default.unwrap_or_else(|| expand_tilde(fallback))
}

pub(crate) fn expand_tilde(path: &str) -> PathBuf {
    let expanded = shellexpand::tilde(path);
    PathBuf::from(expanded.as_ref())
}
