//! Presence checks for the runtimes a server needs before it can be installed.

use std::process::{Command, Stdio};

use tracing::debug;

use crate::models::Dependency;

/// Environment probes used by [`check_dependencies`].
pub trait Probe {
    /// Whether `program` is an executable file on PATH.
    fn has_executable(&self, program: &str) -> bool;

    /// Whether the daemon behind `program` answers (e.g. `docker info` exits 0).
    fn daemon_running(&self, program: &str) -> bool;
}

/// Probes the real PATH and spawns the liveness command.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemProbe;

impl Probe for SystemProbe {
    fn has_executable(&self, program: &str) -> bool {
        which_exists(program)
    }

    fn daemon_running(&self, program: &str) -> bool {
        // No timeout: a hung daemon hangs the check.
        Command::new(program)
            .arg("info")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }
}

/// Check if a binary exists on PATH
fn which_exists(cmd: &str) -> bool {
    std::env::var_os("PATH")
        .map(|paths| {
            std::env::split_paths(&paths).any(|dir| {
                let full = dir.join(cmd);
                full.is_file() || full.with_extension("exe").is_file()
            })
        })
        .unwrap_or(false)
}

/// Result of a dependency check.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DependencyReport {
    /// Human-readable labels, e.g. `Node.js` or `Docker daemon (not running)`.
    pub missing: Vec<String>,
}

impl DependencyReport {
    pub fn all_present(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Check every named dependency. Unrecognised names count as satisfied.
/// Each dependency class is probed at most once.
pub fn check_dependencies<S: AsRef<str>>(names: &[S], probe: &dyn Probe) -> DependencyReport {
    let mut checked: Vec<Dependency> = Vec::new();
    let mut missing = Vec::new();

    for name in names {
        let name = name.as_ref();
        let Some(dep) = Dependency::classify(name) else {
            debug!(dependency = name, "unrecognised dependency, skipping");
            continue;
        };
        if checked.contains(&dep) {
            continue;
        }
        checked.push(dep);

        match dep {
            Dependency::NodeRuntime => missing.extend(check_node(probe)),
            Dependency::Docker => missing.extend(check_docker(probe)),
        }
    }

    debug!(?missing, "dependency check finished");
    DependencyReport { missing }
}

fn check_node(probe: &dyn Probe) -> Vec<String> {
    let mut missing = Vec::new();
    if !probe.has_executable("node") {
        missing.push("Node.js".to_string());
    }
    if !probe.has_executable("npm") {
        missing.push("npm".to_string());
    }
    missing
}

fn check_docker(probe: &dyn Probe) -> Vec<String> {
    if !probe.has_executable("docker") {
        return vec!["Docker".to_string()];
    }
    if !probe.daemon_running("docker") {
        return vec!["Docker daemon (not running)".to_string()];
    }
    vec![]
}
