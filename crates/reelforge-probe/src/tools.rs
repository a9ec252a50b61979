//! Locating ffprobe and reporting on it.

use crate::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// What `check-tools` reports for one executable.
#[derive(Debug, Clone)]
pub struct ToolInfo {
    pub name: String,
    pub available: bool,
    /// First line of the `-version` banner.
    pub version: Option<String>,
    /// Resolved executable, when it can be found on disk or on `PATH`.
    pub path: Option<PathBuf>,
}

impl ToolInfo {
    fn missing(name: &str) -> Self {
        Self {
            name: name.to_string(),
            available: false,
            version: None,
            path: None,
        }
    }
}

/// Run `<name> -version` and report whether it answered.
///
/// `name` may be a bare command looked up on `PATH` or a path to a binary.
///
/// # Example
///
/// ```no_run
/// use reelforge_probe::check_tool;
///
/// let info = check_tool("ffprobe");
/// if info.available {
///     println!("ffprobe version: {:?}", info.version);
/// }
/// ```
pub fn check_tool(name: &str) -> ToolInfo {
    let output = match Command::new(name).arg("-version").output() {
        Ok(output) if output.status.success() => output,
        Ok(output) => {
            tracing::debug!(tool = name, status = %output.status, "version check failed");
            return ToolInfo::missing(name);
        }
        Err(e) => {
            tracing::debug!(tool = name, error = %e, "tool did not start");
            return ToolInfo::missing(name);
        }
    };

    let banner = String::from_utf8_lossy(&output.stdout);
    ToolInfo {
        name: name.to_string(),
        available: true,
        version: banner.lines().next().map(str::to_string),
        path: which::which(name).ok(),
    }
}

/// Check every tool the converter shells out to.
///
/// A `configured` ffprobe binary from the config file is checked instead
/// of the `PATH` entry.
pub fn check_tools(configured: Option<&Path>) -> Vec<ToolInfo> {
    let ffprobe = configured.map_or_else(
        || crate::ffprobe::TOOL.to_string(),
        |p| p.to_string_lossy().into_owned(),
    );
    vec![check_tool(&ffprobe)]
}

/// Resolve `name` on `PATH`.
///
/// # Errors
///
/// Returns [`Error::ToolNotFound`] when no executable of that name exists.
pub fn require_tool(name: &str) -> Result<PathBuf> {
    which::which(name).map_err(|_| Error::tool_not_found(name))
}

/// Resolve a tool, preferring an existing configured path over `PATH`.
pub fn get_tool_path(name: &str, configured: Option<&Path>) -> Result<PathBuf> {
    match configured {
        Some(path) if path.exists() => return Ok(path.to_path_buf()),
        Some(path) => tracing::warn!(
            "configured {} path {} does not exist, falling back to PATH",
            name,
            path.display()
        ),
        None => {}
    }
    require_tool(name)
}
