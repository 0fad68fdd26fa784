//! External tool detection and management.

use crate::{Error, Result};
use std::path::PathBuf;
use std::process::Command;

/// Information about an external tool.
#[derive(Debug, Clone)]
pub struct ToolInfo {
    /// Name of the tool.
    pub name: String,
    /// Whether the tool is available.
    pub available: bool,
    /// Version string if available.
    pub version: Option<String>,
    /// Path to the tool executable.
    pub path: Option<PathBuf>,
}

/// Check if a tool is available and get its information.
///
/// # Example
///
/// ```no_run
/// use stickermill_av::check_tool;
///
/// let info = check_tool("ffprobe");
/// if info.available {
///     println!("ffprobe version: {:?}", info.version);
/// }
/// ```
pub fn check_tool(name: &str) -> ToolInfo {
    let result = Command::new(name).arg("-version").output();

    match result {
        Ok(output) if output.status.success() => {
            let version = String::from_utf8_lossy(&output.stdout)
                .lines()
                .next()
                .map(|s| s.to_string());

            let path = which::which(name).ok();

            ToolInfo {
                name: name.to_string(),
                available: true,
                version,
                path,
            }
        }
        _ => ToolInfo {
            name: name.to_string(),
            available: false,
            version: None,
            path: None,
        },
    }
}

/// Check the media tools the conversion pipeline depends on.
///
/// Returns information about ffmpeg and ffprobe.
pub fn check_tools() -> Vec<ToolInfo> {
    vec![check_tool("ffmpeg"), check_tool("ffprobe")]
}

/// Require that a tool is available, returning its path.
///
/// # Errors
///
/// Returns an error if the tool is not found.
pub fn require_tool(name: &str) -> Result<PathBuf> {
    which::which(name).map_err(|_| Error::tool_not_found(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_tool_not_found() {
        let info = check_tool("nonexistent_tool_12345");
        assert!(!info.available);
        assert!(info.version.is_none());
        assert!(info.path.is_none());
    }

    #[test]
    fn test_require_tool_not_found() {
        let err = require_tool("nonexistent_tool_12345").unwrap_err();
        assert!(matches!(err, Error::ToolNotFound { tool } if tool == "nonexistent_tool_12345"));
    }

    #[test]
    fn test_check_tools_covers_both_media_tools() {
        let names: Vec<String> = check_tools().into_iter().map(|t| t.name).collect();
        assert_eq!(names, ["ffmpeg", "ffprobe"]);
    }
}
