//! Locating the external ffmpeg executable.

use crate::error::{Error, Result};
use crate::utils;
use crate::utils::file_system;
use derive_more::Constructor;
use serde::Deserialize;
use std::path::PathBuf;

/// Well-known installation directories checked after the caller's own
/// search paths.
const DEFAULT_SEARCH_PATHS: [&str; 3] = ["/opt/homebrew/bin", "/usr/local/bin", "/usr/bin"];

/// Configuration for locating the external tool.
///
/// # Examples
///
/// ```rust,no_run
/// # use ffmeta::resolver::ToolConfig;
/// # use std::path::PathBuf;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ToolConfig::new(None, vec![PathBuf::from("/opt/media/bin")]);
/// let ffmpeg = config.resolve()?;
/// # Ok(())
/// # }
/// ```
#[derive(Constructor, Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// An explicit path to the ffmpeg executable. When set it is used
    /// as-is, and resolution fails if nothing exists there.
    pub tool_path: Option<PathBuf>,
    /// Directories to search, in order, before the built-in defaults.
    pub search_paths: Vec<PathBuf>,
}

impl ToolConfig {
    /// Resolves the path to the ffmpeg executable.
    ///
    /// Without an explicit `tool_path`, the directory of the current
    /// executable is checked first (a bundled copy wins), then each of
    /// `search_paths`, then the well-known installation directories, and
    /// finally the `PATH` environment.
    ///
    /// # Errors
    ///
    /// This function will return an error if no candidate location holds
    /// an executable; the error lists every path that was tried.
    pub fn resolve(&self) -> Result<PathBuf> {
        if let Some(path) = &self.tool_path {
            if path.exists() {
                return Ok(path.clone());
            }
            return Err(Error::ToolNotFound(vec![path.clone()]));
        }

        let name = utils::find_executable("ffmpeg");
        let mut searched = Vec::new();

        if let Ok(exe) = std::env::current_exe() {
            if let Ok(parent) = file_system::try_parent(&exe) {
                let candidate = parent.join(&name);
                if candidate.exists() {
                    return Ok(candidate);
                }
                searched.push(candidate);
            }
        }

        let defaults = DEFAULT_SEARCH_PATHS.iter().map(PathBuf::from);
        for dir in self.search_paths.iter().cloned().chain(defaults) {
            let candidate = dir.join(&name);
            if candidate.exists() {
                return Ok(candidate);
            }
            searched.push(candidate);
        }

        if let Ok(found) = which::which(&name) {
            log::debug!("Resolved ffmpeg from PATH: {:?}", found);
            return Ok(found);
        }

        Err(Error::ToolNotFound(searched))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn explicit_tool_path_is_used_as_is() {
        let dir = tempfile::tempdir().unwrap();
        let tool = dir.path().join("my-ffmpeg");
        fs::write(&tool, b"").unwrap();

        let config = ToolConfig::new(Some(tool.clone()), Vec::new());
        assert_eq!(config.resolve().unwrap(), tool);
    }

    #[test]
    fn missing_explicit_tool_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let tool = dir.path().join("absent");

        let config = ToolConfig::new(Some(tool.clone()), Vec::new());
        match config.resolve() {
            Err(Error::ToolNotFound(searched)) => assert_eq!(searched, vec![tool]),
            other => panic!("expected ToolNotFound, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn search_paths_are_checked_in_order() {
        let empty = tempfile::tempdir().unwrap();
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();

        let name = utils::find_executable("ffmpeg");
        fs::write(first.path().join(&name), b"").unwrap();
        fs::write(second.path().join(&name), b"").unwrap();

        let config = ToolConfig::new(
            None,
            vec![
                empty.path().to_path_buf(),
                first.path().to_path_buf(),
                second.path().to_path_buf(),
            ],
        );

        assert_eq!(config.resolve().unwrap(), first.path().join(&name));
    }
}
