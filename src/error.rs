//! The errors that can occur.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// A type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

/// The possible errors that can occur.
#[derive(Debug, Error)]
pub enum Error {
    /// An error occurred while running the runtime.
    #[error("An error occurred while running the runtime: {0}")]
    Runtime(#[from] tokio::task::JoinError),
    /// An error occurred while interacting with the file system.
    #[error("An IO error occurred: {0}")]
    Io(#[from] std::io::Error),

    /// Permission to read or write the target file was not granted.
    #[error("Permission denied to access {0:?}")]
    AccessDenied(PathBuf),
    /// No usable external tool executable could be located.
    #[error("No ffmpeg executable found, searched: {0:?}")]
    ToolNotFound(Vec<PathBuf>),
    /// The external tool could not be started, or exited abnormally.
    #[error("Failed to execute command: {0}")]
    Execution(String),
    /// The external tool reported success but produced no output file.
    #[error("No output file was produced at {0:?}")]
    OutputMissing(PathBuf),
    /// The final swap of the temp file into the target path failed.
    #[error("Failed to replace {target:?}, the edited copy was kept at {temp:?}: {source}")]
    Replace {
        /// The path that was being replaced.
        target: PathBuf,
        /// The temp file left on disk for manual recovery.
        temp: PathBuf,
        /// The underlying file system error.
        source: std::io::Error,
    },
    /// An error occurred due to a timeout.
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),
    /// An error occurred manipulating a path.
    #[error("An invalid path was provided: {0}")]
    Path(String),
}
