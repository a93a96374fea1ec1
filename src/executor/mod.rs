//! A tool for executing commands.

use crate::error::{Error, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Represents a command executor.
///
/// The executor reports the exit code of the process without judging it;
/// callers decide whether a non-zero exit is fatal for their operation.
///
/// # Example
///
/// ```rust,no_run
/// # use ffmeta::executor::Executor;
/// # use ffmeta::utils;
/// # use std::path::PathBuf;
/// # use std::time::Duration;
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let args = vec!["-version"];
///
/// let executor = Executor {
///     executable_path: PathBuf::from("ffmpeg"),
///     timeout: Duration::from_secs(30),
///     args: utils::to_owned(args),
/// };
///
/// let output = executor.execute().await?;
/// println!("Output: {}", output.stdout);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Executor {
    /// The path to the command executable.
    pub executable_path: PathBuf,
    /// The timeout for the process.
    pub timeout: Duration,

    /// The arguments to pass to the command.
    pub args: Vec<String>,
}

/// Represents the output of a process.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessOutput {
    /// The stdout of the process.
    pub stdout: String,
    /// The stderr of the process.
    pub stderr: String,
    /// The exit code of the process.
    pub code: i32,
}

impl ProcessOutput {
    /// Returns true if the process exited with code zero.
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

impl Executor {
    /// Executes the command and returns the captured output.
    ///
    /// # Errors
    ///
    /// This function will return an error if the process could not be
    /// spawned, or if it did not exit before the timeout elapsed.
    pub async fn execute(&self) -> Result<ProcessOutput> {
        log::debug!("Executing command: {:?}", self);

        let mut command = tokio::process::Command::new(&self.executable_path);
        command.stdout(std::process::Stdio::piped());
        command.stderr(std::process::Stdio::piped());

        #[cfg(target_os = "windows")]
        {
            use std::os::windows::process::CommandExt;
            command.creation_flags(0x08000000);
        }

        command.args(&self.args);
        let mut child = command.spawn().map_err(|e| {
            Error::Execution(format!(
                "Failed to start {:?}: {}",
                self.executable_path, e
            ))
        })?;

        // Drain stdout and stderr while the process runs, so neither pipe
        // fills up and stalls the child.
        let stdout_handle = child
            .stdout
            .take()
            .ok_or_else(|| Error::Execution("Failed to capture stdout".to_string()))?;
        let stderr_handle = child
            .stderr
            .take()
            .ok_or_else(|| Error::Execution("Failed to capture stderr".to_string()))?;

        let stdout_task = tokio::spawn(async move {
            let mut buffer = Vec::new();
            tokio::io::copy(&mut tokio::io::BufReader::new(stdout_handle), &mut buffer).await?;
            Ok::<Vec<u8>, std::io::Error>(buffer)
        });

        let stderr_task = tokio::spawn(async move {
            let mut buffer = Vec::new();
            tokio::io::copy(&mut tokio::io::BufReader::new(stderr_handle), &mut buffer).await?;
            Ok::<Vec<u8>, std::io::Error>(buffer)
        });

        // Wait for the process to finish with timeout
        let exit_status = match tokio::time::timeout(self.timeout, child.wait()).await {
            Ok(result) => result?,
            Err(_) => {
                log::warn!("Process timed out after {:?}, killing it", self.timeout);

                if let Err(e) = child.kill().await {
                    log::error!("Failed to kill process after timeout: {}", e);
                }

                return Err(Error::Timeout(self.timeout));
            }
        };

        let stdout_result = match stdout_task.await {
            Ok(Ok(buffer)) => buffer,
            Ok(Err(e)) => return Err(Error::Io(e)),
            Err(e) => return Err(Error::Runtime(e)),
        };

        let stderr_result = match stderr_task.await {
            Ok(Ok(buffer)) => buffer,
            Ok(Err(e)) => return Err(Error::Io(e)),
            Err(e) => return Err(Error::Runtime(e)),
        };

        let stdout = String::from_utf8(stdout_result)
            .map_err(|_| Error::Execution("Failed to parse stdout as UTF-8".to_string()))?;
        // stderr is diagnostics only, invalid UTF-8 is tolerated there.
        let stderr = String::from_utf8_lossy(&stderr_result).into_owned();

        let code = exit_status.code().unwrap_or(-1);
        Ok(ProcessOutput {
            stdout,
            stderr,
            code,
        })
    }
}
