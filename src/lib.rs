//! Read and rewrite audio container tags through an external ffmpeg binary.
//!
//! The crate never touches the tag bytes itself: reading exports the
//! container metadata as ffmetadata text (`ffmpeg -i <input> -f ffmetadata -`)
//! and writing remuxes the file with new `-metadata` pairs while copying the
//! audio stream verbatim. The remuxed file is written to a private scratch
//! directory and swapped into place only once the tool has produced it.
//!
//! # Examples
//!
//! ```rust,no_run
//! # use ffmeta::Tagger;
//! # use ffmeta::resolver::ToolConfig;
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let tagger = Tagger::from_config(&ToolConfig::default())?;
//!
//! let mut tags = tagger.read_metadata("track.mp3").await?;
//! tags.title = "New title".to_string();
//!
//! tagger.write_metadata(&tags, "track.mp3").await?;
//! # Ok(())
//! # }
//! ```

use crate::error::{Error, Result};
use crate::executor::Executor;
use crate::metadata::TrackMetadata;
use crate::resolver::ToolConfig;
use crate::utils::file_system;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub mod error;
pub mod executor;
pub mod metadata;
pub mod resolver;
pub mod utils;

/// Rewrites container metadata by remuxing through an external ffmpeg binary.
///
/// A `Tagger` is a plain caller-owned value: its fields are resolved once at
/// construction and treated as read-only configuration afterwards. It holds
/// no other state, so cloning is cheap and calls do not interfere with each
/// other - though overlapping calls against the *same file* are the caller's
/// responsibility to avoid.
#[derive(Clone, Debug)]
pub struct Tagger {
    /// The resolved path to the ffmpeg executable.
    pub ffmpeg: PathBuf,
    /// The directory where remux outputs are written before the swap.
    pub scratch_dir: PathBuf,
    /// The timeout for command execution.
    pub timeout: Duration,
}

impl fmt::Display for Tagger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Tagger: ffmpeg={:?}, scratch_dir={:?}",
            self.ffmpeg, self.scratch_dir
        )
    }
}

impl Tagger {
    /// Creates a new tagger using the given ffmpeg executable.
    ///
    /// # Errors
    ///
    /// This function will return an error if the scratch directory could
    /// not be created.
    pub fn new(ffmpeg: impl AsRef<Path>) -> Result<Self> {
        let scratch_dir = std::env::temp_dir().join("ffmeta");
        file_system::create_dir(&scratch_dir)?;

        Ok(Self {
            ffmpeg: ffmpeg.as_ref().to_path_buf(),
            scratch_dir,
            timeout: Duration::from_secs(120),
        })
    }

    /// Creates a new tagger, resolving the ffmpeg executable from the
    /// given configuration.
    ///
    /// # Errors
    ///
    /// This function will return an error if no ffmpeg executable could be
    /// located, or if the scratch directory could not be created.
    pub fn from_config(config: &ToolConfig) -> Result<Self> {
        let ffmpeg = config.resolve()?;
        log::debug!("Resolved ffmpeg executable: {:?}", ffmpeg);

        Self::new(ffmpeg)
    }

    /// Sets the timeout for command execution.
    pub fn with_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.timeout = timeout;
        self
    }

    /// Sets the scratch directory for remux outputs, creating it if needed.
    ///
    /// # Errors
    ///
    /// This function will return an error if the directory could not be
    /// created.
    pub fn with_scratch_dir(&mut self, dir: impl AsRef<Path>) -> Result<&mut Self> {
        file_system::create_dir(&dir)?;
        self.scratch_dir = dir.as_ref().to_path_buf();

        Ok(self)
    }

    /// Reads the editable tags of the given media file.
    ///
    /// The file's container type is not validated up front; if the tool
    /// cannot handle it, the failure surfaces as [`Error::Execution`] with
    /// the tool's own diagnostic text.
    ///
    /// # Errors
    ///
    /// This function will return an error if the file is not accessible,
    /// or if the tool could not be run or exited abnormally.
    pub async fn read_metadata(&self, path: impl AsRef<Path>) -> Result<TrackMetadata> {
        let path = path.as_ref();
        log::debug!("Reading metadata from {:?}", path);

        ensure_access(path, false).await?;
        let input = path_str(path)?;

        let executor = Executor {
            executable_path: self.ffmpeg.clone(),
            timeout: self.timeout,
            args: utils::to_owned(vec!["-i", input, "-f", "ffmetadata", "-"]),
        };

        let output = executor.execute().await?;
        if !output.success() {
            return Err(Error::Execution(format!(
                "ffmpeg exited with code {}: {}",
                output.code,
                output.stderr.trim()
            )));
        }

        Ok(TrackMetadata::parse_ffmetadata(&output.stdout))
    }

    /// Writes the given tags back into the media file, copying the audio
    /// stream verbatim.
    ///
    /// Empty fields are omitted from the invocation, meaning "do not set
    /// this tag". The remuxed file replaces the original only after the
    /// tool has verifiably produced it; until then the target is untouched.
    ///
    /// # Errors
    ///
    /// This function will return an error if the file is not accessible,
    /// if the tool failed or produced no output, or if the final swap into
    /// place failed. In the last case the remuxed copy is kept on disk and
    /// its path is reported in the error.
    pub async fn write_metadata(
        &self,
        metadata: &TrackMetadata,
        path: impl AsRef<Path>,
    ) -> Result<PathBuf> {
        let path = path.as_ref();
        log::debug!("Writing {} to {:?}", metadata, path);

        ensure_access(path, true).await?;
        let input = path_str(path)?;

        let temp = self.scratch_path_for(path);
        let temp_str = path_str(&temp)?;

        let mut args = vec!["-i".to_string(), input.to_string()];
        args.extend(metadata.ffmpeg_args());
        args.extend(utils::to_owned(vec!["-codec", "copy", "-y"]));
        args.push(temp_str.to_string());

        let executor = Executor {
            executable_path: self.ffmpeg.clone(),
            timeout: self.timeout,
            args,
        };

        // stderr is diagnostics only here, the tool is chatty by design.
        let output = executor.execute().await?;
        if !output.success() {
            file_system::remove_temp_file(&temp).await;
            return Err(Error::Execution(format!(
                "ffmpeg exited with code {}: {}",
                output.code,
                output.stderr.trim()
            )));
        }

        // The exit code is not fully trustworthy, the output file is the
        // real signal of success.
        if !temp.exists() {
            return Err(Error::OutputMissing(temp));
        }

        self.replace_target(&temp, path).await?;
        Ok(path.to_path_buf())
    }

    /// Allocates a fresh temp output path in the scratch directory, keeping
    /// the target's extension so the tool can infer the output muxer.
    fn scratch_path_for(&self, target: &Path) -> PathBuf {
        let name = match target.extension().and_then(|e| e.to_str()) {
            Some(ext) => format!("{}.{}", file_system::random_filename(16), ext),
            None => file_system::random_filename(16),
        };

        self.scratch_dir.join(name)
    }

    /// Swaps the remuxed file into place.
    ///
    /// The original is renamed aside to a backup sibling first, so a failed
    /// swap can restore it instead of losing the target. The backup is
    /// deleted only once the new file is in place.
    async fn replace_target(&self, temp: &Path, target: &Path) -> Result<()> {
        let backup = backup_path_for(target)?;

        let replace_err = |source: std::io::Error| Error::Replace {
            target: target.to_path_buf(),
            temp: temp.to_path_buf(),
            source,
        };

        tokio::fs::rename(target, &backup)
            .await
            .map_err(replace_err)?;

        // The scratch dir may live on another filesystem, where a rename
        // fails with EXDEV; fall back to copy + delete.
        let moved = match tokio::fs::rename(temp, target).await {
            Ok(()) => Ok(()),
            Err(_) => match tokio::fs::copy(temp, target).await {
                Ok(_) => {
                    file_system::remove_temp_file(temp).await;
                    Ok(())
                }
                Err(e) => Err(e),
            },
        };

        if let Err(e) = moved {
            if tokio::fs::rename(&backup, target).await.is_err() {
                log::error!(
                    "Failed to restore {:?} from backup {:?} after a failed swap",
                    target,
                    backup
                );
            }
            return Err(replace_err(e));
        }

        file_system::remove_temp_file(&backup).await;
        Ok(())
    }
}

fn path_str(path: &Path) -> Result<&str> {
    path.to_str()
        .ok_or(Error::Path(format!("Invalid path: {:?}", path)))
}

/// Picks a unique backup sibling for the target, on the same filesystem so
/// the rename aside is atomic.
fn backup_path_for(target: &Path) -> Result<PathBuf> {
    let name = target
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or(Error::Path(format!("Invalid target path: {:?}", target)))?;

    let parent = file_system::try_parent(target)?;
    Ok(parent.join(format!(
        ".{}.{}.bak",
        name,
        file_system::random_filename(8)
    )))
}

/// Verifies the caller-granted access to the target before invoking the
/// tool, so permission problems surface as [`Error::AccessDenied`] instead
/// of an opaque tool diagnostic.
async fn ensure_access(path: &Path, write: bool) -> Result<()> {
    let mut options = tokio::fs::OpenOptions::new();
    options.read(true);
    if write {
        options.write(true);
    }

    match options.open(path).await {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            Err(Error::AccessDenied(path.to_path_buf()))
        }
        Err(e) => Err(Error::Io(e)),
    }
}
