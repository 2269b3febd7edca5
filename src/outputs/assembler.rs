use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{info, warn};

use crate::config::AssemblySettings;

#[derive(Debug, thiserror::Error)]
pub enum AssemblyError {
    #[error("concat tool could not be launched: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("concat tool timed out after {0:?}")]
    Timeout(Duration),
    #[error("concat tool exited with {status}: {stderr}")]
    ToolFailed { status: String, stderr: String },
    #[error("concat tool reported success but {0} is missing")]
    MissingOutput(PathBuf),
    #[error("no clip to copy from: {0}")]
    MissingClip(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// One rung of the assembly ladder.
#[async_trait]
pub trait AssemblyStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Writes the combined audio to `output`.
    async fn assemble(&self, clips: &[PathBuf], output: &Path) -> Result<(), AssemblyError>;
}

/// `<dir>/<stem>_filelist.txt` next to the output.
pub fn manifest_path(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "podcast".to_string());
    output.with_file_name(format!("{}_filelist.txt", stem))
}

/// Concat demuxer manifest: one `file '<absolute path>'` line per clip.
pub fn manifest_contents(clips: &[PathBuf]) -> String {
    clips
        .iter()
        .map(|clip| {
            let absolute = std::path::absolute(clip).unwrap_or_else(|_| clip.clone());
            let normalized = absolute.to_string_lossy().replace('\\', "/");
            format!("file '{}'\n", normalized)
        })
        .collect()
}

/// Codec-level stream copy through `ffmpeg -f concat`.
#[derive(Debug, Clone)]
pub struct StreamCopyConcat {
    binary: String,
    timeout: Duration,
}

impl StreamCopyConcat {
    pub fn new(binary: impl Into<String>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            timeout,
        }
    }

    async fn run(&self, manifest: &Path, output: &Path) -> Result<(), AssemblyError> {
        let child = Command::new(&self.binary)
            .args(["-f", "concat", "-safe", "0", "-i"])
            .arg(manifest)
            .args(["-c", "copy", "-y"])
            .arg(output)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(AssemblyError::Spawn)?;

        let result = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| AssemblyError::Timeout(self.timeout))??;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(AssemblyError::ToolFailed {
                status: result.status.to_string(),
                stderr: stderr.chars().take(500).collect(),
            });
        }
        if !tokio::fs::try_exists(output).await.unwrap_or(false) {
            return Err(AssemblyError::MissingOutput(output.to_path_buf()));
        }
        Ok(())
    }
}

#[async_trait]
impl AssemblyStrategy for StreamCopyConcat {
    fn name(&self) -> &'static str {
        "stream-copy"
    }

    async fn assemble(&self, clips: &[PathBuf], output: &Path) -> Result<(), AssemblyError> {
        let manifest = manifest_path(output);
        tokio::fs::write(&manifest, manifest_contents(clips)).await?;
        info!("Created file list with {} entries", clips.len());

        let result = self.run(&manifest, output).await;

        if let Err(e) = tokio::fs::remove_file(&manifest).await {
            warn!("Could not remove manifest {}: {}", manifest.display(), e);
        }
        result
    }
}

/// Appends clip bytes back to back. Same-codec MP3 clips usually still play.
#[derive(Debug, Clone, Default)]
pub struct RawConcat;

#[async_trait]
impl AssemblyStrategy for RawConcat {
    fn name(&self) -> &'static str {
        "raw-concat"
    }

    async fn assemble(&self, clips: &[PathBuf], output: &Path) -> Result<(), AssemblyError> {
        let mut out = tokio::fs::File::create(output).await?;
        for (i, clip) in clips.iter().enumerate() {
            info!("  Appending {}/{}: {}", i + 1, clips.len(), clip.display());
            let bytes = tokio::fs::read(clip).await?;
            out.write_all(&bytes).await?;
        }
        out.flush().await?;
        Ok(())
    }
}

/// Last resort: the first clip alone.
#[derive(Debug, Clone, Default)]
pub struct FirstClipOnly;

#[async_trait]
impl AssemblyStrategy for FirstClipOnly {
    fn name(&self) -> &'static str {
        "first-clip"
    }

    async fn assemble(&self, clips: &[PathBuf], output: &Path) -> Result<(), AssemblyError> {
        let first = clips
            .first()
            .ok_or_else(|| AssemblyError::MissingClip(PathBuf::new()))?;
        if !tokio::fs::try_exists(first).await.unwrap_or(false) {
            return Err(AssemblyError::MissingClip(first.clone()));
        }
        tokio::fs::copy(first, output).await?;
        Ok(())
    }
}

/// Combines ordered clips into one file, walking down the strategy list
/// until one succeeds.
pub struct AudioAssembler {
    strategies: Vec<Box<dyn AssemblyStrategy>>,
}

impl AudioAssembler {
    pub fn new(strategies: Vec<Box<dyn AssemblyStrategy>>) -> Self {
        Self { strategies }
    }

    /// Stream copy, then raw concatenation, then first clip only.
    pub fn with_concat_tool(binary: impl Into<String>, timeout: Duration) -> Self {
        Self::new(vec![
            Box::new(StreamCopyConcat::new(binary, timeout)),
            Box::new(RawConcat),
            Box::new(FirstClipOnly),
        ])
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Returns the output path, or `None` when there is nothing to combine
    /// or every strategy failed.
    pub async fn combine(&self, clips: &[PathBuf], output: &Path) -> Option<PathBuf> {
        if clips.is_empty() {
            warn!("No audio files to combine");
            return None;
        }

        info!("Combining {} audio segments into {}", clips.len(), output.display());
        for strategy in &self.strategies {
            match strategy.assemble(clips, output).await {
                Ok(()) => {
                    let size = tokio::fs::metadata(output).await.map(|m| m.len()).unwrap_or(0);
                    info!(strategy = strategy.name(), "Combined audio ({} bytes)", size);
                    return Some(output.to_path_buf());
                }
                Err(e) => warn!(strategy = strategy.name(), "Assembly step failed: {}", e),
            }
        }

        None
    }
}

impl From<&AssemblySettings> for AudioAssembler {
    fn from(settings: &AssemblySettings) -> Self {
        Self::with_concat_tool(
            settings.ffmpeg_binary.clone(),
            Duration::from_secs(settings.timeout_secs),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_sits_next_to_output() {
        let path = manifest_path(Path::new("out/show.mp3"));
        assert_eq!(path, PathBuf::from("out/show_filelist.txt"));
    }

    #[test]
    fn manifest_lists_absolute_paths_in_order() {
        let clips = vec![PathBuf::from("/tmp/a.mp3"), PathBuf::from("/tmp/b.mp3")];
        assert_eq!(manifest_contents(&clips), "file '/tmp/a.mp3'\nfile '/tmp/b.mp3'\n");
    }

    #[test]
    fn default_ladder_order() {
        let assembler = AudioAssembler::from(&AssemblySettings::default());
        assert_eq!(assembler.strategy_names(), vec!["stream-copy", "raw-concat", "first-clip"]);
    }
}
