use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use super::{SpeechEngine, SpeechError};
use crate::config::SpeechSettings;

/// Drives the `edge-tts` command line tool.
#[derive(Debug, Clone)]
pub struct EdgeTtsEngine {
    binary: String,
    timeout: Duration,
}

impl EdgeTtsEngine {
    pub fn new(binary: impl Into<String>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            timeout,
        }
    }
}

impl From<&SpeechSettings> for EdgeTtsEngine {
    fn from(settings: &SpeechSettings) -> Self {
        Self::new(
            settings.edge_tts_binary.clone(),
            Duration::from_secs(settings.timeout_secs),
        )
    }
}

#[async_trait]
impl SpeechEngine for EdgeTtsEngine {
    async fn synthesize(&self, text: &str, voice: &str, output: &Path) -> Result<(), SpeechError> {
        let child = Command::new(&self.binary)
            .arg("--voice")
            .arg(voice)
            .arg("--text")
            .arg(text)
            .arg("--write-media")
            .arg(output)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(SpeechError::Spawn)?;

        let result = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| SpeechError::Timeout(self.timeout))??;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(SpeechError::EngineFailed {
                status: result.status.to_string(),
                stderr: stderr.chars().take(500).collect(),
            });
        }
        Ok(())
    }
}
