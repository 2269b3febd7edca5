//! Speech engines. Each one renders a single utterance into an audio file.

pub mod edge;
pub mod http;

pub use edge::EdgeTtsEngine;
pub use http::HttpSpeechEngine;

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

use crate::config::{SpeechEngineKind, SpeechSettings};

#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    #[error("no API credentials configured for speech engine")]
    NoCredentials,
    #[error("speech engine timed out after {0:?}")]
    Timeout(std::time::Duration),
    #[error("failed to launch speech engine: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("speech engine exited with {status}: {stderr}")]
    EngineFailed { status: String, stderr: String },
    #[error("speech request failed: {0}")]
    Request(String),
    #[error("failed to write clip: {0}")]
    Io(#[from] std::io::Error),
}

/// Remote or local text-to-speech capability.
#[async_trait]
pub trait SpeechEngine: Send + Sync {
    /// Renders `text` spoken by `voice` into the file at `output`.
    async fn synthesize(&self, text: &str, voice: &str, output: &Path) -> Result<(), SpeechError>;
}

/// Builds the engine selected in configuration.
pub fn engine_from_settings(settings: &SpeechSettings) -> Arc<dyn SpeechEngine> {
    match settings.engine {
        SpeechEngineKind::EdgeTts => Arc::new(EdgeTtsEngine::from(settings)),
        SpeechEngineKind::Http => Arc::new(HttpSpeechEngine::from(settings)),
    }
}
