use ::config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use super::ConfigError;

/// Runtime configuration for the whole pipeline.
///
/// Priority (highest to lowest):
/// 1. Environment variables (`NOTECAST_` prefix, `__` between sections)
/// 2. An explicit config file, when given
/// 3. `notecast.toml` in the working directory, when present
/// 4. Built-in defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub generation: GenerationSettings,
    pub speech: SpeechSettings,
    pub assembly: AssemblySettings,
    pub pipeline: PipelineSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    /// OpenAI-compatible API root, without the trailing `/chat/completions`.
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com/openai/v1".to_string(),
            model: "llama-3.1-8b-instant".to_string(),
            api_key: None,
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpeechEngineKind {
    #[default]
    EdgeTts,
    Http,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechSettings {
    pub engine: SpeechEngineKind,
    pub edge_tts_binary: String,
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub host_voice: String,
    pub expert_voice: String,
    pub timeout_secs: u64,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            engine: SpeechEngineKind::EdgeTts,
            edge_tts_binary: "edge-tts".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            model: "tts-1".to_string(),
            api_key: None,
            host_voice: "en-US-GuyNeural".to_string(),
            expert_voice: "en-US-JennyNeural".to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblySettings {
    pub ffmpeg_binary: String,
    pub timeout_secs: u64,
}

impl Default for AssemblySettings {
    fn default() -> Self {
        Self {
            ffmpeg_binary: "ffmpeg".to_string(),
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    /// Character budget per page when a page cap is requested.
    pub chars_per_page: usize,
    /// Chunk cap for `length = short`.
    pub max_chunks_short: usize,
    /// Chunk cap for every other length.
    pub max_chunks_default: usize,
    pub inter_chunk_delay_ms: u64,
    pub retry: RetrySettings,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            chars_per_page: 3000,
            max_chunks_short: 1,
            max_chunks_default: 2,
            inter_chunk_delay_ms: 500,
            retry: RetrySettings::default(),
        }
    }
}

impl PipelineSettings {
    pub fn inter_chunk_delay(&self) -> Duration {
        Duration::from_millis(self.inter_chunk_delay_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub too_small_backoff_ms: u64,
    pub error_backoff_ms: u64,
    pub min_clip_bytes: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            too_small_backoff_ms: 1000,
            error_backoff_ms: 2000,
            min_clip_bytes: 1000,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pipeline.max_chunks_short == 0 || self.pipeline.max_chunks_default == 0 {
            return Err(ConfigError::InvalidValue {
                field: "pipeline.max_chunks".to_string(),
                message: "chunk caps must be at least 1".to_string(),
            });
        }
        if self.pipeline.chars_per_page == 0 {
            return Err(ConfigError::InvalidValue {
                field: "pipeline.chars_per_page".to_string(),
                message: "must be positive".to_string(),
            });
        }
        if self.pipeline.retry.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "pipeline.retry.max_attempts".to_string(),
                message: "at least one attempt is required".to_string(),
            });
        }
        for (field, secs) in [
            ("generation.timeout_secs", self.generation.timeout_secs),
            ("speech.timeout_secs", self.speech.timeout_secs),
            ("assembly.timeout_secs", self.assembly.timeout_secs),
        ] {
            if secs == 0 {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    message: "timeouts must be positive".to_string(),
                });
            }
        }
        if self.speech.host_voice == self.speech.expert_voice {
            return Err(ConfigError::InvalidValue {
                field: "speech.expert_voice".to_string(),
                message: "HOST and EXPERT need distinct voices".to_string(),
            });
        }
        Ok(())
    }
}

/// Loads settings from the layered sources and fills API keys from the
/// conventional provider variables when the config leaves them unset.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    builder = builder.add_source(File::with_name("notecast").required(false));

    if let Some(path) = path {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }
        builder = builder.add_source(File::from(path).required(true));
    }

    builder = builder.add_source(
        Environment::with_prefix("NOTECAST")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let mut settings: Settings = builder.build()?.try_deserialize()?;

    if settings.generation.api_key.is_none() {
        settings.generation.api_key = non_empty_env("GROQ_API_KEY");
    }
    if settings.speech.api_key.is_none() {
        settings.speech.api_key = non_empty_env("OPENAI_API_KEY");
    }

    settings.validate()?;
    Ok(settings)
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.generation.model, "llama-3.1-8b-instant");
        assert_eq!(settings.speech.engine, SpeechEngineKind::EdgeTts);
        assert_eq!(settings.assembly.timeout_secs, 60);
        assert_eq!(settings.pipeline.max_chunks_short, 1);
        assert_eq!(settings.pipeline.max_chunks_default, 2);
        assert_eq!(settings.pipeline.retry.max_attempts, 2);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_settings_validation() {
        let mut settings = Settings::default();
        settings.pipeline.max_chunks_default = 0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.speech.expert_voice = settings.speech.host_voice.clone();
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.assembly.timeout_secs = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_reported() {
        let err = load_settings(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }
}
