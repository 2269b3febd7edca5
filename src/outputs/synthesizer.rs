use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use super::retry::{AttemptFailure, RetryPolicy};
use crate::config::SpeechSettings;
use crate::script::types::{DialogueSegment, Speaker};
use crate::services::tts::SpeechEngine;

/// Segments with less trimmed text than this are not worth a request.
const MIN_SPEAKABLE_CHARS: usize = 3;

/// Speaker to voice identity. The two voices must differ.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceMap {
    pub host: String,
    pub expert: String,
}

impl VoiceMap {
    pub fn voice_for(&self, speaker: Speaker) -> &str {
        match speaker {
            Speaker::Host => &self.host,
            Speaker::Expert => &self.expert,
        }
    }
}

impl Default for VoiceMap {
    fn default() -> Self {
        Self::from(&SpeechSettings::default())
    }
}

impl From<&SpeechSettings> for VoiceMap {
    fn from(settings: &SpeechSettings) -> Self {
        Self {
            host: settings.host_voice.clone(),
            expert: settings.expert_voice.clone(),
        }
    }
}

/// Synthesized speech for exactly one dialogue segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    pub path: PathBuf,
    /// Position of the source segment in the full dialogue.
    pub index: usize,
    pub speaker: Speaker,
}

impl AudioClip {
    /// `segment_007_EXPERT.mp3`
    pub fn file_name(index: usize, speaker: Speaker) -> String {
        format!("segment_{:03}_{}.mp3", index, speaker)
    }
}

pub struct SpeechSynthesizer {
    engine: Arc<dyn SpeechEngine>,
    voices: VoiceMap,
    retry: RetryPolicy,
}

impl SpeechSynthesizer {
    pub fn new(engine: Arc<dyn SpeechEngine>, voices: VoiceMap, retry: RetryPolicy) -> Self {
        Self { engine, voices, retry }
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Renders every speakable segment, in order, into `output_dir`.
    ///
    /// Segments that never yield an acceptable clip are logged and left out;
    /// this never fails the conversion.
    pub async fn synthesize(
        &self,
        dialogue: &[DialogueSegment],
        output_dir: &Path,
    ) -> std::io::Result<Vec<AudioClip>> {
        tokio::fs::create_dir_all(output_dir).await?;
        info!("Generating audio for {} segments", dialogue.len());

        let mut clips = Vec::new();
        for (index, segment) in dialogue.iter().enumerate() {
            let text = segment.text.trim();
            if text.chars().count() < MIN_SPEAKABLE_CHARS {
                info!("Skipping empty segment {}", index + 1);
                continue;
            }

            let preview: String = text.chars().take(50).collect();
            info!("[{}/{}] {}: {}...", index + 1, dialogue.len(), segment.speaker, preview);

            let path = output_dir.join(AudioClip::file_name(index, segment.speaker));
            if self.synthesize_segment(text, segment.speaker, &path).await {
                clips.push(AudioClip {
                    path,
                    index,
                    speaker: segment.speaker,
                });
            } else {
                warn!(
                    segment = index + 1,
                    "Failed after {} attempts, skipping segment", self.retry.max_attempts
                );
            }
        }

        info!("Successfully generated {} audio segments", clips.len());
        Ok(clips)
    }

    #[tracing::instrument(skip(self, text, speaker, path), fields(speaker = %speaker))]
    async fn synthesize_segment(&self, text: &str, speaker: Speaker, path: &Path) -> bool {
        let voice = self.voices.voice_for(speaker);

        for attempt in 1..=self.retry.max_attempts {
            let failure = match self.engine.synthesize(text, voice, path).await {
                Ok(()) => {
                    let size = tokio::fs::metadata(path).await.map(|m| m.len()).ok();
                    match size {
                        Some(bytes) if self.retry.accepts(bytes) => {
                            info!("Generated ({} bytes)", bytes);
                            return true;
                        }
                        _ => {
                            warn!("File too small (attempt {})", attempt);
                            AttemptFailure::TooSmall
                        }
                    }
                }
                Err(e) => {
                    warn!("Error (attempt {}): {}", attempt, e);
                    AttemptFailure::EngineError
                }
            };

            if let Some(delay) = self.retry.backoff_after(attempt, failure) {
                tokio::time::sleep(delay).await;
            }
        }

        false
    }
}
