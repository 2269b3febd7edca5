use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use super::error::PipelineError;
use crate::config::{Length, PipelineSettings, Preferences, Settings};
use crate::outputs::{
    save_transcript, transcript_path, AudioAssembler, RetryPolicy, SpeechSynthesizer, VoiceMap,
};
use crate::script::{parse_dialogue, DialogueSegment, ScriptGenerator};
use crate::services::llm::{ClientConfig, LLMService};
use crate::services::tts::engine_from_settings;
use crate::text::{chunk_text, into_sections, DocumentExtractor, TextExtractor};

/// What a conversion hands back to its caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionResult {
    pub final_audio_path: Option<PathBuf>,
    pub transcript: Vec<DialogueSegment>,
}

impl ConversionResult {
    /// The assembled audio, or `NoAudio` when not a single clip was produced.
    pub fn require_audio(&self) -> Result<&Path, PipelineError> {
        self.final_audio_path.as_deref().ok_or(PipelineError::NoAudio)
    }
}

/// Sequences extraction, scripting, synthesis and assembly for one document.
pub struct Converter {
    extractor: Arc<dyn TextExtractor>,
    scripts: ScriptGenerator,
    synthesizer: SpeechSynthesizer,
    assembler: AudioAssembler,
    settings: PipelineSettings,
}

impl Converter {
    pub fn new(
        extractor: Arc<dyn TextExtractor>,
        scripts: ScriptGenerator,
        synthesizer: SpeechSynthesizer,
        assembler: AudioAssembler,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            extractor,
            scripts,
            synthesizer,
            assembler,
            settings,
        }
    }

    /// Wires the production collaborators described by `settings`.
    pub fn from_settings(settings: &Settings) -> Self {
        let llm = LLMService::new(ClientConfig::from(&settings.generation));
        if !llm.has_credentials() {
            warn!("No generation API key configured; every section will use the fallback script");
        }
        info!("Using {} for script generation", llm.model());

        let synthesizer = SpeechSynthesizer::new(
            engine_from_settings(&settings.speech),
            VoiceMap::from(&settings.speech),
            RetryPolicy::from(&settings.pipeline.retry),
        );

        Self::new(
            Arc::new(DocumentExtractor::default()),
            ScriptGenerator::new(Arc::new(llm)),
            synthesizer,
            AudioAssembler::from(&settings.assembly),
            settings.pipeline.clone(),
        )
    }

    /// Section cap for the requested length.
    pub fn max_chunks(&self, preferences: &Preferences) -> usize {
        match preferences.length {
            Length::Short => self.settings.max_chunks_short,
            _ => self.settings.max_chunks_default,
        }
    }

    /// Generates and parses the dialogue for `text`, section by section.
    ///
    /// Sections run strictly in order: each prompt depends on its position.
    pub async fn script_document(
        &self,
        text: &str,
        preferences: &Preferences,
    ) -> Vec<DialogueSegment> {
        let chunks = chunk_text(text, preferences.length.chunk_chars());
        let natural = chunks.len();
        let sections = into_sections(chunks, self.max_chunks(preferences));
        if sections.len() < natural {
            info!("Document has {} sections, keeping the first {}", natural, sections.len());
        }
        info!("Processing {} section(s)", sections.len());

        let mut transcript = Vec::new();
        for section in &sections {
            let script = self
                .scripts
                .generate(&section.text, preferences, section.index, section.total)
                .await;
            transcript.extend(parse_dialogue(&script));

            if !section.is_last() {
                tokio::time::sleep(self.settings.inter_chunk_delay()).await;
            }
        }
        transcript
    }

    /// Converts `document` into an episode at `output`.
    ///
    /// The transcript is persisted next to the audio as `<stem>_script.json`
    /// and always returned, even when no audio could be assembled.
    #[tracing::instrument(
        skip(self, document, preferences),
        fields(document = %document.display())
    )]
    pub async fn convert(
        &self,
        document: &Path,
        output: &Path,
        preferences: &Preferences,
        max_pages: Option<usize>,
    ) -> Result<ConversionResult, PipelineError> {
        info!(
            tone = %preferences.tone,
            length = %preferences.length,
            depth = %preferences.depth,
            humor = preferences.humor,
            "Extracting text"
        );

        let mut text = self.extractor.extract(document).await?;
        // A zero page cap means no cap.
        if let Some(pages) = max_pages.filter(|&pages| pages > 0) {
            let budget = pages.saturating_mul(self.settings.chars_per_page);
            if let Some((cut, _)) = text.char_indices().nth(budget) {
                text.truncate(cut);
            }
        }
        if text.trim().is_empty() {
            return Err(PipelineError::NoText(document.to_path_buf()));
        }
        info!("Extracted {} characters", text.chars().count());

        let transcript = self.script_document(&text, preferences).await;

        let output_dir = match output.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        tokio::fs::create_dir_all(&output_dir).await?;

        let script_path = transcript_path(output);
        save_transcript(&transcript, &script_path).await?;
        info!("Script saved to {}", script_path.display());

        let stem = output
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "podcast".to_string());
        let job_id = Uuid::new_v4().simple().to_string();
        let clip_dir = output_dir.join(format!("{}_segments_{}", stem, job_id));

        let clips = self.synthesizer.synthesize(&transcript, &clip_dir).await?;
        if clips.is_empty() {
            warn!(job = %job_id, "No audio clip could be synthesized");
        }

        let clip_paths: Vec<PathBuf> = clips.into_iter().map(|clip| clip.path).collect();
        let final_audio_path = self.assembler.combine(&clip_paths, output).await;

        Ok(ConversionResult {
            final_audio_path,
            transcript,
        })
    }
}
