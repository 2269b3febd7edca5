use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::Preferences;
use crate::script::fallback::fallback_script;
use crate::script::prompt::build_prompt;
use crate::services::llm::{GenerationError, GenerationRequest, TextGenerator};

const PREVIEW_CHARS: usize = 500;

/// Turns a generation outcome into a usable script.
///
/// Every failure variant degrades to the fallback script built from `text`;
/// callers never see a generation error.
pub fn resolve_script(outcome: Result<String, GenerationError>, text: &str) -> String {
    match outcome {
        Ok(script) => script,
        Err(GenerationError::NoCredentials) => {
            warn!("Generation client has no credentials, using fallback script");
            fallback_script(text)
        }
        Err(GenerationError::RateLimited) => {
            warn!("Generation endpoint rate limited (429), using fallback script");
            fallback_script(text)
        }
        Err(GenerationError::Other(cause)) => {
            warn!("Generation failed: {}, using fallback script", cause);
            fallback_script(text)
        }
    }
}

/// Drives one remote generation call per section.
#[derive(Clone)]
pub struct ScriptGenerator {
    generator: Arc<dyn TextGenerator>,
}

impl ScriptGenerator {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// The request this generator would send for a section.
    pub fn request_for(
        text: &str,
        preferences: &Preferences,
        section_index: usize,
        total_sections: usize,
    ) -> GenerationRequest {
        GenerationRequest {
            prompt: build_prompt(text, preferences, section_index, total_sections),
            temperature: preferences.temperature(),
            max_tokens: preferences.length.max_tokens(),
        }
    }

    /// Raw generation outcome, failures included.
    pub async fn try_generate(
        &self,
        text: &str,
        preferences: &Preferences,
        section_index: usize,
        total_sections: usize,
    ) -> Result<String, GenerationError> {
        let request = Self::request_for(text, preferences, section_index, total_sections);
        info!(
            tone = %preferences.tone,
            max_tokens = request.max_tokens,
            "Generating script for section {}/{}",
            section_index,
            total_sections
        );

        let script = self.generator.generate(&request).await?;
        let preview: String = script.chars().take(PREVIEW_CHARS).collect();
        debug!(chars = script.chars().count(), "Raw script preview:\n{}", preview);
        Ok(script)
    }

    /// Script for a section; falls back to the fixed template on any failure.
    #[tracing::instrument(
        skip(self, text, preferences),
        fields(section = section_index, total = total_sections)
    )]
    pub async fn generate(
        &self,
        text: &str,
        preferences: &Preferences,
        section_index: usize,
        total_sections: usize,
    ) -> String {
        let outcome = self
            .try_generate(text, preferences, section_index, total_sections)
            .await;
        resolve_script(outcome, text)
    }
}
