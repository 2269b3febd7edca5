use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::path::Path;
use std::time::Duration;

use super::{SpeechEngine, SpeechError};
use crate::config::SpeechSettings;

/// OpenAI-compatible `/audio/speech` endpoint.
#[derive(Clone)]
pub struct HttpSpeechEngine {
    client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

#[derive(Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    response_format: &'a str,
}

impl From<&SpeechSettings> for HttpSpeechEngine {
    fn from(settings: &SpeechSettings) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(settings.timeout_secs))
                .build()
                .unwrap_or_default(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            api_key: settings.api_key.clone().filter(|k| !k.trim().is_empty()),
        }
    }
}

#[async_trait]
impl SpeechEngine for HttpSpeechEngine {
    async fn synthesize(&self, text: &str, voice: &str, output: &Path) -> Result<(), SpeechError> {
        let api_key = self.api_key.as_deref().ok_or(SpeechError::NoCredentials)?;

        let body = SpeechRequest {
            model: &self.model,
            input: text,
            voice,
            response_format: "mp3",
        };

        let response = self
            .client
            .post(format!("{}/audio/speech", self.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| SpeechError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(SpeechError::Request(format!("HTTP {}: {}", status, detail)));
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| SpeechError::Request(e.to_string()))?;
        tokio::fs::write(output, &audio).await?;
        Ok(())
    }
}
