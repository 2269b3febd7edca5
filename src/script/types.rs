use serde::{Deserialize, Serialize};
use std::fmt;

/// The two voices of the show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Speaker {
    Host,
    Expert,
}

impl Speaker {
    pub fn as_str(&self) -> &'static str {
        match self {
            Speaker::Host => "HOST",
            Speaker::Expert => "EXPERT",
        }
    }

    /// Line prefix the generator is told to emit, e.g. `HOST:`.
    pub fn marker(&self) -> &'static str {
        match self {
            Speaker::Host => "HOST:",
            Speaker::Expert => "EXPERT:",
        }
    }
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One speaker-attributed utterance of the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueSegment {
    pub speaker: Speaker,
    pub text: String,
}

impl DialogueSegment {
    pub fn new(speaker: Speaker, text: impl Into<String>) -> Self {
        Self {
            speaker,
            text: text.into(),
        }
    }

    pub fn host(text: impl Into<String>) -> Self {
        Self::new(Speaker::Host, text)
    }

    pub fn expert(text: impl Into<String>) -> Self {
        Self::new(Speaker::Expert, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_speaker_text_object() {
        let json = serde_json::to_string(&DialogueSegment::host("Hi there")).unwrap();
        assert_eq!(json, r#"{"speaker":"HOST","text":"Hi there"}"#);

        let back: DialogueSegment =
            serde_json::from_str(r#"{"speaker":"EXPERT","text":"Yes"}"#).unwrap();
        assert_eq!(back.speaker, Speaker::Expert);
    }
}
