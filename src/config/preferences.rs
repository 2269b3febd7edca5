use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

use super::ConfigError;

/// Persona register for both speakers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Casual,
    #[default]
    Conversational,
    Professional,
}

/// Episode length. Drives exchange count, token budget and chunk size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Length {
    Short,
    #[default]
    Medium,
    Long,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Depth {
    Overview,
    #[default]
    Balanced,
    DeepDive,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Casual => "casual",
            Tone::Conversational => "conversational",
            Tone::Professional => "professional",
        }
    }
}

impl Length {
    pub fn as_str(&self) -> &'static str {
        match self {
            Length::Short => "short",
            Length::Medium => "medium",
            Length::Long => "long",
        }
    }

    /// Output token budget for one generation call.
    pub fn max_tokens(&self) -> u32 {
        match self {
            Length::Short => 600,
            Length::Medium => 1000,
            Length::Long => 1500,
        }
    }

    /// Maximum characters per chunk handed to the generator.
    pub fn chunk_chars(&self) -> usize {
        match self {
            Length::Short => 2000,
            Length::Medium => 3000,
            Length::Long => 4000,
        }
    }
}

impl Depth {
    pub fn as_str(&self) -> &'static str {
        match self {
            Depth::Overview => "overview",
            Depth::Balanced => "balanced",
            Depth::DeepDive => "deep-dive",
        }
    }
}

impl FromStr for Tone {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "casual" => Ok(Tone::Casual),
            "conversational" => Ok(Tone::Conversational),
            "professional" => Ok(Tone::Professional),
            other => Err(ConfigError::InvalidValue {
                field: "tone".to_string(),
                message: format!("unknown tone '{}'", other),
            }),
        }
    }
}

impl FromStr for Length {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "short" => Ok(Length::Short),
            "medium" => Ok(Length::Medium),
            "long" => Ok(Length::Long),
            other => Err(ConfigError::InvalidValue {
                field: "length".to_string(),
                message: format!("unknown length '{}'", other),
            }),
        }
    }
}

impl FromStr for Depth {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "overview" => Ok(Depth::Overview),
            "balanced" => Ok(Depth::Balanced),
            "deep-dive" | "deep_dive" | "deepdive" => Ok(Depth::DeepDive),
            other => Err(ConfigError::InvalidValue {
                field: "depth".to_string(),
                message: format!("unknown depth '{}'", other),
            }),
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Listener-facing knobs for one conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub tone: Tone,
    pub length: Length,
    pub depth: Depth,
    pub humor: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            tone: Tone::default(),
            length: Length::default(),
            depth: Depth::default(),
            humor: true,
        }
    }
}

impl Preferences {
    pub fn new(tone: Tone, length: Length, depth: Depth, humor: bool) -> Self {
        Self { tone, length, depth, humor }
    }

    /// Sampling temperature. Humor buys extra randomness.
    pub fn temperature(&self) -> f32 {
        if self.humor {
            0.9
        } else {
            0.7
        }
    }

    /// Builds preferences from a loosely-typed JSON object.
    ///
    /// Missing fields, unknown values and wrong types fall back to the
    /// per-field default; anything that is not an object yields the defaults.
    pub fn from_value(value: &Value) -> Self {
        let defaults = Self::default();
        let Some(map) = value.as_object() else {
            warn!("Preferences payload is not an object, using defaults");
            return defaults;
        };

        fn field<T: FromStr<Err = ConfigError>>(
            map: &serde_json::Map<String, Value>,
            key: &str,
            fallback: T,
        ) -> T {
            match map.get(key) {
                None | Some(Value::Null) => fallback,
                Some(Value::String(s)) => s.parse().unwrap_or_else(|e: ConfigError| {
                    warn!("{}, using default", e);
                    fallback
                }),
                Some(other) => {
                    warn!("Preference '{}' has unexpected value {}, using default", key, other);
                    fallback
                }
            }
        }

        let humor = match map.get("humor") {
            None | Some(Value::Null) => defaults.humor,
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => match s.trim().to_lowercase().as_str() {
                "true" | "yes" | "1" => true,
                "false" | "no" | "0" => false,
                _ => defaults.humor,
            },
            Some(other) => {
                warn!("Preference 'humor' has unexpected value {}, using default", other);
                defaults.humor
            }
        };

        Self {
            tone: field(map, "tone", defaults.tone),
            length: field(map, "length", defaults.length),
            depth: field(map, "depth", defaults.depth),
            humor,
        }
    }

    /// Parses a JSON preferences document. Invalid JSON yields the defaults.
    pub fn from_json(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw) {
            Ok(value) => Self::from_value(&value),
            Err(e) => {
                warn!("Could not parse preferences ({}), using defaults", e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_match_documented_values() {
        let prefs = Preferences::default();
        assert_eq!(prefs.tone, Tone::Conversational);
        assert_eq!(prefs.length, Length::Medium);
        assert_eq!(prefs.depth, Depth::Balanced);
        assert!(prefs.humor);
        assert_eq!(prefs.temperature(), 0.9);
    }

    #[test]
    fn unknown_values_fall_back_per_field() {
        let prefs = Preferences::from_value(&json!({
            "tone": "sarcastic",
            "length": "long",
            "depth": "deep-dive",
            "humor": false
        }));
        assert_eq!(prefs.tone, Tone::Conversational);
        assert_eq!(prefs.length, Length::Long);
        assert_eq!(prefs.depth, Depth::DeepDive);
        assert!(!prefs.humor);
        assert_eq!(prefs.temperature(), 0.7);
    }

    #[test]
    fn invalid_json_yields_defaults() {
        assert_eq!(Preferences::from_json("{not json"), Preferences::default());
        assert_eq!(Preferences::from_json("[1, 2]"), Preferences::default());
    }

    #[test]
    fn length_tables() {
        assert_eq!(Length::Short.max_tokens(), 600);
        assert_eq!(Length::Long.chunk_chars(), 4000);
        assert_eq!("Deep-Dive".parse::<Depth>().unwrap(), Depth::DeepDive);
    }
}
