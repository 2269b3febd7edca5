use crate::config::{Depth, Length, Preferences, Tone};

/// Characters of source text embedded in a single prompt.
pub const MAX_SAMPLE_CHARS: usize = 2000;

struct Persona {
    host: &'static str,
    expert: &'static str,
    style: &'static str,
}

fn persona(tone: Tone) -> Persona {
    match tone {
        Tone::Casual => Persona {
            host: "friendly, enthusiastic, uses casual language like \"you know\", \"pretty cool\"",
            expert: "knowledgeable but relaxed, explains things like talking to a friend",
            style: "Keep it light and fun, like friends chatting over coffee",
        },
        Tone::Conversational => Persona {
            host: "engaging and curious, asks thoughtful questions",
            expert: "clear and articulate, good at explaining concepts",
            style: "Natural conversation with good flow",
        },
        Tone::Professional => Persona {
            host: "well-prepared, asks insightful questions",
            expert: "authoritative and precise, provides detailed explanations",
            style: "Professional but accessible, like a quality educational podcast",
        },
    }
}

fn pacing(length: Length) -> &'static str {
    match length {
        Length::Short => "4-6 quick exchanges, hit the main points",
        Length::Medium => "8-10 exchanges, cover key concepts with some depth",
        Length::Long => "12-15 exchanges, thorough exploration with examples",
    }
}

fn depth_guide(depth: Depth) -> &'static str {
    match depth {
        Depth::Overview => "Focus on high-level takeaways and main ideas",
        Depth::Balanced => "Balance overview with some detailed explanations and examples",
        Depth::DeepDive => "Provide thorough explanations, examples, and explore nuances",
    }
}

const HUMOR_INSTRUCTION: &str = "\n- Add occasional light humor, relatable analogies, and personality\n- Make it engaging and enjoyable, not dry\n- CRITICAL: DO NOT WRITE STAGE DIRECTIONS LIKE (LAUGHS), [CHUCKLES], or [MUSIC]. Only write dialogue.";

pub const OPENING_INSTRUCTION: &str = "Since this is the first section, the HOST should open the podcast with a warm welcome and an overview.";
pub const MIDDLE_INSTRUCTION: &str = "This is a middle section. The conversation must **START IN MEDIA RES (mid-conversation)**. The HOST should transition smoothly from the previous segment's topic to introduce this new content.";
pub const CLOSING_INSTRUCTION: &str = "This is the final section. The conversation must **START IN MEDIA RES**. The final exchange must be a clear wrap-up and conclusion, with the HOST thanking the EXPERT.";

/// Where a section sits in a multi-section episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Continuity {
    Standalone,
    Opening,
    Middle,
    Closing,
}

impl Continuity {
    pub fn for_section(index: usize, total: usize) -> Self {
        if total <= 1 {
            Continuity::Standalone
        } else if index <= 1 {
            Continuity::Opening
        } else if index < total {
            Continuity::Middle
        } else {
            Continuity::Closing
        }
    }

    pub fn instruction(&self) -> &'static str {
        match self {
            Continuity::Standalone => "",
            Continuity::Opening => OPENING_INSTRUCTION,
            Continuity::Middle => MIDDLE_INSTRUCTION,
            Continuity::Closing => CLOSING_INSTRUCTION,
        }
    }
}

/// First `MAX_SAMPLE_CHARS` characters with newlines flattened to spaces.
pub fn sample_text(text: &str) -> String {
    text.chars()
        .take(MAX_SAMPLE_CHARS)
        .map(|c| if c == '\n' { ' ' } else { c })
        .collect()
}

/// Builds the generation prompt for one section of the document.
///
/// Pure function of its inputs: the persona, pacing and depth lines come
/// from fixed tables, and the continuity line depends only on the section's
/// position so that only the first section opens the show.
pub fn build_prompt(
    text_sample: &str,
    preferences: &Preferences,
    section_index: usize,
    total_sections: usize,
) -> String {
    let persona = persona(preferences.tone);
    let continuity = Continuity::for_section(section_index, total_sections).instruction();
    let humor = if preferences.humor { HUMOR_INSTRUCTION } else { "" };
    let sample = sample_text(text_sample);

    format!(
        "You are a podcast script writer. Create a {tone} conversation between HOST and EXPERT.

{continuity}

HOST personality: {host}
EXPERT personality: {expert}

Style: {style}

Length: {pacing}
Depth: {depth}{humor}

STRICT FORMAT - Each line must start with HOST: or EXPERT:

Example (for non-final section):
HOST: That connects perfectly to our next topic, the rise of quantum computing.
EXPERT: Indeed, that's where the real complexity begins.

Content to discuss (Section {section_index} of {total_sections}):
{sample}

Create the podcast dialogue following the format above:",
        tone = preferences.tone,
        host = persona.host,
        expert = persona.expert,
        style = persona.style,
        pacing = pacing(preferences.length),
        depth = depth_guide(preferences.depth),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn continuity_positions() {
        assert_eq!(Continuity::for_section(1, 1), Continuity::Standalone);
        assert_eq!(Continuity::for_section(1, 3), Continuity::Opening);
        assert_eq!(Continuity::for_section(2, 3), Continuity::Middle);
        assert_eq!(Continuity::for_section(3, 3), Continuity::Closing);
    }

    #[test]
    fn sample_is_bounded_and_flattened() {
        let long = "line\n".repeat(1000);
        let sample = sample_text(&long);
        assert_eq!(sample.chars().count(), MAX_SAMPLE_CHARS);
        assert!(!sample.contains('\n'));
    }

    #[test]
    fn humor_toggles_stage_direction_ban() {
        let mut prefs = Preferences::default();
        assert!(build_prompt("x", &prefs, 1, 1).contains("DO NOT WRITE STAGE DIRECTIONS"));
        prefs.humor = false;
        assert!(!build_prompt("x", &prefs, 1, 1).contains("DO NOT WRITE STAGE DIRECTIONS"));
    }
}
