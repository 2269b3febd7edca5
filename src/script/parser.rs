use regex::Regex;
use std::sync::LazyLock;
use tracing::{info, warn};

use crate::script::fallback::placeholder_dialogue;
use crate::script::types::{DialogueSegment, Speaker};

/// Cleaned utterances shorter than this are treated as noise.
pub const MIN_SEGMENT_CHARS: usize = 5;

static PARENTHESIZED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\([^)]*\)").unwrap());
static BRACKETED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[[^\]]*\]").unwrap());
static ANGLED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

fn split_speaker(line: &str) -> Option<(Speaker, &str)> {
    [Speaker::Host, Speaker::Expert]
        .into_iter()
        .find_map(|speaker| line.strip_prefix(speaker.marker()).map(|rest| (speaker, rest.trim())))
}

/// Strips emphasis markers, stage directions and ellipses from an utterance.
pub fn clean_utterance(text: &str) -> String {
    let text = text.trim().replace("**", "").replace('*', "");
    let text = PARENTHESIZED.replace_all(&text, "");
    let text = BRACKETED.replace_all(&text, "");
    let text = ANGLED.replace_all(&text, "");
    text.trim().replace("...", "").trim().to_string()
}

/// Groups raw lines into speaker turns without cleaning them.
///
/// A `HOST:`/`EXPERT:` prefix opens a turn; an unprefixed line continues the
/// open turn; lines before the first turn are dropped.
fn collect_turns(script: &str) -> Vec<DialogueSegment> {
    let mut turns: Vec<DialogueSegment> = Vec::new();

    for line in script.trim().lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match split_speaker(line) {
            Some((speaker, rest)) => {
                if !rest.is_empty() {
                    turns.push(DialogueSegment::new(speaker, rest));
                }
            }
            None => {
                if let Some(open) = turns.last_mut() {
                    open.text.push(' ');
                    open.text.push_str(line);
                }
            }
        }
    }

    turns
}

/// Parses generated text into an ordered, cleaned dialogue.
///
/// Never returns an empty sequence: when nothing survives cleaning the fixed
/// two-line placeholder is returned instead.
pub fn parse_dialogue(script: &str) -> Vec<DialogueSegment> {
    let dialogue: Vec<DialogueSegment> = collect_turns(script)
        .into_iter()
        .filter_map(|turn| {
            let text = clean_utterance(&turn.text);
            (text.chars().count() >= MIN_SEGMENT_CHARS)
                .then(|| DialogueSegment::new(turn.speaker, text))
        })
        .collect();

    info!("Parsed {} dialogue segments", dialogue.len());
    for (i, segment) in dialogue.iter().take(3).enumerate() {
        let preview: String = segment.text.chars().take(60).collect();
        info!("  {}. {}: {}...", i + 1, segment.speaker, preview);
    }

    if dialogue.is_empty() {
        warn!("No dialogue parsed, using placeholder dialogue");
        return placeholder_dialogue();
    }

    dialogue
}
