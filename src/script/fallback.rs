use crate::script::types::DialogueSegment;

/// Characters of source text quoted in the fallback script.
pub const SNIPPET_CHARS: usize = 200;

/// Deterministic stand-in used whenever remote generation yields nothing.
///
/// Always parses to seven HOST/EXPERT exchanges; the fourth line quotes the
/// opening of `text` so the episode still refers to the document.
pub fn fallback_script(text: &str) -> String {
    let snippet: String = text
        .chars()
        .take(SNIPPET_CHARS)
        .map(|c| if c == '\n' { ' ' } else { c })
        .collect();

    format!(
        "HOST: Welcome everyone to today's episode! We're diving into some really interesting material.
EXPERT: Thank you for having me! I'm excited to break down these concepts for your listeners.
HOST: Let's start with the basics. What's the main topic we're covering today?
EXPERT: This content focuses on {snippet}. It's a fascinating subject with practical applications.
HOST: That sounds intriguing! Can you elaborate on the key points?
EXPERT: Absolutely. The first major concept revolves around understanding the fundamental principles and how they interconnect.
HOST: How does this apply in real-world scenarios?
EXPERT: Great question! In practice, these ideas help us solve complex problems by providing a structured framework.
HOST: Are there any common misconceptions people have about this topic?
EXPERT: Yes, many people initially think it's more complicated than it actually is. Once you understand the core ideas, everything else falls into place.
HOST: That's really helpful context. What should listeners remember most?
EXPERT: The key takeaway is that mastering the basics opens doors to understanding the more advanced concepts. Start simple and build from there.
HOST: Excellent advice! Thank you so much for sharing your insights.
EXPERT: My pleasure! I hope this has been valuable for everyone listening."
    )
}

/// Two-line dialogue returned when a script parses to nothing usable.
pub fn placeholder_dialogue() -> Vec<DialogueSegment> {
    vec![
        DialogueSegment::host("Welcome to this podcast episode about your document."),
        DialogueSegment::expert(
            "Thank you for having me. Let me share the key insights from this material.",
        ),
    ]
}
