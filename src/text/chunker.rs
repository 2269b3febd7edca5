/// A word-aligned slice of the source text, positioned within its sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChunk {
    pub text: String,
    /// 1-based position.
    pub index: usize,
    pub total: usize,
}

impl TextChunk {
    pub fn is_first(&self) -> bool {
        self.index == 1
    }

    pub fn is_last(&self) -> bool {
        self.index == self.total
    }
}

/// Splits `text` into whitespace-delimited, word-aligned chunks.
///
/// Every word costs its character count plus one separator. Words are added
/// greedily while the running cost stays within `max_chars`; a word that would
/// overflow a non-empty chunk starts the next one. Words are never split, so
/// a single word longer than `max_chars` becomes a chunk of its own.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let cost = word.chars().count() + 1;
        if current_len + cost > max_chars && !current.is_empty() {
            chunks.push(current.join(" "));
            current.clear();
            current_len = 0;
        }
        current.push(word);
        current_len += cost;
    }

    if !current.is_empty() {
        chunks.push(current.join(" "));
    }

    chunks
}

/// Keeps at most `cap` chunks and stamps each with its position.
pub fn into_sections(chunks: Vec<String>, cap: usize) -> Vec<TextChunk> {
    let kept: Vec<String> = chunks.into_iter().take(cap).collect();
    let total = kept.len();
    kept.into_iter()
        .enumerate()
        .map(|(i, text)| TextChunk {
            text,
            index: i + 1,
            total,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_no_chunks() {
        assert!(chunk_text("", 10).is_empty());
        assert!(chunk_text("  \n\t ", 10).is_empty());
    }

    #[test]
    fn boundary_is_inclusive() {
        // "aaaa" costs 5, "bbbb" costs 5: exactly 10 fits.
        assert_eq!(chunk_text("aaaa bbbb", 10), vec!["aaaa bbbb"]);
        assert_eq!(chunk_text("aaaa bbbb", 9), vec!["aaaa", "bbbb"]);
    }

    #[test]
    fn oversized_word_stands_alone() {
        let chunks = chunk_text("a supercalifragilistic b", 5);
        assert_eq!(chunks, vec!["a", "supercalifragilistic", "b"]);
    }

    #[test]
    fn sections_are_capped_and_numbered() {
        let sections = into_sections(vec!["a".into(), "b".into(), "c".into()], 2);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].index, 1);
        assert_eq!(sections[1].total, 2);
        assert!(sections[1].is_last());
        assert!(sections[0].is_first());
    }
}
