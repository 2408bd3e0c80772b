//! Subtitle cue synthesis and SRT rendering.

pub mod srt;
pub mod timing;

/// One subtitle cue, ready to render.
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleCue {
    /// 1-based sequence number.
    pub index: u32,
    pub start_ms: u64,
    pub end_ms: u64,
    /// Display lines, already wrapped.
    pub lines: Vec<String>,
}

/// Wrap text into whole-word lines of at most `max_chars` characters.
///
/// A single word longer than the limit gets its own over-long line rather
/// than being broken mid-word.
pub fn wrap_lines(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if current.chars().count() + 1 + word.chars().count() <= max_chars {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_one_line() {
        assert_eq!(wrap_lines("hello world", 50), vec!["hello world"]);
    }

    #[test]
    fn wraps_at_word_boundaries() {
        let lines = wrap_lines("the quick brown fox jumps over the lazy dog", 15);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(line.chars().count() <= 15, "over-long line: {:?}", line);
        }
        assert_eq!(
            lines.join(" "),
            "the quick brown fox jumps over the lazy dog"
        );
    }

    #[test]
    fn exact_fit_does_not_wrap() {
        // "aa bb" is exactly 5 chars
        assert_eq!(wrap_lines("aa bb", 5), vec!["aa bb"]);
    }

    #[test]
    fn oversized_word_gets_own_line() {
        let lines = wrap_lines("a pneumonoultramicroscopic b", 10);
        assert_eq!(lines, vec!["a", "pneumonoultramicroscopic", "b"]);
    }

    #[test]
    fn counts_characters_not_bytes() {
        // 10 two-byte characters fit on a 10-char line
        let lines = wrap_lines("ééééé ééééé", 11);
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn empty_text_yields_no_lines() {
        assert!(wrap_lines("", 50).is_empty());
        assert!(wrap_lines("   ", 50).is_empty());
    }
}
