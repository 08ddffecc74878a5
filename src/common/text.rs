//! Character offsets used by the editor widget, mapped onto Rust strings.

pub fn char_to_byte_index(text: &str, char_idx: usize) -> usize {
    text.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Number of lines as shown in the status bar. An empty document has one line.
pub fn line_count(text: &str) -> usize {
    text.split('\n').count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_conversion_handles_multibyte() {
        let text = "aé日b";
        assert_eq!(char_to_byte_index(text, 0), 0);
        assert_eq!(char_to_byte_index(text, 2), 3);
        assert_eq!(char_to_byte_index(text, 3), 6);
        assert_eq!(char_to_byte_index(text, 10), text.len());
    }

    #[test]
    fn line_count_matches_newlines() {
        assert_eq!(line_count(""), 1);
        assert_eq!(line_count("a\nb"), 2);
        assert_eq!(line_count("a\n"), 2);
    }
}
