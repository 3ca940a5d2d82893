//! Line wrapping for multi-line fields (addresses, notes)

/// Wrap text on whitespace to at most `max_chars` characters per line
///
/// Explicit newlines are kept as line breaks. A word longer than
/// `max_chars` gets its own line and is not split. `max_chars == 0`
/// disables wrapping. Lengths are counted in characters, not bytes.
///
/// # Examples
/// ```
/// use fr_text::wrap_lines;
/// let lines = wrap_lines("12 rue des Lilas\n75011 Paris", 40);
/// assert_eq!(lines, vec!["12 rue des Lilas", "75011 Paris"]);
/// ```
pub fn wrap_lines(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        if max_chars == 0 {
            lines.push(paragraph.trim_end().to_string());
            continue;
        }

        let mut current = String::new();
        let mut current_len = 0;

        for word in paragraph.split_whitespace() {
            let word_len = word.chars().count();
            if current.is_empty() {
                current.push_str(word);
                current_len = word_len;
            } else if current_len + 1 + word_len <= max_chars {
                current.push(' ');
                current.push_str(word);
                current_len += 1 + word_len;
            } else {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
                current_len = word_len;
            }
        }

        lines.push(current);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_wrap_on_whitespace() {
        let lines = wrap_lines("Paiement reçu en espèces le 5 du mois", 16);
        assert_eq!(lines, vec!["Paiement reçu en", "espèces le 5 du", "mois"]);
    }

    #[test]
    fn test_wrap_keeps_newlines() {
        let lines = wrap_lines("Bât. B\n\n3 allée Verte", 80);
        assert_eq!(lines, vec!["Bât. B", "", "3 allée Verte"]);
    }

    #[test]
    fn test_wrap_long_word() {
        let lines = wrap_lines("a anticonstitutionnellement b", 10);
        assert_eq!(lines, vec!["a", "anticonstitutionnellement", "b"]);
    }

    #[test]
    fn test_wrap_zero_max() {
        let lines = wrap_lines("Hello world", 0);
        assert_eq!(lines, vec!["Hello world"]);
    }

    #[test]
    fn test_wrap_empty() {
        assert_eq!(wrap_lines("", 10), vec![String::new()]);
    }

    #[test]
    fn test_wrap_counts_chars_not_bytes() {
        // "été été" is 7 chars but 11 bytes
        assert_eq!(wrap_lines("été été", 7), vec!["été été"]);
    }
}
