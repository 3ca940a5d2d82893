//! File-name helpers

/// Replace every character that is not an ASCII letter or digit with `_`
///
/// Accented letters are replaced too, so `Zoé Lefèvre` becomes
/// `Zo__Lef_vre`.
///
/// # Examples
/// ```
/// use fr_text::sanitize_file_component;
/// assert_eq!(sanitize_file_component("Jean Dupont"), "Jean_Dupont");
/// ```
pub fn sanitize_file_component(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sanitize_keeps_ascii_alphanumerics() {
        assert_eq!(sanitize_file_component("Dupont2"), "Dupont2");
    }

    #[test]
    fn test_sanitize_replaces_everything_else() {
        assert_eq!(sanitize_file_component("Zoé Lefèvre"), "Zo__Lef_vre");
        assert_eq!(sanitize_file_component("M. & Mme/Durand"), "M____Mme_Durand");
        assert_eq!(sanitize_file_component(""), "");
    }

    #[test]
    fn test_sanitize_one_underscore_per_char() {
        // multi-byte characters still count once
        assert_eq!(sanitize_file_component("€€"), "__");
    }
}
