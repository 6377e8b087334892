//! Text helpers for names and admin form input

/// Split a display name on its first space.
///
/// Returns `(first, last)`; `last` is empty when the name has no space.
pub fn split_name(name: &str) -> (String, String) {
    match name.split_once(' ') {
        Some((first, last)) => (first.to_string(), last.to_string()),
        None => (name.to_string(), String::new()),
    }
}

/// Clean a single-line form value.
///
/// Strips anything that looks like markup, folds tabs and line breaks into
/// spaces, collapses runs of whitespace and trims the ends.
pub fn sanitize_text_field(input: &str) -> String {
    let mut stripped = String::with_capacity(input.len());
    let mut in_tag = false;

    for ch in input.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if in_tag => {}
            _ => stripped.push(ch),
        }
    }

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_on_first_space() {
        assert_eq!(
            split_name("Jane Doe Smith"),
            ("Jane".to_string(), "Doe Smith".to_string())
        );
    }

    #[test]
    fn test_single_word_name() {
        assert_eq!(split_name("Jane"), ("Jane".to_string(), String::new()));
    }

    #[test]
    fn test_empty_name() {
        assert_eq!(split_name(""), (String::new(), String::new()));
    }

    #[test]
    fn test_sanitize_strips_markup_and_whitespace() {
        assert_eq!(
            sanitize_text_field("  <b>Deluxe</b>\n Room\t Upgrade "),
            "Deluxe Room Upgrade"
        );
        assert_eq!(sanitize_text_field("<script>x</script>"), "x");
        assert_eq!(sanitize_text_field("plain"), "plain");
    }
}
