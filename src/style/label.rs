//! Node label formatting.

/// Labels longer than this are truncated
pub const MAX_LABEL_CHARS: usize = 40;

const ZERO_WIDTH_SPACE: char = '\u{200B}';

/// Truncate long labels and add break opportunities after underscores.
///
/// Module names are often long `snake_case` identifiers without spaces; the
/// zero-width space after each `_` lets the renderer wrap them.
pub fn format_label(label: &str) -> String {
    if label.is_empty() {
        return String::new();
    }

    let mut text: String = label.chars().take(MAX_LABEL_CHARS).collect();
    if label.chars().count() > MAX_LABEL_CHARS {
        text.push_str("...");
    }

    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        out.push(c);
        if c == '_' {
            out.push(ZERO_WIDTH_SPACE);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_label_unchanged() {
        assert_eq!(format_label("alu"), "alu");
        assert_eq!(format_label(""), "");
    }

    #[test]
    fn test_underscore_break() {
        assert_eq!(format_label("u_core_0"), "u_\u{200B}core_\u{200B}0");
    }

    #[test]
    fn test_truncation() {
        let long = "x".repeat(45);
        let formatted = format_label(&long);
        assert_eq!(formatted, format!("{}...", "x".repeat(40)));

        let exact = "y".repeat(40);
        assert_eq!(format_label(&exact), exact);
    }
}
