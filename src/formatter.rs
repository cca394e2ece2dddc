//! Text layout helpers for the emitted script.

use std::fmt::Write;

/// Stateless formatting primitives
pub struct ScriptFormatter;

impl ScriptFormatter {
    /// A run of `spaces` spaces; non-positive counts give an empty string
    pub fn indent(spaces: i32) -> String {
        if spaces <= 0 {
            return String::new();
        }
        " ".repeat(spaces as usize)
    }

    /// Identifier-safe label for a node id
    ///
    /// The mapping is injective: ASCII alphanumerics pass through, `_`
    /// becomes `__`, and every other byte becomes `_` followed by two
    /// lowercase hex digits.
    pub fn label_for(prefix: &str, node_id: &str) -> String {
        let mut label = String::with_capacity(prefix.len() + node_id.len());
        label.push_str(prefix);
        for b in node_id.bytes() {
            match b {
                b'_' => label.push_str("__"),
                _ if b.is_ascii_alphanumeric() => label.push(char::from(b)),
                _ => {
                    let _ = write!(label, "_{:02x}", b);
                }
            }
        }
        label
    }

    /// Double-quoted string literal for choice captions
    pub fn quote(text: &str) -> String {
        let mut out = String::with_capacity(text.len() + 2);
        out.push('"');
        for c in text.chars() {
            match c {
                '\\' => out.push_str("\\\\"),
                '"' => out.push_str("\\\""),
                '\n' => out.push_str("\\n"),
                '\r' => {}
                _ => out.push(c),
            }
        }
        out.push('"');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indent() {
        assert_eq!(ScriptFormatter::indent(0), "");
        assert_eq!(ScriptFormatter::indent(-3), "");
        assert_eq!(ScriptFormatter::indent(4), "    ");
    }

    #[test]
    fn test_label_passthrough() {
        assert_eq!(
            ScriptFormatter::label_for("node_", "01HZX3ABC"),
            "node_01HZX3ABC"
        );
    }

    #[test]
    fn test_label_escapes() {
        assert_eq!(ScriptFormatter::label_for("node_", "a-b"), "node_a_2db");
        assert_eq!(ScriptFormatter::label_for("node_", "a_b"), "node_a__b");
        assert_eq!(ScriptFormatter::label_for("n", "é"), "n_c3_a9");
    }

    #[test]
    fn test_label_distinguishes_lookalike_ids() {
        let ids = ["a-b", "a_b", "a b", "a__b", "a_2db"];
        let labels: std::collections::HashSet<String> = ids
            .iter()
            .map(|id| ScriptFormatter::label_for("node_", id))
            .collect();
        assert_eq!(labels.len(), ids.len());
    }

    #[test]
    fn test_label_handles_every_character_class() {
        let id: String = (0u8..128).map(char::from).chain("ü日🙂".chars()).collect();
        let label = ScriptFormatter::label_for("node_", &id);
        assert!(label.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));
        assert_eq!(ScriptFormatter::label_for("node_", ""), "node_");
    }

    #[test]
    fn test_uuid_label() {
        let label = ScriptFormatter::label_for("node_", "3f2a-9c");
        assert_eq!(label, "node_3f2a_2d9c");
        assert!(label.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));
    }

    #[test]
    fn test_quote() {
        assert_eq!(ScriptFormatter::quote("Go"), "\"Go\"");
        assert_eq!(
            ScriptFormatter::quote("Say \"hi\"\\now\nthen"),
            "\"Say \\\"hi\\\"\\\\now\\nthen\""
        );
    }
}
