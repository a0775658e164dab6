//! Blank out comments and string literals before any pattern matching runs.
//!
//! Masking replaces every masked character by spaces (one per byte) and keeps line breaks, so byte offsets and line
//! structure in the masked text are exactly those of the original document.

use std::ops::Range;

/// Mask `/* … */`, `// …` and `"…"` regions of `source`.
///
/// ## Notes
/// - A string literal must close on the line it opened; `\"` does not close it. An unterminated string is left as
///   code.
/// - An unterminated block comment runs to the end of the document.
pub fn mask_comments_and_strings(source: &str) -> String {
    blank_ranges(source, &masked_ranges(source))
}

/// Byte ranges of every comment and string literal in `source`, in document order.
pub fn masked_ranges(source: &str) -> Vec<Range<usize>> {
    let bytes = source.as_bytes();
    let mut ranges = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                let end = find_byte(bytes, i + 2, b'\n').unwrap_or(bytes.len());
                ranges.push(i..end);
                i = end;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                let end = find_block_comment_end(bytes, i + 2).unwrap_or(bytes.len());
                ranges.push(i..end);
                i = end;
            }
            b'"' => match find_string_end(bytes, i + 1) {
                Some(end) => {
                    ranges.push(i..end);
                    i = end;
                }
                None => i += 1,
            },
            _ => i += 1,
        }
    }

    ranges
}

/// Replace the characters inside `ranges` by spaces, preserving `\n` and `\r`.
///
/// `ranges` must be sorted, may overlap, and must start and end on character boundaries.
pub fn blank_ranges(text: &str, ranges: &[Range<usize>]) -> String {
    if ranges.is_empty() {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut pending = ranges.iter().peekable();

    for (i, c) in text.char_indices() {
        while pending.peek().is_some_and(|r| r.end <= i) {
            pending.next();
        }
        let masked = pending.peek().is_some_and(|r| r.start <= i);
        if masked && c != '\n' && c != '\r' {
            for _ in 0..c.len_utf8() {
                out.push(' ');
            }
        } else {
            out.push(c);
        }
    }

    out
}

fn find_byte(bytes: &[u8], from: usize, needle: u8) -> Option<usize> {
    bytes[from.min(bytes.len())..]
        .iter()
        .position(|&b| b == needle)
        .map(|p| from + p)
}

/// Index one past the closing `*/`.
fn find_block_comment_end(bytes: &[u8], from: usize) -> Option<usize> {
    let mut i = from;
    while i + 1 < bytes.len() {
        if bytes[i] == b'*' && bytes[i + 1] == b'/' {
            return Some(i + 2);
        }
        i += 1;
    }
    None
}

/// Index one past the closing quote, if the literal closes on this line.
fn find_string_end(bytes: &[u8], from: usize) -> Option<usize> {
    let mut i = from;
    while i < bytes.len() {
        match bytes[i] {
            b'\n' => return None,
            b'"' if bytes[i - 1] != b'\\' => return Some(i + 1),
            _ => i += 1,
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_comment_masked_to_end_of_line() {
        let source = "int a; // int b;\nint c;";
        let masked = mask_comments_and_strings(source);
        assert_eq!(masked, "int a;          \nint c;");
        assert_eq!(masked.len(), source.len());
    }

    #[test]
    fn test_block_comment_spanning_lines_keeps_newlines() {
        let source = "a /* x\ny */ b";
        let masked = mask_comments_and_strings(source);
        assert_eq!(masked, "a     \n     b");
        assert_eq!(masked.len(), source.len());
    }

    #[test]
    fn test_string_with_escaped_quote() {
        let source = r#"s = "a \" { b"; {"#;
        let masked = mask_comments_and_strings(source);
        assert_eq!(masked, "s =           ; {");
        assert_eq!(masked.len(), source.len());
    }

    #[test]
    fn test_unterminated_string_is_left_alone() {
        let source = "x = \"open\n{ }";
        assert_eq!(mask_comments_and_strings(source), source);
    }

    #[test]
    fn test_comment_markers_inside_string_are_not_comments() {
        let source = "\"// not a comment\" int a;";
        let masked = mask_comments_and_strings(source);
        assert_eq!(masked.len(), source.len());
        assert!(masked.ends_with(" int a;"));
        assert!(masked.trim_start().starts_with("int a;"));
    }

    #[test]
    fn test_unterminated_block_comment_runs_to_end() {
        let source = "int a; /* {";
        assert_eq!(mask_comments_and_strings(source), "int a;     ");
    }

    #[test]
    fn test_multibyte_characters_keep_byte_length() {
        let source = "// héllo\n\"naïve\" {}";
        let masked = mask_comments_and_strings(source);
        assert_eq!(masked.len(), source.len());
        assert!(masked.ends_with(" {}"));
    }

    #[test]
    fn test_blank_ranges_handles_nested_ranges() {
        let masked = blank_ranges("abcdefgh", &[1..6, 2..4, 7..8]);
        assert_eq!(masked, "a     g ");
    }
}
