use crate::error::OcrLayerError;
use crate::layout::{Bounded, LineBox, PageBox, Perimeter, WordBox};

/// Render a page as a positional-text expression.
///
/// Returns an empty string for a page with no lines. Any box failing
/// validation is an internal consistency error.
pub fn encode_page(page: &PageBox) -> Result<String, OcrLayerError> {
    if page.is_empty() {
        return Ok(String::new());
    }
    page.validate()?;
    let lines = page
        .children()
        .iter()
        .map(encode_line)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(format!(
        "(page {}\n  {})",
        page.perimeter(),
        lines.join("\n  ")
    ))
}

fn encode_line(line: &LineBox) -> Result<String, OcrLayerError> {
    line.validate()?;
    let words = line
        .children()
        .iter()
        .map(encode_word)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(format!(
        "(line {}\n    {})",
        line.perimeter(),
        words.join("\n    ")
    ))
}

fn encode_word(word: &WordBox) -> Result<String, OcrLayerError> {
    word.validate()?;
    Ok(format!(
        "(word {} \"{}\")",
        word.perimeter(),
        escape_text(&word.text())
    ))
}

/// Escape the characters that would break a quoted string.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '"' | '\'' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// A `(word ...)` tuple read back from an encoded expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordRecord {
    pub perimeter: Perimeter,
    pub text: String,
}

/// Read every `(word xmin ymin xmax ymax "text")` tuple from an encoded page,
/// in document order. Malformed tuples are skipped.
pub fn parse_words(encoded: &str) -> Vec<WordRecord> {
    let mut out = Vec::new();
    let mut rest = encoded;

    while let Some(start) = rest.find("(word ") {
        rest = &rest[start + "(word ".len()..];
        let Some(quote) = rest.find('"') else {
            break;
        };
        let coords: Vec<i32> = rest[..quote]
            .split_whitespace()
            .filter_map(|v| v.parse().ok())
            .collect();
        let Some((text, consumed)) = read_quoted(&rest[quote + 1..]) else {
            break;
        };
        rest = &rest[quote + 1 + consumed..];
        if let [xmin, ymin, xmax, ymax] = coords[..] {
            out.push(WordRecord {
                perimeter: Perimeter::new(xmin, ymin, xmax, ymax),
                text,
            });
        }
    }

    out
}

/// Read an escaped string up to its closing quote. Returns the unescaped text
/// and the number of bytes consumed including the closing quote.
fn read_quoted(s: &str) -> Option<(String, usize)> {
    let mut text = String::new();
    let mut escaped = false;
    for (i, c) in s.char_indices() {
        if escaped {
            text.push(c);
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '"' {
            return Some((text, i + 1));
        } else {
            text.push(c);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::assemble::assemble;
    use crate::model::{CharBox, StreamItem};

    fn ch(c: char, xmin: i32, ymin: i32, xmax: i32, ymax: i32) -> StreamItem {
        StreamItem::Char(CharBox::new(c, xmin, ymin, xmax, ymax))
    }

    #[test]
    fn test_empty_page_encodes_to_empty_string() {
        assert_eq!(encode_page(&PageBox::new()).unwrap(), "");
    }

    #[test]
    fn test_encode_single_word() {
        let page = assemble(&[ch('a', 0, 0, 5, 5), ch('b', 5, 0, 10, 5)]);
        let encoded = encode_page(&page).unwrap();
        assert_eq!(
            encoded,
            "(page 0 0 10 5\n  (line 0 0 10 5\n    (word 0 0 10 5 \"ab\")))"
        );
    }

    #[test]
    fn test_encode_layout() {
        let page = assemble(&[
            ch('a', 0, 10, 5, 15),
            StreamItem::Space,
            ch('b', 10, 10, 15, 15),
            StreamItem::Newline,
            ch('c', 0, 0, 5, 5),
        ]);
        let encoded = encode_page(&page).unwrap();
        let expected = "(page 0 0 15 15\n  \
                        (line 0 10 15 15\n    \
                        (word 0 10 5 15 \"a\")\n    \
                        (word 10 10 15 15 \"b\"))\n  \
                        (line 0 0 5 5\n    \
                        (word 0 0 5 5 \"c\")))";
        assert_eq!(encoded, expected);
    }

    #[test]
    fn test_escape_quotes_and_backslash() {
        assert_eq!(escape_text(r#"say "hi""#), r#"say \"hi\""#);
        assert_eq!(escape_text(r"a\b"), r"a\\b");
        assert_eq!(escape_text("it's"), r"it\'s");
    }

    #[test]
    fn test_invalid_word_is_rejected() {
        let page = assemble(&[ch('x', 10, 10, 5, 5)]);
        assert!(matches!(
            encode_page(&page),
            Err(OcrLayerError::InvalidBox(_))
        ));
    }

    #[test]
    fn test_parse_words_reads_back_tuples() {
        let page = assemble(&[
            ch('"', 0, 0, 3, 5),
            ch('a', 3, 0, 6, 5),
            StreamItem::Space,
            ch('\\', 10, 0, 12, 5),
        ]);
        let encoded = encode_page(&page).unwrap();
        let words = parse_words(&encoded);
        assert_eq!(
            words,
            vec![
                WordRecord {
                    perimeter: Perimeter::new(0, 0, 6, 5),
                    text: "\"a".into(),
                },
                WordRecord {
                    perimeter: Perimeter::new(10, 0, 12, 5),
                    text: "\\".into(),
                },
            ]
        );
    }
}
