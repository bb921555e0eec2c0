use crate::markup::{char_box, is_line_boundary};
use crate::markup::scan::{decode_entities, title_numbers, tokenize, Token};
use crate::model::{push_marker, QuotePolicy, StreamItem};

/// Parse the per-character span dialect.
///
/// Every `<span title="bbox x0 y0 x1 y1">c</span>` yields one character; a
/// literal space right after the closing tag marks a word break, and `<br>`
/// or `<p>` mark a line break once the stream holds anything.
pub fn parse(document: &str, policy: QuotePolicy) -> Vec<StreamItem> {
    let tokens = tokenize(document);
    let mut items = Vec::new();
    let mut i = 0;

    while i < tokens.len() {
        match &tokens[i] {
            Token::Start { name, .. } if is_line_boundary(name) => {
                if !items.is_empty() {
                    push_marker(&mut items, StreamItem::Newline);
                }
            }
            Token::Start { name, raw } if name == "span" => {
                let Some(bbox) = title_numbers(raw, "bbox").filter(|n| n.len() >= 4) else {
                    i += 1;
                    continue;
                };

                let mut content = String::new();
                let mut end = i + 1;
                while end < tokens.len() && !tokens[end].is_end("span") {
                    if let Token::Text(t) = tokens[end] {
                        content.push_str(t);
                    }
                    end += 1;
                }

                if let Some(ch) = decode_entities(&content).chars().next() {
                    if policy.keeps(ch) {
                        if let Some(b) = char_box(ch, &bbox) {
                            items.push(StreamItem::Char(b));
                        }
                    }
                }

                if let Some(Token::Text(after)) = tokens.get(end + 1) {
                    if after.starts_with(' ') {
                        push_marker(&mut items, StreamItem::Space);
                    }
                }
                i = end + 1;
                continue;
            }
            _ => {}
        }
        i += 1;
    }

    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{stream_text, CharBox};

    const SAMPLE: &str = r#"<html><body>
<p><span title="bbox 10 100 20 120">H</span><span title="bbox 21 100 30 120">i</span> <span title="bbox 40 100 50 120">&amp;</span><br>
<span title="bbox 10 130 20 150">y</span></p>
</body></html>"#;

    #[test]
    fn test_parse_words_and_lines() {
        let items = parse(SAMPLE, QuotePolicy::Escape);
        assert_eq!(stream_text(&items), "Hi &\ny");
        assert_eq!(
            items[0],
            StreamItem::Char(CharBox::new('H', 10, 100, 20, 120))
        );
    }

    #[test]
    fn test_leading_newlines_are_suppressed() {
        let items = parse(SAMPLE, QuotePolicy::Escape);
        assert!(!items[0].is_marker());
    }

    #[test]
    fn test_quote_policy() {
        let doc = r#"<span title="bbox 0 0 5 5">&quot;</span><span title="bbox 5 0 9 5">a</span>"#;
        let kept = parse(doc, QuotePolicy::Escape);
        assert_eq!(stream_text(&kept), "\"a");

        let dropped = parse(doc, QuotePolicy::Drop);
        assert_eq!(stream_text(&dropped), "a");
    }

    #[test]
    fn test_span_without_bbox_is_ignored() {
        let doc = r#"<span class="ocr_page">x</span><span title="bbox 0 0 5 5">a</span>"#;
        let items = parse(doc, QuotePolicy::Escape);
        assert_eq!(stream_text(&items), "a");
    }

    #[test]
    fn test_repeated_breaks_collapse() {
        let doc = r#"<span title="bbox 0 0 5 5">a</span><br><br><p><span title="bbox 0 9 5 14">b</span>"#;
        let items = parse(doc, QuotePolicy::Escape);
        assert_eq!(stream_text(&items), "a\nb");
    }

    #[test]
    fn test_inverted_span_is_dropped() {
        let doc = r#"<span title="bbox 9 0 5 5">x</span><span title="bbox 10 0 15 5">a</span>"#;
        let items = parse(doc, QuotePolicy::Escape);
        assert_eq!(items, vec![StreamItem::Char(CharBox::new('a', 10, 0, 15, 5))]);
    }
}
