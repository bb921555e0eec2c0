use crate::markup::{char_box, is_line_boundary};
use crate::markup::scan::{decode_entities, has_class, title_numbers, tokenize, Token};
use crate::model::{push_marker, QuotePolicy, StreamItem};

/// Parse the per-line `ocr_cinfo` dialect.
///
/// Each `ocr_line` span carries its text followed by an `ocr_cinfo` span whose
/// `x_bboxes` title lists four coordinates per character of that text,
/// whitespace included. Characters left without coordinates are dropped.
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
            Token::Start { name, raw } if name == "span" && has_class(raw, "ocr_line") => {
                let (line, next) = read_line(&tokens, i + 1);
                if let Some((text, coords)) = line {
                    emit_line(&mut items, &text, &coords, policy);
                }
                i = next;
                continue;
            }
            _ => {}
        }
        i += 1;
    }

    items
}

/// Collect an `ocr_line`'s text and character coordinates, starting just past
/// its start tag. Returns `None` for lines without an `ocr_cinfo` span, plus
/// the index to resume scanning from.
fn read_line(tokens: &[Token<'_>], start: usize) -> (Option<(String, Vec<i32>)>, usize) {
    let mut text = String::new();
    let mut depth = 0usize;
    let mut i = start;

    while i < tokens.len() {
        match &tokens[i] {
            Token::Text(t) => text.push_str(t),
            Token::Start { name, raw } if name == "span" => {
                if has_class(raw, "ocr_cinfo") {
                    let coords = title_numbers(raw, "x_bboxes").unwrap_or_default();
                    return (Some((decode_entities(&text).into_owned(), coords)), i + 1);
                }
                depth += 1;
            }
            Token::End { name } if name == "span" => {
                if depth == 0 {
                    return (None, i + 1);
                }
                depth -= 1;
            }
            // Inline formatting such as <b> or <i> contributes only its text.
            _ => {}
        }
        i += 1;
    }

    (None, i)
}

fn emit_line(items: &mut Vec<StreamItem>, text: &str, coords: &[i32], policy: QuotePolicy) {
    for (ch, b) in text.chars().zip(coords.chunks_exact(4)) {
        if ch.is_whitespace() {
            push_marker(items, StreamItem::Space);
            continue;
        }
        if policy.keeps(ch) {
            if let Some(b) = char_box(ch, b) {
                items.push(StreamItem::Char(b));
            }
        }
    }
    push_marker(items, StreamItem::Newline);
}
