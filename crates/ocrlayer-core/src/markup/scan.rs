//! A forgiving tokenizer for hOCR-like markup.
//!
//! OCR engines emit HTML rather than XML (unclosed `<br>`, unquoted
//! attributes), so tags are split out by hand instead of through a strict
//! XML reader.

use std::borrow::Cow;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    /// `<name ...>`; `raw` is everything between the angle brackets.
    Start { name: String, raw: &'a str },
    End { name: String },
    Text(&'a str),
}

impl Token<'_> {
    pub fn is_end(&self, tag: &str) -> bool {
        matches!(self, Token::End { name } if name == tag)
    }
}

/// Split a document into start tags, end tags and text runs.
///
/// Comments, doctype declarations and processing instructions are dropped.
/// An unterminated tag ends the scan.
pub fn tokenize(doc: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < doc.len() {
        let rest = &doc[pos..];
        let Some(lt) = rest.find('<') else {
            tokens.push(Token::Text(rest));
            break;
        };
        if lt > 0 {
            tokens.push(Token::Text(&rest[..lt]));
        }
        let tag_start = pos + lt;
        let after = &doc[tag_start..];

        if after.starts_with("<!--") {
            match after.find("-->") {
                Some(end) => pos = tag_start + end + 3,
                None => break,
            }
            continue;
        }

        let Some(gt) = find_tag_end(after) else {
            break;
        };
        let inner = &after[1..gt];
        pos = tag_start + gt + 1;

        if inner.starts_with('!') || inner.starts_with('?') {
            continue;
        }
        if let Some(name) = inner.strip_prefix('/') {
            tokens.push(Token::End {
                name: tag_name(name),
            });
        } else {
            tokens.push(Token::Start {
                name: tag_name(inner),
                raw: inner,
            });
        }
    }

    tokens
}

/// Byte offset of the `>` closing the tag that starts at `s[0]`, ignoring
/// any `>` inside quoted attribute values.
fn find_tag_end(s: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (i, c) in s.char_indices().skip(1) {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '"' || c == '\'' => quote = Some(c),
            None if c == '>' => return Some(i),
            None => {}
        }
    }
    None
}

fn tag_name(inner: &str) -> String {
    inner
        .split(|c: char| c.is_whitespace() || c == '/')
        .next()
        .unwrap_or("")
        .to_ascii_lowercase()
}

/// Value of attribute `name` in a raw start tag. Accepts double-quoted,
/// single-quoted and unquoted values.
pub fn attr<'a>(raw: &'a str, name: &str) -> Option<&'a str> {
    let mut search = 0;
    while let Some(found) = raw[search..].find(name) {
        let start = search + found;
        search = start + name.len();

        let preceded_ok = raw[..start]
            .chars()
            .next_back()
            .is_some_and(char::is_whitespace);
        let rest = raw[search..].trim_start();
        let Some(value) = rest.strip_prefix('=') else {
            continue;
        };
        if !preceded_ok {
            continue;
        }
        let value = value.trim_start();
        return match value.chars().next() {
            Some(q @ ('"' | '\'')) => {
                let body = &value[1..];
                body.find(q).map(|end| &body[..end])
            }
            Some(_) => Some(
                value
                    .split(|c: char| c.is_whitespace() || c == '/')
                    .next()
                    .unwrap_or(""),
            ),
            None => None,
        };
    }
    None
}

/// Whether the whitespace-separated `class` attribute contains `class`.
pub fn has_class(raw: &str, class: &str) -> bool {
    attr(raw, "class").is_some_and(|v| v.split_whitespace().any(|c| c == class))
}

/// Integers following `key` in an hOCR `title` property list, e.g.
/// `title="bbox 1 2 3 4; x_wconf 90"` with key `bbox`.
pub fn title_numbers(raw: &str, key: &str) -> Option<Vec<i32>> {
    let title = attr(raw, "title")?;
    let property = title
        .split(';')
        .map(str::trim)
        .find(|p| p.split_whitespace().next() == Some(key))?;
    property
        .split_whitespace()
        .skip(1)
        .map(|v| v.parse().ok())
        .collect()
}

/// Decode character entities in a text run.
///
/// XML entities and numeric references go through quick-xml; a handful of
/// HTML-only names are mapped first. Text with an unknown entity is returned
/// as-is.
pub fn decode_entities(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }
    let html_mapped = text
        .replace("&nbsp;", "\u{a0}")
        .replace("&shy;", "\u{ad}")
        .replace("&ndash;", "\u{2013}")
        .replace("&mdash;", "\u{2014}");
    match quick_xml::escape::unescape(&html_mapped) {
        Ok(decoded) => Cow::Owned(decoded.into_owned()),
        Err(_) => Cow::Owned(html_mapped),
    }
}
