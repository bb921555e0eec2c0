pub mod cinfo;
pub mod legacy;
pub mod scan;

use crate::model::{CharBox, QuotePolicy, StreamItem};
use serde::{Deserialize, Serialize};
use std::fmt;

/// hOCR dialect emitted by the markup engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkupVariant {
    /// One `<span title="bbox ...">` per character.
    Legacy,
    /// Per-line `ocr_cinfo` element listing every character's box.
    CharInfo,
}

impl MarkupVariant {
    /// Probe the document once to pick a parsing strategy.
    pub fn detect(document: &str) -> MarkupVariant {
        if document.contains("class='ocr_cinfo'") || document.contains("class=\"ocr_cinfo\"") {
            MarkupVariant::CharInfo
        } else {
            MarkupVariant::Legacy
        }
    }

    pub fn parse(&self, document: &str, policy: QuotePolicy) -> Vec<StreamItem> {
        match self {
            MarkupVariant::Legacy => legacy::parse(document, policy),
            MarkupVariant::CharInfo => cinfo::parse(document, policy),
        }
    }
}

impl fmt::Display for MarkupVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkupVariant::Legacy => write!(f, "legacy"),
            MarkupVariant::CharInfo => write!(f, "cinfo"),
        }
    }
}

/// Parse a markup document into a character/marker stream.
///
/// Coordinates are returned as the markup states them (top-left origin).
pub fn parse_markup(document: &str, policy: QuotePolicy) -> Vec<StreamItem> {
    let variant = MarkupVariant::detect(document);
    let items = variant.parse(document, policy);
    tracing::debug!(%variant, %policy, items = items.len(), "parsed markup");
    items
}

/// A character box from four markup coordinates, or `None` when a minimum
/// lies past its maximum.
fn char_box(ch: char, coords: &[i32]) -> Option<CharBox> {
    let b = CharBox::new(ch, coords[0], coords[1], coords[2], coords[3]);
    if b.is_inverted() {
        tracing::debug!(%ch, ?coords, "dropping inverted markup box");
        return None;
    }
    Some(b)
}

/// Whether a start tag breaks the current line.
fn is_line_boundary(name: &str) -> bool {
    name == "br" || name == "p"
}
