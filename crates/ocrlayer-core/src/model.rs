use serde::{Deserialize, Serialize};
use std::fmt;

/// A single recognized character and its pixel-space extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharBox {
    pub ch: char,
    pub xmin: i32,
    pub ymin: i32,
    pub xmax: i32,
    pub ymax: i32,
}

impl CharBox {
    pub fn new(ch: char, xmin: i32, ymin: i32, xmax: i32, ymax: i32) -> Self {
        CharBox {
            ch,
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    /// Same geometry, different label.
    pub fn relabel(&self, ch: char) -> Self {
        CharBox { ch, ..*self }
    }

    /// Whether a minimum lies past its maximum.
    pub fn is_inverted(&self) -> bool {
        self.xmin > self.xmax || self.ymin > self.ymax
    }

    /// Flip the y-axis for an image of the given height.
    pub fn invert_y(&self, height: i32) -> Self {
        CharBox {
            ymin: height.saturating_sub(self.ymax),
            ymax: height.saturating_sub(self.ymin),
            ..*self
        }
    }
}

/// One element of the canonical character/marker stream fed to the assembler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StreamItem {
    Char(CharBox),
    Space,
    Newline,
}

impl StreamItem {
    pub fn as_char(&self) -> Option<&CharBox> {
        match self {
            StreamItem::Char(c) => Some(c),
            _ => None,
        }
    }

    pub fn is_marker(&self) -> bool {
        !matches!(self, StreamItem::Char(_))
    }
}

/// How characters that collide with the positional-text quoting rules
/// (`"`, `'` and `\`) are handled on their way into the stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuotePolicy {
    /// Keep the character; the serializer escapes it.
    #[default]
    Escape,
    /// Remove the character from the stream entirely.
    Drop,
}

impl QuotePolicy {
    pub fn keeps(&self, ch: char) -> bool {
        match self {
            QuotePolicy::Escape => true,
            QuotePolicy::Drop => !is_quote_char(ch),
        }
    }
}

impl fmt::Display for QuotePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuotePolicy::Escape => write!(f, "escape"),
            QuotePolicy::Drop => write!(f, "drop"),
        }
    }
}

pub fn is_quote_char(ch: char) -> bool {
    matches!(ch, '"' | '\'' | '\\')
}

/// Line-breaking whitespace in a transcript.
pub fn is_line_break(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | '\x0b' | '\x0c')
}

/// Word-breaking whitespace in a transcript (anything whitespace that is not
/// a line break).
pub fn is_word_break(ch: char) -> bool {
    ch.is_whitespace() && !is_line_break(ch)
}

/// Append a `Space` or `Newline` marker unless the stream already ends with
/// the same marker.
pub fn push_marker(items: &mut Vec<StreamItem>, marker: StreamItem) {
    debug_assert!(marker.is_marker());
    if items.last() != Some(&marker) {
        items.push(marker);
    }
}

/// Convert a stream back into plain text, markers becoming `' '`/`'\n'`.
pub fn stream_text(items: &[StreamItem]) -> String {
    items
        .iter()
        .map(|item| match item {
            StreamItem::Char(c) => c.ch,
            StreamItem::Space => ' ',
            StreamItem::Newline => '\n',
        })
        .collect()
}
