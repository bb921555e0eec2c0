pub mod config;
pub mod engine;
pub mod error;
pub mod layout;
pub mod markup;
pub mod model;
pub mod reconcile;

use engine::EngineOutput;
use error::OcrLayerError;
use layout::assemble::assemble;
use layout::encode::encode_page;
use layout::PageBox;
use markup::parse_markup;
use model::{CharBox, QuotePolicy, StreamItem};
use reconcile::{reconcile, ReconcileReport};

/// Build the positional-text layer for a page from transcript-engine output:
/// character boxes plus the plain-text transcript of the same page.
///
/// Returns the encoded layer (empty when nothing was recognized) and the
/// record of adjustments made to fit the boxes to the transcript.
pub fn layout_from_transcript(
    boxes: &[CharBox],
    text: &str,
    policy: QuotePolicy,
) -> Result<(String, ReconcileReport), OcrLayerError> {
    let reconciled = reconcile(boxes, text, policy);
    let page = assemble(&reconciled.items);
    Ok((encode_page(&page)?, reconciled.report))
}

/// Build the positional-text layer for a page from markup-engine output.
///
/// `height` is the image height in pixels, used to flip the markup's
/// top-left-origin boxes into the layer's bottom-left convention.
pub fn layout_from_markup(
    document: &str,
    height: u32,
    policy: QuotePolicy,
) -> Result<String, OcrLayerError> {
    let items = markup_stream(document, height, policy);
    encode_page(&assemble(&items))
}

/// Parse markup and invert every character box's y-axis.
pub fn markup_stream(document: &str, height: u32, policy: QuotePolicy) -> Vec<StreamItem> {
    let height = i32::try_from(height).unwrap_or(i32::MAX);
    parse_markup(document, policy)
        .into_iter()
        .map(|item| match item {
            StreamItem::Char(c) => StreamItem::Char(c.invert_y(height)),
            marker => marker,
        })
        .collect()
}

/// Assemble the page tree for any engine's output.
pub fn build_page(
    output: &EngineOutput,
    policy: QuotePolicy,
) -> (PageBox, Option<ReconcileReport>) {
    match output {
        EngineOutput::Transcript { boxes, text } => {
            let reconciled = reconcile(boxes, text, policy);
            (assemble(&reconciled.items), Some(reconciled.report))
        }
        EngineOutput::Markup { document, height } => {
            (assemble(&markup_stream(document, *height, policy)), None)
        }
    }
}
