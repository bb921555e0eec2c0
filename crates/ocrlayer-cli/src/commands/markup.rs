use ocrlayer_core::error::OcrLayerError;
use ocrlayer_core::layout::assemble::assemble;
use ocrlayer_core::layout::encode::encode_page;
use ocrlayer_core::markup_stream;
use std::path::PathBuf;

use crate::output;

pub fn run(
    markup_file: PathBuf,
    height: u32,
    drop_quotes: bool,
    output_format: &str,
) -> Result<(), OcrLayerError> {
    let document = std::fs::read_to_string(&markup_file)?;
    let items = markup_stream(&document, height, super::quote_policy(drop_quotes));
    let page = assemble(&items);

    match output_format {
        "json" => output::json::print_page(&page, None)?,
        _ => output::text::print(&encode_page(&page)?),
    }

    Ok(())
}
