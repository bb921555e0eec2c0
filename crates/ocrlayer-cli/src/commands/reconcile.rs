use ocrlayer_core::error::OcrLayerError;
use ocrlayer_core::layout::assemble::assemble;
use ocrlayer_core::layout::encode::encode_page;
use ocrlayer_core::reconcile::boxfile::parse_box_file;
use ocrlayer_core::reconcile::reconcile;
use std::path::PathBuf;

use crate::output;

pub fn run(
    box_file: PathBuf,
    text_file: PathBuf,
    drop_quotes: bool,
    output_format: &str,
) -> Result<(), OcrLayerError> {
    let boxes = parse_box_file(&std::fs::read_to_string(&box_file)?)?;
    let text = std::fs::read_to_string(&text_file)?;

    let reconciled = reconcile(&boxes, &text, super::quote_policy(drop_quotes));
    let page = assemble(&reconciled.items);

    match output_format {
        "json" => output::json::print_page(&page, Some(&reconciled.report))?,
        _ => {
            output::text::print(&encode_page(&page)?);
            output::text::print_report(&reconciled.report);
        }
    }

    Ok(())
}
