use ocrlayer_core::engine::PageLayout;
use ocrlayer_core::error::OcrLayerError;
use ocrlayer_core::layout::PageBox;
use ocrlayer_core::reconcile::ReconcileReport;
use serde_json::json;

pub fn render(layout: &PageLayout) -> Result<String, OcrLayerError> {
    Ok(serde_json::to_string_pretty(layout)?)
}

pub fn print_page(page: &PageBox, report: Option<&ReconcileReport>) -> Result<(), OcrLayerError> {
    let value = json!({ "page": page, "report": report });
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
