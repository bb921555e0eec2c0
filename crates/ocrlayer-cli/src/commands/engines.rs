use ocrlayer_core::engine::EngineKind;
use ocrlayer_core::error::OcrLayerError;

pub fn list() -> Result<(), OcrLayerError> {
    println!("{:<12} {:<10} OUTPUT", "ENGINE", "STATUS");
    for kind in EngineKind::ALL {
        let status = if kind.is_available() {
            "installed"
        } else {
            "missing"
        };
        let output = match kind {
            EngineKind::Tesseract => "box file + transcript",
            EngineKind::Cuneiform => "hOCR markup",
        };
        println!("{:<12} {:<10} {}", kind.to_string(), status, output);
    }
    Ok(())
}
