use crate::engine::{read_artefact, run, EngineOutput, OcrEngine};
use crate::error::OcrLayerError;
use crate::reconcile::boxfile::parse_box_file;
use std::path::Path;
use std::process::Command;

/// Transcript engine backed by the `tesseract` binary.
///
/// Runs twice per page: once in `makebox` mode for character boxes and once
/// for the plain-text transcript.
pub struct TesseractEngine {
    options: Vec<String>,
}

impl TesseractEngine {
    pub fn new(options: Vec<String>) -> Self {
        TesseractEngine { options }
    }
}

impl Default for TesseractEngine {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl OcrEngine for TesseractEngine {
    fn recognize(&self, image: &Path) -> Result<EngineOutput, OcrLayerError> {
        let workdir = tempfile::tempdir().map_err(|e| OcrLayerError::EngineFailed(e.to_string()))?;
        let box_base = workdir.path().join("page_box");
        let txt_base = workdir.path().join("page_txt");

        run(
            self.name(),
            Command::new("tesseract")
                .arg(image)
                .arg(&box_base)
                .args(&self.options)
                .args(["batch", "makebox"]),
        )?;
        run(
            self.name(),
            Command::new("tesseract")
                .arg(image)
                .arg(&txt_base)
                .args(&self.options)
                .arg("batch"),
        )?;

        // Releases before 3.00 wrote box data with a .txt extension.
        let box_path = box_base.with_extension("box");
        let box_path = if box_path.exists() {
            box_path
        } else {
            box_base.with_extension("txt")
        };

        let box_data = read_artefact(self.name(), &box_path)?;
        let text = read_artefact(self.name(), &txt_base.with_extension("txt"))?;
        let boxes = parse_box_file(&box_data)?;
        tracing::debug!(boxes = boxes.len(), chars = text.chars().count(), "tesseract output read");

        Ok(EngineOutput::Transcript { boxes, text })
    }

    fn name(&self) -> &str {
        "tesseract"
    }
}
