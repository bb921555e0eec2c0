use crate::engine::{read_artefact, run, EngineOutput, OcrEngine};
use crate::error::OcrLayerError;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Markup engine backed by the `cuneiform` binary.
///
/// Cuneiform crashes on blank pages and aborts with a buffer overflow on some
/// images; both surface as recoverable engine errors.
pub struct CuneiformEngine {
    options: Vec<String>,
}

impl CuneiformEngine {
    pub fn new(options: Vec<String>) -> Self {
        CuneiformEngine { options }
    }
}

impl Default for CuneiformEngine {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl CuneiformEngine {
    /// Side files (`<name>_files/`) land in `workdir`, so `image` must not be
    /// relative to the caller's directory.
    fn command(&self, image: &Path, hocr_path: &Path, workdir: &Path) -> Command {
        let mut command = Command::new("cuneiform");
        command
            .current_dir(workdir)
            .args(["-f", "hocr", "-o"])
            .arg(hocr_path)
            .args(&self.options)
            .arg(image);
        command
    }
}

fn absolute_image(image: &Path) -> Result<PathBuf, OcrLayerError> {
    std::path::absolute(image).map_err(|e| {
        OcrLayerError::EngineFailed(format!("cannot resolve image path {}: {e}", image.display()))
    })
}

impl OcrEngine for CuneiformEngine {
    fn recognize(&self, image: &Path) -> Result<EngineOutput, OcrLayerError> {
        let image = absolute_image(image)?;
        let workdir = tempfile::tempdir().map_err(|e| OcrLayerError::EngineFailed(e.to_string()))?;
        let hocr_path = workdir.path().join("page.hocr");

        run(self.name(), &mut self.command(&image, &hocr_path, workdir.path()))?;

        let document = read_artefact(self.name(), &hocr_path)?;
        let height = image_height(&image)?;
        Ok(EngineOutput::Markup { document, height })
    }

    fn name(&self) -> &str {
        "cuneiform"
    }
}

/// Pixel height of an image, measured with ImageMagick's `identify`.
pub fn image_height(image: &Path) -> Result<u32, OcrLayerError> {
    let output = run(
        "identify",
        Command::new("identify").args(["-format", "%H"]).arg(image),
    )?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    parse_height(&stdout)
}

fn parse_height(stdout: &str) -> Result<u32, OcrLayerError> {
    // Multi-frame images report one height per frame.
    let first = stdout.split_whitespace().next().unwrap_or("");
    first
        .parse()
        .map_err(|_| OcrLayerError::EngineFailed(format!("identify reported an invalid height '{first}'")))
}
