pub mod cuneiform;
pub mod tesseract;

use crate::config::OcrConfig;
use crate::error::OcrLayerError;
use crate::layout::PageBox;
use crate::model::{CharBox, QuotePolicy};
use crate::reconcile::ReconcileReport;
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Output};
use std::str::FromStr;

pub use cuneiform::CuneiformEngine;
pub use tesseract::TesseractEngine;

/// Raw recognition output for one page image.
#[derive(Debug, Clone)]
pub enum EngineOutput {
    /// Character boxes (bottom-left origin) plus an independently recognized
    /// plain-text transcript of the same page.
    Transcript { boxes: Vec<CharBox>, text: String },
    /// hOCR-like markup (top-left origin) and the measured image height.
    Markup { document: String, height: u32 },
}

/// Trait for OCR back-ends.
pub trait OcrEngine: Send + Sync {
    /// Recognize the text on one page image.
    fn recognize(&self, image: &Path) -> Result<EngineOutput, OcrLayerError>;

    /// Name of this engine (for diagnostics).
    fn name(&self) -> &str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    Tesseract,
    Cuneiform,
}

impl EngineKind {
    pub const ALL: [EngineKind; 2] = [EngineKind::Tesseract, EngineKind::Cuneiform];

    pub fn executable(&self) -> &'static str {
        match self {
            EngineKind::Tesseract => "tesseract",
            EngineKind::Cuneiform => "cuneiform",
        }
    }

    pub fn is_available(&self) -> bool {
        find_executable(self.executable()).is_some()
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.executable())
    }
}

impl FromStr for EngineKind {
    type Err = OcrLayerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tesseract" => Ok(EngineKind::Tesseract),
            "cuneiform" => Ok(EngineKind::Cuneiform),
            other => Err(OcrLayerError::UnsupportedEngine(other.to_string())),
        }
    }
}

/// Build the engine for `kind` with the options from `config`.
pub fn engine_for(kind: EngineKind, config: &OcrConfig) -> Box<dyn OcrEngine> {
    match kind {
        EngineKind::Tesseract => Box::new(TesseractEngine::new(config.tesseract_options.clone())),
        EngineKind::Cuneiform => Box::new(CuneiformEngine::new(config.cuneiform_options.clone())),
    }
}

/// The text layer produced for one page.
#[derive(Debug, Clone, Serialize)]
pub struct PageLayout {
    pub page: PageBox,
    /// Positional-text expression, empty when no text was recognized.
    pub text: String,
    /// Engine that produced the layout, if any succeeded.
    pub engine: Option<String>,
    pub warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ReconcileReport>,
}

impl PageLayout {
    pub fn empty(warnings: Vec<String>) -> Self {
        PageLayout {
            page: PageBox::new(),
            text: String::new(),
            engine: None,
            warnings,
            report: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Runs a primary engine and, on a recoverable failure, a fallback.
///
/// A page both engines fail on gets an empty layout plus warnings rather than
/// an error; malformed engine data and invalid boxes still propagate.
pub struct EngineAdapter {
    engines: Vec<Box<dyn OcrEngine>>,
    policy: QuotePolicy,
}

impl EngineAdapter {
    pub fn new(primary: Box<dyn OcrEngine>, policy: QuotePolicy) -> Self {
        EngineAdapter {
            engines: vec![primary],
            policy,
        }
    }

    pub fn with_fallback(mut self, fallback: Box<dyn OcrEngine>) -> Self {
        self.engines.push(fallback);
        self
    }

    pub fn from_config(config: &OcrConfig) -> Self {
        let adapter = EngineAdapter::new(engine_for(config.engine, config), config.quote_policy);
        match config.fallback {
            Some(kind) => adapter.with_fallback(engine_for(kind, config)),
            None => adapter,
        }
    }

    pub fn engine_names(&self) -> Vec<&str> {
        self.engines.iter().map(|e| e.name()).collect()
    }

    pub fn page_layout(&self, image: &Path) -> Result<PageLayout, OcrLayerError> {
        let span = tracing::info_span!("page", image = %image.display());
        let _guard = span.enter();
        let mut warnings = Vec::new();

        for engine in &self.engines {
            match engine.recognize(image) {
                Ok(output) => {
                    let (page, report) = crate::build_page(&output, self.policy);
                    let text = crate::layout::encode::encode_page(&page)?;
                    tracing::debug!(engine = engine.name(), lines = page.children().len(), "page done");
                    return Ok(PageLayout {
                        page,
                        text,
                        engine: Some(engine.name().to_string()),
                        warnings,
                        report,
                    });
                }
                Err(e) if e.is_recoverable() => {
                    tracing::warn!(engine = engine.name(), error = %e, "engine failed on page");
                    warnings.push(format!("{} failed on {}: {e}", engine.name(), image.display()));
                }
                Err(e) => return Err(e),
            }
        }

        tracing::warn!("no engine recognized the page, leaving it without text");
        Ok(PageLayout::empty(warnings))
    }
}

/// Locate an executable on `PATH`.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    let paths = std::env::var_os("PATH")?;
    find_in(&paths, name)
}

fn find_in(paths: &OsStr, name: &str) -> Option<PathBuf> {
    let file = format!("{name}{}", std::env::consts::EXE_SUFFIX);
    std::env::split_paths(paths)
        .map(|dir| dir.join(&file))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Run an engine command and map launch and exit failures onto the
/// recoverable engine errors.
fn run(engine: &str, command: &mut Command) -> Result<Output, OcrLayerError> {
    let output = command.output().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            OcrLayerError::EngineNotFound(engine.to_string())
        } else {
            OcrLayerError::EngineFailed(format!("{engine} could not be started: {e}"))
        }
    })?;

    if !output.status.success() {
        if aborted(&output.status) {
            return Err(OcrLayerError::EngineOverflow {
                engine: engine.to_string(),
            });
        }
        let code = output.status.code().unwrap_or(-1);
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(OcrLayerError::EngineCrashed {
            engine: engine.to_string(),
            code,
            stderr,
        });
    }

    Ok(output)
}

/// Killed by SIGABRT, which is how buffer overflows surface.
#[cfg(unix)]
fn aborted(status: &ExitStatus) -> bool {
    use std::os::unix::process::ExitStatusExt;
    status.signal() == Some(6)
}

#[cfg(not(unix))]
fn aborted(_status: &ExitStatus) -> bool {
    false
}

/// Read an engine artefact; a missing or unreadable file means the engine
/// did not finish its job.
fn read_artefact(engine: &str, path: &Path) -> Result<String, OcrLayerError> {
    std::fs::read_to_string(path).map_err(|e| {
        OcrLayerError::EngineFailed(format!("{engine} output {} unreadable: {e}", path.display()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_kind_from_str() {
        assert_eq!("tesseract".parse::<EngineKind>().unwrap(), EngineKind::Tesseract);
        assert_eq!(" Cuneiform ".parse::<EngineKind>().unwrap(), EngineKind::Cuneiform);
        assert!(matches!(
            "fake-engine".parse::<EngineKind>(),
            Err(OcrLayerError::UnsupportedEngine(_))
        ));
    }

    #[test]
    fn test_engine_for_kind() {
        let config = OcrConfig::default();
        let kind: EngineKind = "cuneiform".parse().unwrap();
        assert_eq!(engine_for(kind, &config).name(), "cuneiform");
        assert_eq!(engine_for(EngineKind::Tesseract, &config).name(), "tesseract");
    }

    #[test]
    fn test_adapter_from_config() {
        let config = OcrConfig {
            engine: EngineKind::Cuneiform,
            fallback: Some(EngineKind::Tesseract),
            ..OcrConfig::default()
        };
        let adapter = EngineAdapter::from_config(&config);
        assert_eq!(adapter.engine_names(), vec!["cuneiform", "tesseract"]);
    }

    #[test]
    fn test_missing_executable_is_not_found() {
        let err = run(
            "definitely-not-an-ocr-engine",
            &mut Command::new("definitely-not-an-ocr-engine"),
        )
        .unwrap_err();
        assert!(matches!(err, OcrLayerError::EngineNotFound(_)));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_find_executable_misses_unknown() {
        assert!(find_executable("definitely-not-an-ocr-engine").is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_find_requires_execute_permission() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cuneiform");
        std::fs::write(&path, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();
        assert!(find_in(dir.path().as_os_str(), "cuneiform").is_none());

        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        assert_eq!(find_in(dir.path().as_os_str(), "cuneiform"), Some(path));
    }

    #[test]
    fn test_find_skips_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join(format!("tesseract{}", std::env::consts::EXE_SUFFIX))).unwrap();
        assert!(find_in(dir.path().as_os_str(), "tesseract").is_none());
    }
}
