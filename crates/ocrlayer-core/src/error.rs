use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum OcrLayerError {
    #[error("malformed box file at line {line}: {reason}")]
    MalformedBoxFile { line: usize, reason: String },

    #[error("invalid bounding box reached serialization: {0}")]
    InvalidBox(String),

    #[error("{0} not found. Install it or add it to PATH")]
    EngineNotFound(String),

    #[error("{engine} crashed with exit code {code}: {stderr}")]
    EngineCrashed {
        engine: String,
        code: i32,
        stderr: String,
    },

    #[error("{engine} aborted with an internal buffer overflow")]
    EngineOverflow { engine: String },

    #[error("OCR engine failed: {0}")]
    EngineFailed(String),

    #[error("the requested OCR engine ({0}) is not supported")]
    UnsupportedEngine(String),

    #[error("failed to load config from {path}: {reason}")]
    ConfigLoad { path: PathBuf, reason: String },

    #[error("invalid config: {0}")]
    ConfigInvalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl OcrLayerError {
    /// Whether the error is an expected per-page engine condition that the
    /// adapter may recover from by trying another engine.
    ///
    /// Malformed engine data and invalid boxes are implementation or contract
    /// defects and are never recoverable.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            OcrLayerError::EngineNotFound(_)
                | OcrLayerError::EngineCrashed { .. }
                | OcrLayerError::EngineOverflow { .. }
                | OcrLayerError::EngineFailed(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defects_are_not_recoverable() {
        let malformed = OcrLayerError::MalformedBoxFile {
            line: 3,
            reason: "expected 5 or 6 fields, found 2".into(),
        };
        assert!(!malformed.is_recoverable());
        assert!(!OcrLayerError::InvalidBox("empty word".into()).is_recoverable());
    }

    #[test]
    fn test_engine_failures_are_recoverable() {
        assert!(OcrLayerError::EngineOverflow {
            engine: "cuneiform".into()
        }
        .is_recoverable());
        assert!(OcrLayerError::EngineCrashed {
            engine: "cuneiform".into(),
            code: 1,
            stderr: String::new(),
        }
        .is_recoverable());
        assert!(OcrLayerError::EngineNotFound("tesseract".into()).is_recoverable());
    }
}
