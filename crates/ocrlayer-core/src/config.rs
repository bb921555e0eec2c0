use crate::engine::EngineKind;
use crate::error::OcrLayerError;
use crate::model::QuotePolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Engine selection and per-engine command-line options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OcrConfig {
    pub engine: EngineKind,
    /// Engine to try when the primary one fails on a page.
    pub fallback: Option<EngineKind>,
    /// Extra arguments inserted before tesseract's `batch` config.
    pub tesseract_options: Vec<String>,
    /// Extra arguments passed to cuneiform ahead of the image path.
    pub cuneiform_options: Vec<String>,
    pub quote_policy: QuotePolicy,
}

impl Default for OcrConfig {
    fn default() -> Self {
        OcrConfig {
            engine: EngineKind::Tesseract,
            fallback: None,
            tesseract_options: Vec::new(),
            cuneiform_options: Vec::new(),
            quote_policy: QuotePolicy::default(),
        }
    }
}

/// Load a config from a JSON file.
pub fn load_config(path: &Path) -> Result<OcrConfig, OcrLayerError> {
    let content = std::fs::read_to_string(path).map_err(|e| OcrLayerError::ConfigLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_config(&content, path)
}

/// Parse a config from a JSON string.
pub fn parse_config(json: &str, source: &Path) -> Result<OcrConfig, OcrLayerError> {
    let config: OcrConfig = serde_json::from_str(json).map_err(|e| OcrLayerError::ConfigLoad {
        path: source.to_path_buf(),
        reason: e.to_string(),
    })?;
    validate_config(&config)?;
    Ok(config)
}

pub fn validate_config(config: &OcrConfig) -> Result<(), OcrLayerError> {
    if config.fallback == Some(config.engine) {
        return Err(OcrLayerError::ConfigInvalid(format!(
            "fallback engine must differ from the primary engine ({})",
            config.engine
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    #[test]
    fn test_defaults() {
        let config = parse_config("{}", &PathBuf::from("inline")).unwrap();
        assert_eq!(config, OcrConfig::default());
        assert_eq!(config.engine, EngineKind::Tesseract);
        assert_eq!(config.quote_policy, QuotePolicy::Escape);
    }

    #[test]
    fn test_full_config() {
        let json = r#"{
            "engine": "cuneiform",
            "fallback": "tesseract",
            "tesseract_options": ["-l", "eng"],
            "cuneiform_options": ["--singlecolumn"],
            "quote_policy": "drop"
        }"#;
        let config = parse_config(json, &PathBuf::from("inline")).unwrap();
        assert_eq!(config.engine, EngineKind::Cuneiform);
        assert_eq!(config.fallback, Some(EngineKind::Tesseract));
        assert_eq!(config.tesseract_options, vec!["-l", "eng"]);
        assert_eq!(config.quote_policy, QuotePolicy::Drop);
    }

    #[test]
    fn test_unknown_engine_rejected() {
        let err = parse_config(r#"{"engine": "ocrad"}"#, &PathBuf::from("inline")).unwrap_err();
        assert!(matches!(err, OcrLayerError::ConfigLoad { .. }));
    }

    #[test]
    fn test_fallback_equal_to_primary_rejected() {
        let err = parse_config(
            r#"{"engine": "tesseract", "fallback": "tesseract"}"#,
            &PathBuf::from("inline"),
        )
        .unwrap_err();
        assert!(matches!(err, OcrLayerError::ConfigInvalid(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"fallback": "cuneiform"}}"#).unwrap();
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.fallback, Some(EngineKind::Cuneiform));
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/nonexistent/ocrlayer.json")).unwrap_err();
        assert!(matches!(err, OcrLayerError::ConfigLoad { .. }));
    }
}
