use ocrlayer_core::config::{load_config, validate_config, OcrConfig};
use ocrlayer_core::engine::EngineAdapter;
use ocrlayer_core::error::OcrLayerError;
use std::path::PathBuf;

use crate::output;

pub fn run(
    image: PathBuf,
    engine: Option<String>,
    fallback: Option<String>,
    config_file: Option<PathBuf>,
    output_format: &str,
    output_file: Option<PathBuf>,
) -> Result<(), OcrLayerError> {
    let mut config = match config_file {
        Some(path) => load_config(&path)?,
        None => OcrConfig::default(),
    };
    if let Some(name) = engine {
        config.engine = name.parse()?;
    }
    if let Some(name) = fallback {
        config.fallback = Some(name.parse()?);
    }
    validate_config(&config)?;

    let adapter = EngineAdapter::from_config(&config);
    tracing::debug!(engines = ?adapter.engine_names(), image = %image.display(), "running OCR");
    let layout = adapter.page_layout(&image)?;

    for w in &layout.warnings {
        eprintln!("warning: {w}");
    }
    if layout.is_empty() {
        eprintln!("no text recognized on {}", image.display());
    }

    let rendered = match output_format {
        "json" => output::json::render(&layout)?,
        _ => layout.text.clone(),
    };

    match output_file {
        Some(path) => {
            std::fs::write(&path, rendered)?;
            eprintln!("Text layer written to {}", path.display());
        }
        None => output::text::print(&rendered),
    }

    Ok(())
}
