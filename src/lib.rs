pub mod assemble;
pub mod class;
pub mod config;
pub mod emit;
pub mod error;
pub mod expressions;
pub mod include;
pub mod ir;
pub mod normalize;
pub mod rules;
pub mod segment;
pub mod statements;

use config::Config;
use error::ConvertError;
use expressions::Normalizers;
use include::IncludeResolver;
use ir::Conversion;
use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

/// Converts one ASP page. `unit` is the page's base name, used when the
/// configuration wraps the output in an exported function.
pub fn convert(text: &str, unit: &str, config: &Config) -> Conversion {
    // Stage 0
    let text: Cow<str> = if config.normalize_newlines {
        Cow::Owned(normalize::line_endings(text))
    } else {
        Cow::Borrowed(text)
    };

    // Stage 1
    let spans = segment::segment(&text);
    tracing::debug!(spans = spans.len(), "segmented document");

    // Stage 2
    let (spans, includes) = IncludeResolver::new(config).resolve(spans);

    // Stages 3+4
    let normalizers = Normalizers::new(config);
    let spans = statements::translate(spans, &normalizers);
    let spans = expressions::translate(spans, &normalizers, config.escape_literals);

    // Stage 5
    let body = emit::emit(&spans, &config.output_call);

    // Stage 6
    let code = assemble::assemble(&body, &includes, unit, config);

    Conversion { code, includes }
}

/// Sibling path with the target extension: `pages/home.asp` → `pages/home.ts`.
pub fn target_path(source: &Path, config: &Config) -> PathBuf {
    source.with_extension(&config.target_extension)
}

pub fn unit_name(source: &Path) -> String {
    source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Reads and converts a source file without writing anything.
pub fn convert_source(source: &Path, config: &Config) -> Result<Conversion, ConvertError> {
    if !source.exists() {
        return Err(ConvertError::NotFound {
            path: source.to_path_buf(),
            cwd: std::env::current_dir().unwrap_or_default(),
        });
    }
    tracing::info!("Processing \"{}\"...", source.display());
    let text = fs::read_to_string(source).map_err(|e| ConvertError::Read {
        path: source.to_path_buf(),
        source: e,
    })?;
    Ok(convert(&text, &unit_name(source), config))
}

/// Converts `source` and writes the result next to it. Returns the path
/// written.
pub fn convert_file(source: &Path, config: &Config) -> Result<PathBuf, ConvertError> {
    let conversion = convert_source(source, config)?;
    let target = target_path(source, config);
    tracing::info!("Writing to \"{}\"...", target.display());
    fs::write(&target, &conversion.code).map_err(|e| ConvertError::Write {
        path: target.clone(),
        source: e,
    })?;
    Ok(target)
}
