//! End-to-end conversion: validate → load → prepare directory → write files.
//!
//! The input is fully parsed before the output directory is touched, so a
//! missing, misnamed or malformed input leaves no trace on disk. Failures
//! after that point are not rolled back; re-running the conversion
//! overwrites whatever was written.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use qnatsv_shared::{ConverterConfig, QnaExport, QnaTsvError, Result};

use crate::emit::{
    WrittenFile, prepare_output_dir, write_main_file, write_settings_file, write_synonyms_file,
};
use crate::flatten::row_count;

/// Required (case-insensitive) suffix of the input file name.
const INPUT_EXTENSION: &str = ".json";

/// Configuration for a single conversion.
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    /// Path to the export file.
    pub input: PathBuf,
    /// Converter settings (Settings.tsv values).
    pub converter: ConverterConfig,
}

/// Output from a successful conversion.
#[derive(Debug, Clone)]
pub struct ConvertResult {
    /// Directory holding the written files.
    pub output_dir: PathBuf,
    /// Input file name without extension.
    pub basename: String,
    /// Number of source documents read.
    pub documents: usize,
    /// Number of data rows in the main file.
    pub rows: usize,
    /// Files written, in write order.
    pub files: Vec<WrittenFile>,
}

/// Callbacks for reporting conversion progress to the user.
pub trait ConversionReporter {
    /// The output directory is ready; `created` is false if it already existed.
    fn folder_ready(&self, dir: &Path, created: bool);
    /// One output file has been fully written.
    fn file_written(&self, file: &WrittenFile);
    /// The conversion finished successfully.
    fn done(&self, result: &ConvertResult);
}

/// A reporter that discards all events.
pub struct NoopReporter;

impl ConversionReporter for NoopReporter {
    fn folder_ready(&self, _dir: &Path, _created: bool) {}
    fn file_written(&self, _file: &WrittenFile) {}
    fn done(&self, _result: &ConvertResult) {}
}

/// Convert one export file into its TSV file set.
#[instrument(skip_all, fields(input = %config.input.display()))]
pub fn convert(config: &ConvertConfig, reporter: &dyn ConversionReporter) -> Result<ConvertResult> {
    let input = config.input.as_path();

    validate_input(input)?;
    let export = load_export(input)?;
    let (output_dir, basename) = output_location(input);

    info!(
        documents = export.documents.len(),
        output = %output_dir.display(),
        "converting export"
    );

    let created = prepare_output_dir(&output_dir)?;
    reporter.folder_ready(&output_dir, created);

    let mut files = Vec::with_capacity(3);

    let main = write_main_file(&output_dir, &basename, &export)?;
    reporter.file_written(&main);
    let rows = main.rows;
    files.push(main);

    let settings = write_settings_file(&output_dir, &basename, &config.converter.settings)?;
    reporter.file_written(&settings);
    files.push(settings);

    let synonyms = write_synonyms_file(&output_dir)?;
    reporter.file_written(&synonyms);
    files.push(synonyms);

    let result = ConvertResult {
        output_dir,
        basename,
        documents: export.documents.len(),
        rows,
        files,
    };

    info!(
        rows = result.rows,
        path = %result.output_dir.display(),
        "conversion complete"
    );
    reporter.done(&result);

    Ok(result)
}

/// Check that `path` is an existing file named `*.json` (any case).
///
/// Existence is checked first.
pub fn validate_input(path: &Path) -> Result<()> {
    if !path.is_file() {
        return Err(QnaTsvError::InputNotFound {
            path: path.to_path_buf(),
        });
    }

    let has_json_suffix = path
        .file_name()
        .map(|n| n.to_string_lossy().to_ascii_lowercase().ends_with(INPUT_EXTENSION))
        .unwrap_or(false);
    if !has_json_suffix {
        return Err(QnaTsvError::WrongExtension {
            path: path.to_path_buf(),
        });
    }

    Ok(())
}

/// Read and parse an export file, fully, into memory.
pub fn load_export(path: &Path) -> Result<QnaExport> {
    let content = std::fs::read_to_string(path).map_err(|e| QnaTsvError::io(path, e))?;

    let export = QnaExport::from_json(&content)
        .map_err(|e| QnaTsvError::malformed(path, e.to_string()))?;

    debug!(
        documents = export.documents.len(),
        rows = row_count(&export),
        "export loaded"
    );
    Ok(export)
}

/// Output directory and basename for an input path:
/// `dir/name.json` → (`dir/name`, `name`).
pub fn output_location(input: &Path) -> (PathBuf, String) {
    let basename = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let parent = input.parent().unwrap_or_else(|| Path::new(""));
    (parent.join(&basename), basename)
}
