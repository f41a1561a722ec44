//! Output emission.
//!
//! Writes the three TSV files of a conversion into the output directory:
//!
//! ```text
//! <input dir>/<basename>/
//! ├── <basename>.tsv   (header + one line per flattened row)
//! ├── Settings.tsv     (Key/Value table)
//! └── Synonyms.tsv     (header only)
//! ```
//!
//! Each file is written to a hidden temporary sibling and renamed over the
//! target once complete, so a target is always either the previous content
//! or the full new content.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::{debug, instrument};

use qnatsv_shared::{OutputRow, QnaExport, QnaTsvError, Result, SettingsConfig};

use crate::flatten::flatten;

/// File name of the settings table.
pub const SETTINGS_FILE_NAME: &str = "Settings.tsv";
/// File name of the synonyms table.
pub const SYNONYMS_FILE_NAME: &str = "Synonyms.tsv";

/// Which file of the output set was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    /// `<basename>.tsv`
    QnAs,
    Settings,
    Synonyms,
}

impl std::fmt::Display for OutputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::QnAs => "QnAs",
            Self::Settings => "Settings",
            Self::Synonyms => "Synonyms",
        })
    }
}

/// Metadata for a single written file.
#[derive(Debug, Clone)]
pub struct WrittenFile {
    pub kind: OutputKind,
    pub path: PathBuf,
    pub size_bytes: u64,
    /// Lowercase hex SHA-256 of the file content.
    pub sha256: String,
    /// Data lines written, header excluded.
    pub rows: usize,
}

/// Create `dir` (and parents) if absent. Returns `true` if it was created.
pub fn prepare_output_dir(dir: &Path) -> Result<bool> {
    if dir.is_dir() {
        debug!(path = %dir.display(), "output directory exists");
        return Ok(false);
    }

    std::fs::create_dir_all(dir).map_err(|e| QnaTsvError::io(dir, e))?;
    debug!(path = %dir.display(), "output directory created");
    Ok(true)
}

/// Path of the main file for `basename` inside `dir`.
pub fn main_file_path(dir: &Path, basename: &str) -> PathBuf {
    dir.join(format!("{basename}.tsv"))
}

/// Write `<basename>.tsv`: the header, then one line per flattened row.
#[instrument(skip_all, fields(dir = %dir.display(), basename = %basename, documents = export.documents.len()))]
pub fn write_main_file(dir: &Path, basename: &str, export: &QnaExport) -> Result<WrittenFile> {
    let target = main_file_path(dir, basename);

    write_file(OutputKind::QnAs, &target, |w| {
        writeln!(w, "{}", OutputRow::header_line())?;
        let mut rows = 0;
        for row in flatten(export) {
            writeln!(w, "{}", row.to_tsv_line())?;
            rows += 1;
        }
        Ok(rows)
    })
}

/// Write `Settings.tsv`.
pub fn write_settings_file(
    dir: &Path,
    basename: &str,
    settings: &SettingsConfig,
) -> Result<WrittenFile> {
    let target = dir.join(SETTINGS_FILE_NAME);
    let content = settings_content(basename, settings);

    write_file(OutputKind::Settings, &target, |w| {
        w.write_all(content.as_bytes())?;
        Ok(3)
    })
}

/// Write `Synonyms.tsv`.
pub fn write_synonyms_file(dir: &Path) -> Result<WrittenFile> {
    let target = dir.join(SYNONYMS_FILE_NAME);

    write_file(OutputKind::Synonyms, &target, |w| {
        writeln!(w, "Synonyms")?;
        Ok(0)
    })
}

/// The full text of `Settings.tsv`.
pub fn settings_content(basename: &str, settings: &SettingsConfig) -> String {
    format!(
        "Key\tValue\n\
         Description\t{}\n\
         Language\t{}\n\
         DefaultAnswerForKB\t{}\n",
        settings.description(basename),
        settings.language,
        settings.default_answer,
    )
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Write `target` through a temporary sibling, then rename it into place.
///
/// `body` returns the number of data lines it wrote.
fn write_file<F>(kind: OutputKind, target: &Path, body: F) -> Result<WrittenFile>
where
    F: FnOnce(&mut HashingWriter<BufWriter<File>>) -> std::io::Result<usize>,
{
    let temp = temp_path(target);

    let written = write_temp(&temp, body).map_err(|e| {
        let _ = std::fs::remove_file(&temp);
        QnaTsvError::io(&temp, e)
    })?;

    std::fs::rename(&temp, target).map_err(|e| {
        let _ = std::fs::remove_file(&temp);
        QnaTsvError::io(target, e)
    })?;

    let (rows, size_bytes, sha256) = written;
    debug!(
        kind = %kind,
        path = %target.display(),
        rows,
        size = size_bytes,
        sha256 = %sha256,
        "wrote output file"
    );

    Ok(WrittenFile {
        kind,
        path: target.to_path_buf(),
        size_bytes,
        sha256,
        rows,
    })
}

fn write_temp<F>(temp: &Path, body: F) -> std::io::Result<(usize, u64, String)>
where
    F: FnOnce(&mut HashingWriter<BufWriter<File>>) -> std::io::Result<usize>,
{
    let file = File::create(temp)?;
    let mut writer = HashingWriter::new(BufWriter::new(file));

    let rows = body(&mut writer)?;
    writer.flush()?;

    let (inner, size, sha256) = writer.finish();
    inner.into_inner().map_err(|e| e.into_error())?.sync_all()?;

    Ok((rows, size, sha256))
}

/// `.<name>.tmp` next to `target`.
fn temp_path(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    target.with_file_name(format!(".{name}.tmp"))
}

/// A writer that hashes and counts everything passing through it.
struct HashingWriter<W> {
    inner: W,
    hasher: Sha256,
    bytes: u64,
}

impl<W: Write> HashingWriter<W> {
    fn new(inner: W) -> Self {
        Self {
            inner,
            hasher: Sha256::new(),
            bytes: 0,
        }
    }

    fn finish(self) -> (W, u64, String) {
        let hash = format!("{:x}", self.hasher.finalize());
        (self.inner, self.bytes, hash)
    }
}

impl<W: Write> Write for HashingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.hasher.update(&buf[..n]);
        self.bytes += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
