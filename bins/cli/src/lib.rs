//! File and terminal plumbing around the conversion pipeline.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use gstr1_core::{ConvertError, Report};
use gstr1_shared::{AppError, AppResult};

/// Name of the return file for a filer and period.
#[must_use]
pub fn output_file_name(gstin: &str, period: &str) -> String {
    format!("GSTR1_returns_{gstin}_monthly_{period}.json")
}

/// Asks for one line of input, without the trailing newline.
///
/// # Errors
///
/// Returns an I/O error if the terminal cannot be read or written.
pub fn prompt<R: BufRead, W: Write>(input: &mut R, output: &mut W, label: &str) -> io::Result<String> {
    write!(output, "{label}")?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Maps a pipeline failure onto the application error surfaced to users.
#[must_use]
pub fn convert_error(err: ConvertError) -> AppError {
    match err {
        ConvertError::SourceUnavailable { path, .. } => {
            AppError::InputUnavailable(path.display().to_string())
        }
        other => AppError::Conversion(other.to_string()),
    }
}

/// Writes the return as pretty-printed JSON into `dir`.
///
/// # Errors
///
/// Returns `AppError::Output` if the directory or file cannot be written.
pub fn write_report(report: &Report, dir: &Path, gstin: &str, period: &str) -> AppResult<PathBuf> {
    let path = dir.join(output_file_name(gstin, period));
    let json = serde_json::to_string_pretty(report)
        .map_err(|e| AppError::Internal(format!("serialising return: {e}")))?;
    fs::create_dir_all(dir)
        .and_then(|()| fs::write(&path, json))
        .map_err(|e| AppError::Output(format!("{}: {e}", path.display())))?;
    Ok(path)
}
