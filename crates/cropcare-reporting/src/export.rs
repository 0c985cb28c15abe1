//! Writing exports to disk.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use cropcare_core::{HistoryTable, PredictionResult};

use crate::types::{ExportFormat, ReportError};
use crate::{csv, html};

/// Where exports land: the user's download directory, else the working
/// directory.
pub fn download_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// Write the history CSV into `dir`. An empty table is refused.
pub fn write_history_csv(
    table: &HistoryTable,
    dir: &Path,
    date: NaiveDate,
) -> Result<PathBuf, ReportError> {
    if table.is_empty() && table.headers.is_empty() {
        return Err(ReportError::MissingData("history"));
    }
    let path = dir.join(ExportFormat::Csv.filename(date));
    write(&path, &csv::history_csv(table))?;
    Ok(path)
}

/// Write the analysis report for the cached prediction into `dir`.
///
/// With no prediction cached this does nothing and returns `Ok(None)`.
pub fn write_prediction_report(
    result: Option<&PredictionResult>,
    dir: &Path,
    date: NaiveDate,
) -> Result<Option<PathBuf>, ReportError> {
    let Some(result) = result else {
        log::debug!("report requested before any prediction; skipping");
        return Ok(None);
    };
    let path = dir.join(ExportFormat::Html.filename(date));
    write(&path, &html::render_report(result, date))?;
    Ok(Some(path))
}

fn write(path: &Path, contents: &str) -> Result<(), ReportError> {
    std::fs::write(path, contents).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("wrote {}", path.display());
    Ok(())
}
