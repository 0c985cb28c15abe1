use std::path::PathBuf;

use chrono::{Datelike, NaiveDate};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    /// Nothing to export yet.
    #[error("no {0} data to export")]
    MissingData(&'static str),
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Prediction history table.
    Csv,
    /// Single-prediction analysis report.
    Html,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Html => "html",
        }
    }

    /// Download filename for an export made on `date`.
    pub fn filename(self, date: NaiveDate) -> String {
        let stem = match self {
            Self::Csv => format!("crop-history-{}", date.format("%Y-%m-%d")),
            Self::Html => format!(
                "crop-analysis-report-{}-{}-{}",
                date.month(),
                date.day(),
                date.year()
            ),
        };
        format!("{stem}.{}", self.extension())
    }
}

/// `M/D/YYYY`, without zero padding.
pub fn short_date(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.month(), date.day(), date.year())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filenames_embed_date() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        assert_eq!(ExportFormat::Csv.filename(date), "crop-history-2025-03-07.csv");
        assert_eq!(
            ExportFormat::Html.filename(date),
            "crop-analysis-report-3-7-2025.html"
        );
        assert_eq!(short_date(date), "3/7/2025");
    }
}
