pub mod csv;
pub mod export;
pub mod html;
pub mod types;

pub use export::{download_dir, write_history_csv, write_prediction_report};
pub use types::{ExportFormat, ReportError};
