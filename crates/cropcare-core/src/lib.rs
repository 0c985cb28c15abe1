use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod api;
pub mod config;
pub mod dashboard;
pub mod notify;
pub mod state;
pub mod theme;
pub mod upload;
pub mod validation;
pub mod view;
pub mod workflow;

// Re-export for convenience
pub use api::ApiClient;
pub use notify::{NotificationCenter, NotificationId, NotificationKind};
pub use state::AppState;
pub use theme::{ThemeMode, ThemeService};
pub use upload::{ImageFile, LoadError, UploadEvent, UploadState};
pub use validation::FileError;

/// Backend used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server responded with {0}")]
    Status(reqwest::StatusCode),
    #[error("malformed response: {0}")]
    Parse(#[from] serde_json::Error),
    /// The server answered `success: false`.
    #[error("{0}")]
    Rejected(String),
    /// The server answered with an `error` payload.
    #[error("backend error: {0}")]
    Backend(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn unknown() -> String {
    "Unknown".to_string()
}

/// A backend-computed crop-disease classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    #[serde(default = "unknown")]
    pub prediction: String,
    /// Percent, 0–100.
    #[serde(default)]
    pub confidence: f64,
    #[serde(default = "unknown")]
    pub crop_type: String,
    #[serde(default)]
    pub is_healthy: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// One cell of the history table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryCell {
    Text(String),
    /// A cell rendered as a status badge; only the badge text counts.
    Status(String),
}

impl HistoryCell {
    pub fn text(&self) -> &str {
        match self {
            Self::Text(s) | Self::Status(s) => s,
        }
    }
}

/// The prediction history table as rendered by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<HistoryCell>>,
}

impl HistoryTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Configuration for the API client.
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    /// `None` means requests never time out.
    pub request_timeout: Option<Duration>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: None,
            latitude: None,
            longitude: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prediction_defaults_missing_fields() {
        let result: PredictionResult = serde_json::from_str(r#"{"is_healthy": true}"#).unwrap();
        assert_eq!(result.prediction, "Unknown");
        assert_eq!(result.crop_type, "Unknown");
        assert_eq!(result.confidence, 0.0);
        assert!(result.image_url.is_none());
    }

    #[test]
    fn history_cell_text_ignores_kind() {
        assert_eq!(HistoryCell::Status("Healthy".into()).text(), "Healthy");
        assert_eq!(HistoryCell::Text("Tomato".into()).text(), "Tomato");
    }
}
