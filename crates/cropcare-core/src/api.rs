//! Typed client for the CropCare backend.
//!
//! Every endpoint returns a [`ClientError`] on transport failure, non-2xx
//! status or an unparseable body. Response parsing is split into plain
//! functions so it can be exercised without a server.

use once_cell::sync::Lazy;
use reqwest::multipart::{Form, Part};
use scraper::{ElementRef, Html, Selector};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::dashboard::{CropHealth, CropHealthPayload, WeatherPayload, WeatherReport};
use crate::upload::ImageFile;
use crate::{ClientError, Config, HistoryCell, HistoryTable, PredictionResult};

pub use reqwest::StatusCode;

/// Coordinates used when the caller has no location (New York).
pub const DEFAULT_COORDINATES: (f64, f64) = (40.7128, -74.0060);

static HISTORY_HEADER: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".history-table table thead th").unwrap());
static HISTORY_ROW: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".history-table table tbody tr").unwrap());
static CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("td").unwrap());
static STATUS: Lazy<Selector> = Lazy::new(|| Selector::parse(".status").unwrap());

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

/// `{success, message?}` from `/login` and `/register`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub success: bool,
    pub message: Option<String>,
}

/// Body of `/predict`. `success` is absent on some older backends.
#[derive(Debug, Clone, Deserialize)]
pub struct PredictResponse {
    pub success: Option<bool>,
    pub message: Option<String>,
    #[serde(flatten)]
    pub result: PredictionResult,
}

/// HTTP client bound to one backend, sharing a cookie jar across calls.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    coordinates: Option<(f64, f64)>,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder().cookie_store(true);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let coordinates = config.latitude.zip(config.longitude);
        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            coordinates,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<(), ClientError> {
        let resp = self
            .client
            .post(self.url("/login"))
            .json(&Credentials { username, password })
            .send()
            .await?;
        let body: AuthResponse = read_json(resp).await?;
        auth_outcome(body, "Login failed. Please check your credentials.")
    }

    pub async fn register(&self, username: &str, password: &str) -> Result<(), ClientError> {
        let resp = self
            .client
            .post(self.url("/register"))
            .json(&Credentials { username, password })
            .send()
            .await?;
        let body: AuthResponse = read_json(resp).await?;
        auth_outcome(body, "Registration failed")
    }

    /// Upload one image as the multipart field `image`.
    pub async fn predict(&self, file: &ImageFile) -> Result<PredictionResult, ClientError> {
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str(&file.mime)?;
        let form = Form::new().part("image", part);

        log::info!("uploading {} ({} bytes)", file.name, file.size());
        let resp = self
            .client
            .post(self.url("/predict"))
            .multipart(form)
            .send()
            .await?;
        let body: PredictResponse = read_json(resp).await?;
        predict_outcome(body)
    }

    /// Current weather and forecast. Falls back to the configured, then the
    /// default, coordinates.
    pub async fn weather(&self, coordinates: Option<(f64, f64)>) -> Result<WeatherReport, ClientError> {
        let (lat, lon) = coordinates
            .or(self.coordinates)
            .unwrap_or(DEFAULT_COORDINATES);
        let resp = self
            .client
            .get(self.url("/weather"))
            .query(&[("lat", lat), ("lon", lon)])
            .send()
            .await?;
        let payload: WeatherPayload = read_json(resp).await?;
        payload.into_report()
    }

    pub async fn crop_health(&self) -> Result<Vec<CropHealth>, ClientError> {
        let resp = self.client.get(self.url("/crop_health")).send().await?;
        let payload: CropHealthPayload = read_json(resp).await?;
        payload.into_rows()
    }

    /// Scrape the history table out of the server-rendered `/history` page.
    pub async fn history(&self) -> Result<HistoryTable, ClientError> {
        let resp = self.client.get(self.url("/history")).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ClientError::Status(status));
        }
        let html = resp.text().await?;
        Ok(parse_history_html(&html))
    }
}

/// Check the status, then decode the body as JSON.
pub async fn read_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ClientError> {
    let status = resp.status();
    if !status.is_success() {
        log::warn!("{} returned {}", resp.url(), status);
        return Err(ClientError::Status(status));
    }
    let text = resp.text().await?;
    Ok(serde_json::from_str(&text)?)
}

pub fn auth_outcome(body: AuthResponse, fallback: &str) -> Result<(), ClientError> {
    if body.success {
        Ok(())
    } else {
        Err(ClientError::Rejected(
            body.message.unwrap_or_else(|| fallback.to_string()),
        ))
    }
}

pub fn predict_outcome(body: PredictResponse) -> Result<PredictionResult, ClientError> {
    if body.success == Some(false) {
        return Err(ClientError::Rejected(
            body.message.unwrap_or_else(|| "Prediction failed".to_string()),
        ));
    }
    Ok(body.result)
}

pub fn parse_history_html(html: &str) -> HistoryTable {
    let doc = Html::parse_document(html);
    let headers = doc.select(&HISTORY_HEADER).map(element_text).collect();
    let rows = doc
        .select(&HISTORY_ROW)
        .map(|row| {
            row.select(&CELL)
                .map(|cell| match cell.select(&STATUS).next() {
                    Some(status) => HistoryCell::Status(element_text(status)),
                    None => HistoryCell::Text(element_text(cell)),
                })
                .collect()
        })
        .collect();
    HistoryTable { headers, rows }
}

/// Text content with runs of whitespace collapsed.
fn element_text(el: ElementRef<'_>) -> String {
    el.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &str) -> reqwest::Response {
        http::Response::builder()
            .status(status)
            .body(body.to_string())
            .unwrap()
            .into()
    }

    #[tokio::test]
    async fn predict_success_parses_result() {
        let body = r#"{"success": true, "prediction": "Potato Late Blight", "confidence": 87.25,
                       "crop_type": "Potato", "is_healthy": false,
                       "image_url": "/static/uploads/a.jpg"}"#;
        let parsed: PredictResponse = read_json(response(200, body)).await.unwrap();
        let result = predict_outcome(parsed).unwrap();
        assert_eq!(result.prediction, "Potato Late Blight");
        assert_eq!(result.confidence, 87.25);
        assert_eq!(result.image_url.as_deref(), Some("/static/uploads/a.jpg"));
    }

    #[tokio::test]
    async fn predict_rejection_carries_server_message() {
        let body = r#"{"success": false, "message": "No image uploaded"}"#;
        let parsed: PredictResponse = read_json(response(200, body)).await.unwrap();
        match predict_outcome(parsed) {
            Err(ClientError::Rejected(msg)) => assert_eq!(msg, "No image uploaded"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_2xx_is_status_error() {
        let err = read_json::<PredictResponse>(response(500, "boom")).await.unwrap_err();
        assert!(matches!(err, ClientError::Status(s) if s.as_u16() == 500));
    }

    #[tokio::test]
    async fn malformed_json_is_parse_error() {
        let err = read_json::<PredictResponse>(response(200, "<html>")).await.unwrap_err();
        assert!(matches!(err, ClientError::Parse(_)));
    }

    #[test]
    fn auth_failure_uses_fallback_message() {
        let body = AuthResponse {
            success: false,
            message: None,
        };
        match auth_outcome(body, "Registration failed") {
            Err(ClientError::Rejected(msg)) => assert_eq!(msg, "Registration failed"),
            other => panic!("unexpected: {other:?}"),
        }
        let ok = AuthResponse {
            success: true,
            message: None,
        };
        assert!(auth_outcome(ok, "x").is_ok());
    }

    #[test]
    fn history_table_is_scraped() {
        let html = r#"
            <html><body>
            <div class="history-table"><table>
              <thead><tr><th>Crop</th><th>Disease</th><th>Status</th></tr></thead>
              <tbody>
                <tr><td>Tomato</td><td>Leaf "Mold"</td>
                    <td><span class="status diseased">Diseased</span> <i>icon</i></td></tr>
                <tr><td>  Corn </td><td>Healthy</td>
                    <td><span class="status healthy">Healthy</span></td></tr>
              </tbody>
            </table></div>
            </body></html>"#;
        let table = parse_history_html(html);
        assert_eq!(table.headers, vec!["Crop", "Disease", "Status"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0][1], HistoryCell::Text("Leaf \"Mold\"".into()));
        assert_eq!(table.rows[0][2], HistoryCell::Status("Diseased".into()));
        assert_eq!(table.rows[1][0], HistoryCell::Text("Corn".into()));
    }

    #[test]
    fn empty_history_page() {
        let table = parse_history_html("<html><body><p>No predictions yet</p></body></html>");
        assert!(table.headers.is_empty());
        assert!(table.is_empty());
    }

    #[test]
    fn client_trims_trailing_slash() {
        let config = Config {
            base_url: "http://localhost:5000/".into(),
            ..Config::default()
        };
        let client = ApiClient::new(&config).unwrap();
        assert_eq!(client.url("/predict"), "http://localhost:5000/predict");
    }
}
