//! Weather and crop-health cards on the dashboard.

use chrono::DateTime;
use serde::Deserialize;

use crate::ClientError;

/// Forecast days shown on the card.
pub const FORECAST_DAYS: usize = 3;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CurrentWeather {
    pub location: Option<String>,
    #[serde(default)]
    pub temp: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub humidity: f64,
    /// Meters per second.
    #[serde(default)]
    pub wind_speed: f64,
    /// Meters.
    pub visibility: Option<f64>,
    /// Millimeters in the last hour.
    pub rainfall: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ForecastDay {
    /// ISO-8601 timestamp, e.g. `2025-06-01T09:00:00Z`.
    pub date: String,
    #[serde(default)]
    pub temp: f64,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub current: CurrentWeather,
    pub forecast: Vec<ForecastDay>,
}

/// Raw `/weather` body: either data or `{error, ...fallback}`.
#[derive(Debug, Deserialize)]
pub struct WeatherPayload {
    pub error: Option<String>,
    pub current: Option<CurrentWeather>,
    #[serde(default)]
    pub forecast: Vec<ForecastDay>,
}

impl WeatherPayload {
    pub fn into_report(self) -> Result<WeatherReport, ClientError> {
        if let Some(error) = self.error {
            return Err(ClientError::Backend(error));
        }
        Ok(WeatherReport {
            current: self.current.unwrap_or_default(),
            forecast: self.forecast,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CropHealth {
    pub crop_type: Option<String>,
    #[serde(default)]
    pub healthy: u64,
    #[serde(default)]
    pub diseased: u64,
    #[serde(default)]
    pub total: u64,
    pub health_percentage: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CropHealthPayload {
    Rows(Vec<CropHealth>),
    Error { error: String },
}

impl CropHealthPayload {
    pub fn into_rows(self) -> Result<Vec<CropHealth>, ClientError> {
        match self {
            Self::Rows(rows) => Ok(rows),
            Self::Error { error } => Err(ClientError::Backend(error)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastView {
    pub weekday: String,
    pub temp: String,
    pub condition: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherView {
    pub location: String,
    pub temp: String,
    pub description: String,
    pub humidity: String,
    pub wind: String,
    pub visibility: Option<String>,
    pub rainfall: Option<String>,
    pub forecast: Vec<ForecastView>,
    pub rain_advisory: bool,
}

impl WeatherView {
    pub fn from_report(report: &WeatherReport) -> Self {
        let c = &report.current;
        let forecast = report
            .forecast
            .iter()
            .take(FORECAST_DAYS)
            .map(|day| ForecastView {
                weekday: weekday(&day.date),
                temp: format!("{}°C", round_half_up(day.temp)),
                condition: capitalize(&day.description),
            })
            .collect();
        let rain_advisory = report
            .forecast
            .iter()
            .any(|d| d.description.to_lowercase().contains("rain"));

        Self {
            location: c
                .location
                .clone()
                .filter(|l| !l.is_empty())
                .unwrap_or_else(|| "Unknown".to_string()),
            temp: format!("{}°C", round_half_up(c.temp)),
            description: capitalize(&c.description),
            humidity: format!("{}%", c.humidity),
            wind: format!("{} km/h", round_half_up(c.wind_speed * 3.6)),
            visibility: c.visibility.map(|v| format!("{} km", round_half_up(v / 1000.0))),
            rainfall: c.rainfall.map(|r| format!("{r} mm")),
            forecast,
            rain_advisory,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthClass {
    Good,
    Warn,
    Bad,
}

impl HealthClass {
    pub fn from_percent(percent: u32) -> Self {
        if percent >= 85 {
            Self::Good
        } else if percent >= 60 {
            Self::Warn
        } else {
            Self::Bad
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CropHealthRow {
    pub label: String,
    pub percent: u32,
    pub class: HealthClass,
}

impl CropHealthRow {
    pub fn from_health(item: &CropHealth) -> Self {
        let percent = match item.health_percentage {
            Some(p) => p.round().max(0.0) as u32,
            None if item.total > 0 => {
                ((item.healthy as f64 / item.total as f64) * 100.0).round() as u32
            }
            None => 0,
        };
        Self {
            label: capitalize(item.crop_type.as_deref().unwrap_or("Field")),
            percent,
            class: HealthClass::from_percent(percent),
        }
    }
}

/// Crop-health card contents; empty `rows` means "no crop data yet".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CropHealthView {
    pub rows: Vec<CropHealthRow>,
    pub alerts: u64,
}

impl CropHealthView {
    pub fn from_rows(items: &[CropHealth]) -> Self {
        Self {
            rows: items.iter().map(CropHealthRow::from_health).collect(),
            alerts: items.iter().map(|i| i.diseased).sum(),
        }
    }
}

/// Halves round towards positive infinity and the result is never `-0`,
/// so `-0.4` shows as `0` and `-2.5` as `-2`.
fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor() + 0.0
}

pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn weekday(date: &str) -> String {
    DateTime::parse_from_rfc3339(date)
        .map(|d| d.format("%a").to_string())
        .unwrap_or_else(|_| "—".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> WeatherReport {
        WeatherReport {
            current: CurrentWeather {
                location: Some("Pune".into()),
                temp: 28.6,
                description: "scattered clouds".into(),
                humidity: 60.0,
                wind_speed: 2.0,
                visibility: Some(10_000.0),
                rainfall: Some(0.5),
            },
            forecast: vec![
                ForecastDay {
                    date: "2025-06-02T09:00:00Z".into(),
                    temp: 27.4,
                    description: "light rain".into(),
                },
                ForecastDay {
                    date: "2025-06-03T09:00:00Z".into(),
                    temp: 30.0,
                    description: "clear sky".into(),
                },
                ForecastDay {
                    date: "2025-06-04T09:00:00Z".into(),
                    temp: 31.0,
                    description: "clear sky".into(),
                },
                ForecastDay {
                    date: "2025-06-05T09:00:00Z".into(),
                    temp: 29.0,
                    description: "clouds".into(),
                },
            ],
        }
    }

    #[test]
    fn weather_view_formats_units() {
        let view = WeatherView::from_report(&report());
        assert_eq!(view.location, "Pune");
        assert_eq!(view.temp, "29°C");
        assert_eq!(view.description, "Scattered clouds");
        assert_eq!(view.humidity, "60%");
        assert_eq!(view.wind, "7 km/h");
        assert_eq!(view.visibility.as_deref(), Some("10 km"));
        assert_eq!(view.rainfall.as_deref(), Some("0.5 mm"));
        assert!(view.rain_advisory);
    }

    #[test]
    fn temperatures_round_half_up_without_negative_zero() {
        let mut r = report();
        r.current.temp = -0.4;
        r.forecast[0].temp = -2.5;
        let view = WeatherView::from_report(&r);
        assert_eq!(view.temp, "0°C");
        assert_eq!(view.forecast[0].temp, "-2°C");
        assert_eq!(round_half_up(2.5), 3.0);
    }

    #[test]
    fn forecast_limited_to_three_days() {
        let view = WeatherView::from_report(&report());
        assert_eq!(view.forecast.len(), 3);
        assert_eq!(view.forecast[0].weekday, "Mon");
        assert_eq!(view.forecast[0].temp, "27°C");
        assert_eq!(view.forecast[0].condition, "Light rain");
    }

    #[test]
    fn no_rain_no_advisory() {
        let mut r = report();
        r.forecast.retain(|d| !d.description.contains("rain"));
        assert!(!WeatherView::from_report(&r).rain_advisory);
    }

    #[test]
    fn weather_error_payload_is_backend_error() {
        let payload: WeatherPayload = serde_json::from_str(
            r#"{"error": "401 Unauthorized", "current": {"temp": 29}, "forecast": []}"#,
        )
        .unwrap();
        assert!(matches!(payload.into_report(), Err(ClientError::Backend(e)) if e == "401 Unauthorized"));
    }

    #[test]
    fn crop_health_percent_prefers_server_value() {
        let item = CropHealth {
            crop_type: Some("tomato".into()),
            healthy: 1,
            diseased: 3,
            total: 4,
            health_percentage: Some(86.4),
        };
        let row = CropHealthRow::from_health(&item);
        assert_eq!(row.label, "Tomato");
        assert_eq!(row.percent, 86);
        assert_eq!(row.class, HealthClass::Good);
    }

    #[test]
    fn crop_health_percent_computed_when_missing() {
        let item = CropHealth {
            crop_type: None,
            healthy: 2,
            diseased: 1,
            total: 3,
            health_percentage: None,
        };
        let row = CropHealthRow::from_health(&item);
        assert_eq!(row.label, "Field");
        assert_eq!(row.percent, 67);
        assert_eq!(row.class, HealthClass::Warn);

        let empty = CropHealth {
            total: 0,
            healthy: 0,
            ..item
        };
        assert_eq!(CropHealthRow::from_health(&empty).class, HealthClass::Bad);
    }

    #[test]
    fn crop_health_payload_variants() {
        let rows: CropHealthPayload = serde_json::from_str(
            r#"[{"crop_type": "corn", "healthy": 3, "diseased": 2, "total": 5}]"#,
        )
        .unwrap();
        let rows = rows.into_rows().unwrap();
        assert_eq!(CropHealthView::from_rows(&rows).alerts, 2);

        let err: CropHealthPayload = serde_json::from_str(r#"{"error": "unauthorized"}"#).unwrap();
        assert!(err.into_rows().is_err());
    }
}
