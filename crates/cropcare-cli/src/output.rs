//! Plain-text rendering of results for the terminal.

use owo_colors::OwoColorize;

use cropcare_core::HistoryTable;
use cropcare_core::dashboard::{CropHealthView, HealthClass, WeatherView};
use cropcare_core::view::{ResultView, SeverityLevel};

/// Applies colors only when enabled.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub color: bool,
}

impl Palette {
    pub fn good(&self, s: &str) -> String {
        if self.color { s.green().bold().to_string() } else { s.to_string() }
    }

    pub fn bad(&self, s: &str) -> String {
        if self.color { s.red().bold().to_string() } else { s.to_string() }
    }

    pub fn warn(&self, s: &str) -> String {
        if self.color { s.yellow().to_string() } else { s.to_string() }
    }

    pub fn dim(&self, s: &str) -> String {
        if self.color { s.dimmed().to_string() } else { s.to_string() }
    }

    pub fn heading(&self, s: &str) -> String {
        if self.color { s.bold().to_string() } else { s.to_string() }
    }
}

pub fn prediction(view: &ResultView, p: Palette) -> String {
    let health = if view.health_class == "healthy" {
        p.good(view.health_label)
    } else {
        p.bad(view.health_label)
    };
    let severity = match view.severity.level {
        SeverityLevel::None => p.good(view.severity.level.label()),
        SeverityLevel::Low => view.severity.level.label().to_string(),
        SeverityLevel::Moderate => p.warn(view.severity.level.label()),
        SeverityLevel::High => p.bad(view.severity.level.label()),
    };

    let mut out = String::new();
    out.push_str(&format!("{health}\n"));
    out.push_str(&format!("  Prediction:  {}\n", view.prediction));
    out.push_str(&format!("  Crop type:   {}\n", view.crop_type));
    out.push_str(&format!("  Confidence:  {}\n", view.confidence_label));
    out.push_str(&format!("  Severity:    {severity}\n"));
    out.push_str(&format!("\n{}\n", p.heading(view.recommendations_heading)));
    for rec in view.recommendations {
        out.push_str(&format!("  - {rec}\n"));
    }
    if let Some(source) = &view.image_source {
        out.push_str(&format!("\n{}\n", p.dim(&format!("Image: {source}"))));
    }
    out
}

pub fn weather(view: &WeatherView, p: Palette) -> String {
    let mut out = format!(
        "{}  {}  {}\n",
        p.heading(&view.location),
        view.temp,
        view.description
    );
    out.push_str(&format!("  Humidity:    {}\n", view.humidity));
    out.push_str(&format!("  Wind:        {}\n", view.wind));
    if let Some(v) = &view.visibility {
        out.push_str(&format!("  Visibility:  {v}\n"));
    }
    if let Some(r) = &view.rainfall {
        out.push_str(&format!("  Rainfall:    {r}\n"));
    }
    if !view.forecast.is_empty() {
        out.push_str(&format!("\n{}\n", p.heading("Forecast")));
        for day in &view.forecast {
            out.push_str(&format!("  {:<4} {:<7} {}\n", day.weekday, day.temp, day.condition));
        }
    }
    if view.rain_advisory {
        out.push_str(&format!("\n{}\n", p.warn("Rain expected: delay spraying and check drainage.")));
    }
    out
}

pub fn crop_health(view: &CropHealthView, p: Palette) -> String {
    if view.rows.is_empty() {
        return format!("{}\n", p.dim("No crop data available"));
    }
    let mut out = String::new();
    for row in &view.rows {
        let percent = format!("{}%", row.percent);
        let percent = match row.class {
            HealthClass::Good => p.good(&percent),
            HealthClass::Warn => p.warn(&percent),
            HealthClass::Bad => p.bad(&percent),
        };
        out.push_str(&format!("  {:<14} {percent}\n", row.label));
    }
    out.push_str(&format!("\nDisease alerts: {}\n", view.alerts));
    out
}

/// Left-aligned columns sized to the widest cell.
pub fn history(table: &HistoryTable, p: Palette) -> String {
    if table.is_empty() {
        return format!("{}\n", p.dim("No predictions yet"));
    }
    let columns = table
        .headers
        .len()
        .max(table.rows.iter().map(Vec::len).max().unwrap_or(0));
    let mut widths = vec![0usize; columns];
    for (i, h) in table.headers.iter().enumerate() {
        widths[i] = widths[i].max(h.chars().count());
    }
    for row in &table.rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.text().chars().count());
        }
    }

    let line = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{c:<width$}", width = widths[i]))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    if !table.headers.is_empty() {
        out.push_str(&p.heading(&line(table.headers.iter().map(String::as_str).collect())));
        out.push('\n');
    }
    for row in &table.rows {
        out.push_str(&line(row.iter().map(|c| c.text()).collect()));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use cropcare_core::{HistoryCell, PredictionResult};

    use super::*;

    const PLAIN: Palette = Palette { color: false };

    #[test]
    fn prediction_lists_recommendations() {
        let result = PredictionResult {
            prediction: "Apple Scab".into(),
            confidence: 64.0,
            crop_type: "Apple".into(),
            is_healthy: false,
            image_url: None,
        };
        let text = prediction(&ResultView::from_prediction(&result, None), PLAIN);
        assert!(text.starts_with("Disease Detected\n"));
        assert!(text.contains("Confidence:  64%"));
        assert!(text.contains("Severity:    Moderate"));
        assert!(text.contains("  - Isolate affected plants"));
    }

    #[test]
    fn history_columns_align() {
        let table = HistoryTable {
            headers: vec!["Crop".into(), "Status".into()],
            rows: vec![
                vec![HistoryCell::Text("Sugarcane".into()), HistoryCell::Status("Healthy".into())],
                vec![HistoryCell::Text("Rice".into()), HistoryCell::Status("Diseased".into())],
            ],
        };
        let text = history(&table, PLAIN);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Crop       Status");
        assert_eq!(lines[1], "Sugarcane  Healthy");
        assert_eq!(lines[2], "Rice       Diseased");
    }

    #[test]
    fn empty_crop_health() {
        assert_eq!(
            crop_health(&CropHealthView::default(), PLAIN),
            "No crop data available\n"
        );
    }
}
