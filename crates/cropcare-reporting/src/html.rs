//! Standalone HTML report for one prediction.

use chrono::NaiveDate;
use cropcare_core::PredictionResult;
use cropcare_core::view::ResultView;

use crate::types::short_date;

const STYLE: &str = "\
body { font-family: Arial, sans-serif; margin: 40px; }
.header { text-align: center; margin-bottom: 30px; }
.report-section { margin-bottom: 20px; }
.result-item { margin: 10px 0; }
.healthy { color: green; }
.diseased { color: red; }
.footer { margin-top: 40px; color: #777; }";

pub fn render_report(result: &PredictionResult, date: NaiveDate) -> String {
    let view = ResultView::from_prediction(result, None);
    let items: String = view
        .recommendations
        .iter()
        .map(|r| format!("        <li>{}</li>\n", html_escape(r)))
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>Crop Analysis Report</title>
  <style>
{style}
  </style>
</head>
<body>
  <div class="header">
    <h1>Crop Analysis Report</h1>
    <p>Generated on {date}</p>
  </div>
  <div class="report-section">
    <h2>Analysis Results</h2>
    <div class="result-item"><strong>Crop Type:</strong> {crop}</div>
    <div class="result-item"><strong>Prediction:</strong> {prediction}</div>
    <div class="result-item"><strong>Confidence:</strong> {confidence}</div>
    <div class="result-item"><strong>Health Status:</strong>
      <span class="{class}">{health}</span>
    </div>
  </div>
  <div class="report-section">
    <h2>{heading}</h2>
    <ul>
{items}    </ul>
  </div>
  <div class="footer">
    <p>CropCare AI - Powered by advanced machine learning</p>
  </div>
</body>
</html>
"#,
        style = STYLE,
        date = short_date(date),
        crop = html_escape(&view.crop_type),
        prediction = html_escape(&view.prediction),
        confidence = html_escape(&view.confidence_label),
        class = view.health_class,
        health = view.health_label,
        heading = view.recommendations_heading,
        items = items,
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, 4).unwrap()
    }

    #[test]
    fn diseased_report_lists_treatment() {
        let result = PredictionResult {
            prediction: "Tomato Early Blight".into(),
            confidence: 91.5,
            crop_type: "Tomato".into(),
            is_healthy: false,
            image_url: None,
        };
        let html = render_report(&result, date());
        assert!(html.contains("Generated on 11/4/2025"));
        assert!(html.contains("<strong>Confidence:</strong> 91.5%"));
        assert!(html.contains(r#"<span class="diseased">Disease Detected</span>"#));
        assert!(html.contains("<h2>Treatment Recommendations</h2>"));
        assert!(html.contains("<li>Consult local agricultural expert</li>"));
        assert!(!html.contains("Practice crop rotation"));
    }

    #[test]
    fn values_are_escaped() {
        let result = PredictionResult {
            prediction: "<script>alert('x')</script>".into(),
            confidence: 50.0,
            crop_type: "Beans & Peas".into(),
            is_healthy: true,
            image_url: None,
        };
        let html = render_report(&result, date());
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
        assert!(html.contains("Beans &amp; Peas"));
        assert!(html.contains("<h2>Maintenance Recommendations</h2>"));
    }
}
