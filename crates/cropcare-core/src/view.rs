//! What the results panel shows for a prediction.
//!
//! Everything here is derived from the [`PredictionResult`] alone; the
//! frontends only draw it.

use std::time::Duration;

use crate::PredictionResult;

/// Delay before the confidence bar animates to its width.
pub const CONFIDENCE_REVEAL_DELAY: Duration = Duration::from_millis(300);

pub const MAINTENANCE_RECOMMENDATIONS: [&str; 4] = [
    "Continue regular monitoring",
    "Maintain proper irrigation",
    "Ensure adequate nutrients",
    "Practice crop rotation",
];

pub const TREATMENT_RECOMMENDATIONS: [&str; 4] = [
    "Isolate affected plants",
    "Consider appropriate treatment",
    "Monitor surrounding plants",
    "Consult local agricultural expert",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeverityLevel {
    None,
    Low,
    Moderate,
    High,
}

impl SeverityLevel {
    pub fn label(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Severity {
    pub level: SeverityLevel,
    pub indicator_percent: u8,
}

impl Severity {
    pub fn classify(is_healthy: bool, confidence: f64) -> Self {
        let (level, indicator_percent) = if is_healthy {
            (SeverityLevel::None, 0)
        } else if confidence >= 80.0 {
            (SeverityLevel::High, 90)
        } else if confidence >= 50.0 {
            (SeverityLevel::Moderate, 60)
        } else {
            (SeverityLevel::Low, 30)
        };
        Self {
            level,
            indicator_percent,
        }
    }
}

pub fn health_label(is_healthy: bool) -> &'static str {
    if is_healthy { "Healthy" } else { "Disease Detected" }
}

pub fn recommendations(is_healthy: bool) -> &'static [&'static str; 4] {
    if is_healthy {
        &MAINTENANCE_RECOMMENDATIONS
    } else {
        &TREATMENT_RECOMMENDATIONS
    }
}

pub fn recommendations_heading(is_healthy: bool) -> &'static str {
    if is_healthy {
        "Maintenance Recommendations"
    } else {
        "Treatment Recommendations"
    }
}

/// View model of the results panel.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    pub prediction: String,
    pub crop_type: String,
    pub confidence_label: String,
    /// Target width of the confidence bar, 0–100.
    pub confidence_percent: f64,
    pub health_label: &'static str,
    /// `healthy` / `diseased`.
    pub health_class: &'static str,
    pub status_icon: &'static str,
    pub severity: Severity,
    pub recommendations_heading: &'static str,
    pub recommendations: &'static [&'static str; 4],
    /// Server copy of the image if provided, else the local preview.
    pub image_source: Option<String>,
}

impl ResultView {
    pub fn from_prediction(result: &PredictionResult, local_preview: Option<&str>) -> Self {
        let healthy = result.is_healthy;
        Self {
            prediction: result.prediction.clone(),
            crop_type: result.crop_type.clone(),
            confidence_label: format!("{}%", result.confidence),
            confidence_percent: result.confidence.clamp(0.0, 100.0),
            health_label: health_label(healthy),
            health_class: if healthy { "healthy" } else { "diseased" },
            status_icon: if healthy {
                "check-circle"
            } else {
                "exclamation-triangle"
            },
            severity: Severity::classify(healthy, result.confidence),
            recommendations_heading: recommendations_heading(healthy),
            recommendations: recommendations(healthy),
            image_source: result
                .image_url
                .clone()
                .or_else(|| local_preview.map(str::to_string)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(is_healthy: bool, confidence: f64) -> PredictionResult {
        PredictionResult {
            prediction: "Apple Scab".into(),
            confidence,
            crop_type: "Apple".into(),
            is_healthy,
            image_url: None,
        }
    }

    #[test]
    fn severity_bands() {
        let high = Severity::classify(false, 85.0);
        assert_eq!((high.level, high.indicator_percent), (SeverityLevel::High, 90));
        let moderate = Severity::classify(false, 55.0);
        assert_eq!(
            (moderate.level, moderate.indicator_percent),
            (SeverityLevel::Moderate, 60)
        );
        let low = Severity::classify(false, 49.99);
        assert_eq!((low.level, low.indicator_percent), (SeverityLevel::Low, 30));
        let none = Severity::classify(true, 99.0);
        assert_eq!((none.level, none.indicator_percent), (SeverityLevel::None, 0));
    }

    #[test]
    fn severity_band_edges_are_inclusive() {
        assert_eq!(Severity::classify(false, 80.0).level, SeverityLevel::High);
        assert_eq!(Severity::classify(false, 50.0).level, SeverityLevel::Moderate);
    }

    #[test]
    fn diseased_view() {
        let view = ResultView::from_prediction(&result(false, 85.0), Some("data:image/png;base64,AA"));
        assert_eq!(view.health_label, "Disease Detected");
        assert_eq!(view.health_class, "diseased");
        assert_eq!(view.confidence_label, "85%");
        assert_eq!(view.recommendations[0], "Isolate affected plants");
        assert_eq!(view.recommendations_heading, "Treatment Recommendations");
        assert_eq!(view.image_source.as_deref(), Some("data:image/png;base64,AA"));
        assert_eq!(view.severity.level.label(), "High");
    }

    #[test]
    fn healthy_view_prefers_server_image() {
        let mut r = result(true, 99.0);
        r.image_url = Some("/static/uploads/leaf.png".into());
        let view = ResultView::from_prediction(&r, Some("data:local"));
        assert_eq!(view.health_label, "Healthy");
        assert_eq!(view.status_icon, "check-circle");
        assert_eq!(view.recommendations, &MAINTENANCE_RECOMMENDATIONS);
        assert_eq!(view.image_source.as_deref(), Some("/static/uploads/leaf.png"));
    }

    #[test]
    fn confidence_bar_is_clamped() {
        let view = ResultView::from_prediction(&result(false, 140.0), None);
        assert_eq!(view.confidence_percent, 100.0);
        assert!(view.image_source.is_none());
    }
}
