//! Text rendering of prediction results, errors and probe feedback.

use std::fmt::Write as _;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::api::Connectivity;
use crate::core::{Consensus, Verdict};
use crate::models::{ModelKind, ModelOutput, PredictionResponse};

const BAR_WIDTH: usize = 20;

pub const DISCLAIMER: &str = "This prediction is for informational purposes only and should not be \
considered medical advice. Please consult a healthcare professional for proper diagnosis.";

impl Verdict {
    pub fn title(self) -> &'static str {
        match self {
            Verdict::AtRisk | Verdict::LowRisk => "Both Models Agree",
            Verdict::Mixed => "Models Have Different Predictions",
        }
    }

    pub fn advice(self) -> &'static str {
        match self {
            Verdict::AtRisk => "Consult a healthcare professional for proper evaluation",
            Verdict::LowRisk => "Continue maintaining a healthy lifestyle",
            Verdict::Mixed => "Consider consulting a healthcare professional for clarification",
        }
    }

    fn marker(self) -> &'static str {
        match self {
            Verdict::AtRisk | Verdict::Mixed => "!",
            Verdict::LowRisk => "+",
        }
    }
}

/// Machine-readable form of a finished prediction.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionReport {
    pub random_forest: ModelOutput,
    pub logistic_regression: ModelOutput,
    pub both_agree: bool,
    pub consensus_is_positive: bool,
    pub completed_at: DateTime<Utc>,
}

impl PredictionReport {
    pub fn new(response: &PredictionResponse) -> Self {
        let consensus = Consensus::of(response);
        Self {
            random_forest: response.random_forest.clone(),
            logistic_regression: response.logistic_regression.clone(),
            both_agree: consensus.both_agree,
            consensus_is_positive: consensus.consensus_is_positive,
            completed_at: Utc::now(),
        }
    }
}

/// Draws the confidence bar. Only the bar is clamped, the percentage is not.
pub fn confidence_bar(percent: i64) -> String {
    let filled = (percent.clamp(0, 100) as usize * BAR_WIDTH) / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

fn render_card(out: &mut String, kind: ModelKind, output: &ModelOutput) {
    let (headline, detail) = if output.is_positive() {
        ("At Risk", "Indicators suggest elevated diabetes risk")
    } else {
        ("Low Risk", "Indicators suggest low diabetes risk")
    };
    let percent = output.confidence_percent();

    let _ = writeln!(out, "{}", kind.title());
    let _ = writeln!(out, "  {} - {}", headline, detail);
    let _ = writeln!(out, "  Model Confidence {}%", percent);
    let _ = writeln!(out, "  {}", confidence_bar(percent));
}

pub fn render_results(response: &PredictionResponse) -> String {
    let verdict = Consensus::of(response).verdict();
    let mut out = String::new();

    let _ = writeln!(out, "[{}] {}", verdict.marker(), verdict.title());
    let _ = writeln!(out, "    {}", verdict.advice());
    let _ = writeln!(out);
    for kind in ModelKind::ALL {
        render_card(&mut out, kind, response.output(kind));
        let _ = writeln!(out);
    }
    let _ = writeln!(out, "{}", DISCLAIMER);
    out
}

/// Shown while a request is in flight.
pub fn render_loading() -> &'static str {
    "Analyzing...\n"
}

pub fn render_error(message: &str) -> String {
    format!(
        "Connection Error\n{}. Make sure your FastAPI server is running and configure \
the API URL using the settings command.\n",
        message
    )
}

pub fn render_connectivity(connectivity: Connectivity) -> &'static str {
    match connectivity {
        Connectivity::Reachable => "Connection successful!",
        Connectivity::Unreachable => "Failed to connect. Check the URL and server.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(result: &str, confidence: f64) -> ModelOutput {
        ModelOutput { prediction: 0.0, result: result.to_string(), confidence }
    }

    #[test]
    fn agreeing_positive_results() {
        let response = PredictionResponse {
            random_forest: output("Diabetic", 0.873),
            logistic_regression: output("Diabetic", 0.66),
        };
        let text = render_results(&response);

        assert!(text.starts_with("[!] Both Models Agree"));
        assert!(text.contains("Consult a healthcare professional for proper evaluation"));
        assert!(text.contains("Random Forest\n  At Risk"));
        assert!(text.contains("Model Confidence 87%"));
        assert!(text.contains("Model Confidence 66%"));
        assert!(text.ends_with(&format!("{}\n", DISCLAIMER)));
    }

    #[test]
    fn mixed_results() {
        let response = PredictionResponse {
            random_forest: output("Not Diabetic", 0.55),
            logistic_regression: output("Diabetic", 0.52),
        };
        let text = render_results(&response);

        assert!(text.starts_with("[!] Models Have Different Predictions"));
        assert!(text.contains("Random Forest\n  Low Risk"));
        assert!(text.contains("Logistic Regression\n  At Risk"));
    }

    #[test]
    fn bar_clamps_but_percentage_does_not() {
        assert_eq!(confidence_bar(150), format!("[{}]", "#".repeat(20)));
        assert_eq!(confidence_bar(-5), format!("[{}]", "-".repeat(20)));
        assert_eq!(confidence_bar(50), format!("[{}{}]", "#".repeat(10), "-".repeat(10)));

        let response = PredictionResponse {
            random_forest: output("Diabetic", 1.5),
            logistic_regression: output("Diabetic", 1.5),
        };
        assert!(render_results(&response).contains("Model Confidence 150%"));
    }

    #[test]
    fn error_banner_includes_hint() {
        let text = render_error("Server error: 500");
        assert!(text.starts_with("Connection Error\nServer error: 500. Make sure"));
    }

    #[test]
    fn report_carries_consensus() {
        let response = PredictionResponse {
            random_forest: output("Diabetic", 0.9),
            logistic_regression: output("Not Diabetic", 0.6),
        };
        let report = serde_json::to_value(PredictionReport::new(&response)).unwrap();
        assert_eq!(report["both_agree"], false);
        assert_eq!(report["consensus_is_positive"], true);
        assert_eq!(report["random_forest"]["result"], "Diabetic");
    }
}
