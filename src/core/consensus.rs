use crate::models::{ModelOutput, PredictionResponse, POSITIVE_LABEL};

/// Agreement between the two models of a [`PredictionResponse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Consensus {
    pub both_agree: bool,
    /// Taken from the random forest; only meaningful when `both_agree`.
    pub consensus_is_positive: bool,
}

/// Which consensus banner to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    AtRisk,
    LowRisk,
    Mixed,
}

impl Consensus {
    pub fn of(response: &PredictionResponse) -> Self {
        Self {
            both_agree: response.random_forest.result == response.logistic_regression.result,
            consensus_is_positive: response.random_forest.result == POSITIVE_LABEL,
        }
    }

    pub fn verdict(&self) -> Verdict {
        match (self.both_agree, self.consensus_is_positive) {
            (true, true) => Verdict::AtRisk,
            (true, false) => Verdict::LowRisk,
            (false, _) => Verdict::Mixed,
        }
    }
}

/// Confidence as a whole percentage, rounded half up. Not clamped.
pub fn confidence_percent(confidence: f64) -> i64 {
    (confidence * 100.0 + 0.5).floor() as i64
}

impl ModelOutput {
    pub fn confidence_percent(&self) -> i64 {
        confidence_percent(self.confidence)
    }
}
