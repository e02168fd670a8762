use serde::{Serialize, Deserialize};

/// Label the service uses for the positive class.
pub const POSITIVE_LABEL: &str = "Diabetic";

/// One model's answer for a submitted record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelOutput {
    pub prediction: f64,
    pub result: String,
    pub confidence: f64,
}

impl ModelOutput {
    pub fn is_positive(&self) -> bool {
        self.result == POSITIVE_LABEL
    }
}

/// Both models' outputs. A body missing either key fails to decode,
/// so a partial response never reaches the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub random_forest: ModelOutput,
    pub logistic_regression: ModelOutput,
}

/// Identifies one of the two models in a [`PredictionResponse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    RandomForest,
    LogisticRegression,
}

impl ModelKind {
    pub const ALL: [ModelKind; 2] = [ModelKind::RandomForest, ModelKind::LogisticRegression];

    pub fn title(self) -> &'static str {
        match self {
            ModelKind::RandomForest => "Random Forest",
            ModelKind::LogisticRegression => "Logistic Regression",
        }
    }
}

impl PredictionResponse {
    pub fn output(&self, kind: ModelKind) -> &ModelOutput {
        match kind {
            ModelKind::RandomForest => &self.random_forest,
            ModelKind::LogisticRegression => &self.logistic_regression,
        }
    }
}
