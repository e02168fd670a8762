//! Data exchanged with the prediction service.

pub mod prediction;
pub mod record;

pub use prediction::{ModelKind, ModelOutput, PredictionResponse, POSITIVE_LABEL};
pub use record::{FieldError, FieldHint, FormCapture, HealthField, HealthRecord};
