//! Diabetes risk predictor client library
//!
//! Captures eight health indicators, sends them to a remote two-model
//! prediction service and summarises whether the models agree.

pub mod api;
pub mod config;
pub mod core;
pub mod models;
pub mod ui;

pub use crate::api::{Connectivity, PredictionClient, PredictionService};
pub use crate::config::{ConfigStore, ServiceConfig, Settings};
pub use crate::core::{Consensus, Orchestrator, RequestState, Verdict};
pub use crate::models::{FormCapture, HealthField, HealthRecord, ModelOutput, PredictionResponse};
