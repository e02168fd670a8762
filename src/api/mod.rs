//! API module for the risk predictor
//!
//! HTTP access to the remote prediction service.

pub mod client;

pub use client::{endpoint, ClientError, Connectivity, PredictionClient, PredictionService};
