use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::ServiceConfig;
use crate::models::{HealthRecord, PredictionResponse};

pub const HEALTH_PATH: &str = "/health";
pub const PREDICT_PATH: &str = "/predict";

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Server error: {status}")]
    Server { status: u16 },

    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid API URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Outcome of a health check. Every kind of failure collapses into
/// `Unreachable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connectivity {
    Reachable,
    Unreachable,
}

impl Connectivity {
    pub fn is_reachable(self) -> bool {
        self == Connectivity::Reachable
    }
}

/// Anything that can turn a record into a prediction.
#[async_trait]
pub trait PredictionService: Send + Sync {
    async fn predict(
        &self,
        base_url: &str,
        record: &HealthRecord,
    ) -> Result<PredictionResponse, ClientError>;
}

/// Joins the base URL and path literally, the way the service expects.
pub fn endpoint(base_url: &str, path: &str) -> Result<Url, ClientError> {
    let joined = format!("{}{}", base_url, path);
    Url::parse(&joined).map_err(|source| ClientError::InvalidUrl { url: joined, source })
}

/// HTTP client for the prediction service.
#[derive(Debug, Clone)]
pub struct PredictionClient {
    http: Client,
}

impl PredictionClient {
    pub fn new(config: &ServiceConfig) -> Result<Self, ClientError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self { http: builder.build()? })
    }

    /// `GET {base_url}/health`; any 2xx counts as reachable. No retries.
    #[instrument(skip(self))]
    pub async fn test_connection(&self, base_url: &str) -> Connectivity {
        let url = match endpoint(base_url, HEALTH_PATH) {
            Ok(url) => url,
            Err(e) => {
                warn!("health check skipped: {}", e);
                return Connectivity::Unreachable;
            }
        };

        match self.http.get(url).send().await {
            Ok(response) if response.status().is_success() => {
                debug!(status = %response.status(), "health check passed");
                Connectivity::Reachable
            }
            Ok(response) => {
                warn!(status = %response.status(), "health check returned an error status");
                Connectivity::Unreachable
            }
            Err(e) => {
                warn!("health check failed: {}", e);
                Connectivity::Unreachable
            }
        }
    }
}

#[async_trait]
impl PredictionService for PredictionClient {
    /// `POST {base_url}/predict` with the record as a JSON body.
    #[instrument(skip(self, record))]
    async fn predict(
        &self,
        base_url: &str,
        record: &HealthRecord,
    ) -> Result<PredictionResponse, ClientError> {
        let url = endpoint(base_url, PREDICT_PATH)?;
        let response = self.http.post(url).json(record).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Server { status: status.as_u16() });
        }

        let body = response.bytes().await?;
        let prediction = serde_json::from_slice::<PredictionResponse>(&body)?;
        debug!(
            random_forest = %prediction.random_forest.result,
            logistic_regression = %prediction.logistic_regression.result,
            "prediction received"
        );
        Ok(prediction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_concatenates_literally() {
        let url = endpoint("http://localhost:8000", PREDICT_PATH).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/predict");
    }

    #[test]
    fn endpoint_rejects_garbage() {
        let err = endpoint("not a url", HEALTH_PATH).unwrap_err();
        assert!(matches!(err, ClientError::InvalidUrl { .. }));
    }

    #[test]
    fn server_error_message_carries_status() {
        let err = ClientError::Server { status: 404 };
        assert_eq!(err.to_string(), "Server error: 404");
    }
}
