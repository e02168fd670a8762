use std::sync::Arc;
use std::time::Duration;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use risk_predictor::api::PredictionClient;
use risk_predictor::config::{ConfigStore, ServiceConfig};
use risk_predictor::core::Orchestrator;
use risk_predictor::ui::App;

async fn mock_service() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "random_forest": {"prediction": 0, "result": "Not Diabetic", "confidence": 0.912},
            "logistic_regression": {"prediction": 0, "result": "Not Diabetic", "confidence": 0.774}
        })))
        .mount(&server)
        .await;
    server
}

fn app(strict: bool) -> App<PredictionClient> {
    let config = ServiceConfig {
        base_url: "http://127.0.0.1:1".to_string(),
        ..ServiceConfig::default()
    };
    let store = ConfigStore::new(&config);
    let client = PredictionClient::new(&config).unwrap();
    let orchestrator = Arc::new(Orchestrator::new(client.clone(), store.clone()));
    App::new(orchestrator, client, store, strict)
}

async fn run(app: &mut App<PredictionClient>, script: String) -> String {
    let mut out = Vec::new();
    app.run(script.as_bytes(), &mut out).await.unwrap();
    String::from_utf8(out).unwrap()
}

#[tokio::test]
async fn configure_test_and_predict() {
    let server = mock_service().await;
    let mut app = app(false);

    let script = format!(
        "test\npredict\nsettings {uri}\ntest\nset Glucose 148\nset bmi 33.6\npredict\nquit\n",
        uri = server.uri()
    );
    let output = run(&mut app, script).await;

    assert!(output.starts_with("Diabetes Risk Predictor - using Random Forest & Logistic Regression"));
    let failed_probe = output.find("Failed to connect. Check the URL and server.").unwrap();
    let error_banner = output.find("Connection Error").unwrap();
    let good_probe = output.find("Connection successful!").unwrap();
    let results = output.find("[+] Both Models Agree").unwrap();
    assert!(failed_probe < error_banner && error_banner < good_probe && good_probe < results);

    let analyzing = output[good_probe..].find("Analyzing...").unwrap() + good_probe;
    assert!(analyzing < results);
    assert!(output.contains("Continue maintaining a healthy lifestyle"));
    assert!(output.contains("Model Confidence 91%"));
    assert!(output.contains("Model Confidence 77%"));
    assert_eq!(app.form().record().glucose, 148.0);
}

#[tokio::test]
async fn form_walkthrough_then_predict() {
    let server = mock_service().await;
    let mut app = app(false);

    let script = format!(
        "settings {uri}\nform\n6\n148\n72\n35\n0\n33.6\n0.627\n50\npredict\n",
        uri = server.uri()
    );
    let output = run(&mut app, script).await;

    assert!(output.contains("Prediction Complete"));
    let record = app.form().record();
    assert_eq!(record.pregnancies, 6.0);
    assert_eq!(record.age, 50.0);
}

#[tokio::test]
async fn strict_mode_blocks_negative_values() {
    let server = mock_service().await;
    let mut app = app(true);

    let script = format!("settings {uri}\nset Insulin -4\npredict\n", uri = server.uri());
    let output = run(&mut app, script).await;

    assert!(output.contains("Insulin (μU/mL) must not be negative"));
    assert!(!output.contains("Analyzing..."));
    assert!(!output.contains("Prediction Complete"));
    let posted = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path() == "/predict")
        .count();
    assert_eq!(posted, 0);
}

#[tokio::test]
async fn unknown_commands_do_not_end_the_session() {
    let mut app = app(false);
    let output = run(&mut app, "fly\nsettings\n".to_string()).await;

    assert!(output.contains("unrecognised command \"fly\""));
    assert!(output.contains("API Configuration\nAPI URL: http://127.0.0.1:1"));
}

#[tokio::test]
async fn loading_line_precedes_a_slow_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({
                    "random_forest": {"prediction": 1, "result": "Diabetic", "confidence": 0.8},
                    "logistic_regression": {"prediction": 1, "result": "Diabetic", "confidence": 0.7}
                }))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    let mut app = app(false);

    let output = run(&mut app, format!("settings {}\npredict\n", server.uri())).await;

    let analyzing = output.find("Analyzing...").unwrap();
    let results = output.find("[!] Both Models Agree").unwrap();
    assert!(analyzing < results);
}
