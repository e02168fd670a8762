//! Diabetes risk predictor
//!
//! Command line entry point.

use std::process::ExitCode;
use std::sync::Arc;
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use risk_predictor::config::{ConfigStore, Settings};
use risk_predictor::core::{Orchestrator, RequestState};
use risk_predictor::models::{FormCapture, HealthField};
use risk_predictor::ui::{self, App, PredictionReport};
use risk_predictor::PredictionClient;

#[derive(Parser)]
#[command(name = "risk-predictor", version, about = "Diabetes risk prediction client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Base URL of the prediction service
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// More log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit one set of health parameters
    Predict {
        #[command(flatten)]
        fields: FieldArgs,
        /// Reject negative or non-finite values instead of sending them
        #[arg(long)]
        strict: bool,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check that the service answers on /health
    Health {
        /// URL to test instead of the configured one
        #[arg(long)]
        url: Option<String>,
    },
    /// Fill in the form and submit interactively
    Interactive {
        #[arg(long)]
        strict: bool,
    },
}

/// Raw field input. Values that do not parse are sent as zero.
#[derive(Args)]
struct FieldArgs {
    #[arg(long)]
    pregnancies: Option<String>,
    #[arg(long)]
    glucose: Option<String>,
    #[arg(long)]
    blood_pressure: Option<String>,
    #[arg(long)]
    skin_thickness: Option<String>,
    #[arg(long)]
    insulin: Option<String>,
    #[arg(long)]
    bmi: Option<String>,
    #[arg(long)]
    diabetes_pedigree_function: Option<String>,
    #[arg(long)]
    age: Option<String>,
}

impl FieldArgs {
    fn capture(&self) -> FormCapture {
        let mut form = FormCapture::new();
        let inputs = [
            (HealthField::Pregnancies, &self.pregnancies),
            (HealthField::Glucose, &self.glucose),
            (HealthField::BloodPressure, &self.blood_pressure),
            (HealthField::SkinThickness, &self.skin_thickness),
            (HealthField::Insulin, &self.insulin),
            (HealthField::Bmi, &self.bmi),
            (HealthField::DiabetesPedigreeFunction, &self.diabetes_pedigree_function),
            (HealthField::Age, &self.age),
        ];
        for (field, raw) in inputs {
            if let Some(raw) = raw {
                form.set(field, raw);
            }
        }
        form
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    #[cfg(feature = "telemetry")]
    {
        builder.json().init();
    }
    #[cfg(not(feature = "telemetry"))]
    {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Load configuration
    let settings = Settings::load(cli.api_url.as_deref()).context("Failed to load configuration")?;
    let service_config = settings.service_config();
    let store = ConfigStore::new(&service_config);
    let client = PredictionClient::new(&service_config).context("Failed to build HTTP client")?;
    info!(api_url = %service_config.base_url, "risk predictor starting");

    match cli.command {
        Commands::Predict { fields, strict, json } => {
            let form = fields.capture();
            let record = if strict {
                match form.validate() {
                    Ok(record) => record,
                    Err(errors) => {
                        for error in errors {
                            eprintln!("{}", error);
                        }
                        return Ok(ExitCode::from(2));
                    }
                }
            } else {
                form.submit()
            };

            let orchestrator = Orchestrator::new(client, store);
            match orchestrator.submit(record).await {
                RequestState::Succeeded(response) if json => {
                    let report = PredictionReport::new(&response);
                    println!("{}", serde_json::to_string_pretty(&report)?);
                    Ok(ExitCode::SUCCESS)
                }
                RequestState::Succeeded(response) => {
                    print!("{}", ui::render_results(&response));
                    Ok(ExitCode::SUCCESS)
                }
                RequestState::Failed(message) => {
                    eprint!("{}", ui::render_error(&message));
                    Ok(ExitCode::FAILURE)
                }
                RequestState::Idle | RequestState::Loading => Ok(ExitCode::FAILURE),
            }
        }
        Commands::Health { url } => {
            let url = url.unwrap_or(service_config.base_url);
            let connectivity = client.test_connection(&url).await;
            println!("{}", ui::render_connectivity(connectivity));
            Ok(if connectivity.is_reachable() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Commands::Interactive { strict } => {
            let orchestrator = Arc::new(Orchestrator::new(client.clone(), store.clone()));
            let mut app = App::new(orchestrator, client, store, strict);
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            let mut stdout = tokio::io::stdout();
            app.run(stdin, &mut stdout).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
