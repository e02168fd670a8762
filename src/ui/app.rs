//! Interactive terminal session: fill in the form, submit, adjust settings.

use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::api::{PredictionClient, PredictionService};
use crate::config::ConfigStore;
use crate::core::{Orchestrator, RequestState};
use crate::models::{FormCapture, HealthField, HealthRecord};
use super::form::{prompt_fields, render_record};
use super::results::{render_connectivity, render_error, render_loading, render_results};

pub const BANNER: &str = "\
Diabetes Risk Predictor - using Random Forest & Logistic Regression
Assesses diabetes risk from eight key health indicators.

";

pub const HELP: &str = "\
Commands:
  form                 enter all health parameters
  set <field> <value>  change one parameter (e.g. set Glucose 148)
  show                 show the current parameters
  predict              submit the parameters for prediction
  settings [url]       show or save the API URL
  test [url]           test the connection to a URL (default: saved URL)
  clear                clear the last result
  help                 show this help
  quit                 leave
";

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    FillForm,
    SetField(HealthField, String),
    ShowForm,
    Submit,
    ShowSettings,
    SaveSettings(String),
    TestConnection(Option<String>),
    Dismiss,
    Help,
    Quit,
}

impl Message {
    /// Parses one input line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Message>, String> {
        let mut words = line.split_whitespace();
        let command = match words.next() {
            Some(command) => command.to_ascii_lowercase(),
            None => return Ok(None),
        };
        let rest: Vec<&str> = words.collect();

        let message = match (command.as_str(), rest.as_slice()) {
            ("form", []) => Message::FillForm,
            ("set", [name, value]) => Message::SetField(field_named(name)?, value.to_string()),
            // An empty value is allowed and coerces to zero.
            ("set", [name]) => Message::SetField(field_named(name)?, String::new()),
            ("show", []) => Message::ShowForm,
            ("predict" | "submit", []) => Message::Submit,
            ("settings", []) => Message::ShowSettings,
            ("settings", [url]) => Message::SaveSettings(url.to_string()),
            ("test", []) => Message::TestConnection(None),
            ("test", [url]) => Message::TestConnection(Some(url.to_string())),
            ("clear", []) => Message::Dismiss,
            ("help" | "?", []) => Message::Help,
            ("quit" | "exit", []) => Message::Quit,
            _ => return Err(format!("unrecognised command {:?}, type `help`", line.trim())),
        };
        Ok(Some(message))
    }
}

fn field_named(name: &str) -> Result<HealthField, String> {
    HealthField::ALL
        .into_iter()
        .find(|f| f.wire_name().eq_ignore_ascii_case(name))
        .ok_or_else(|| format!("unknown field {:?}", name))
}

pub struct App<S> {
    orchestrator: Arc<Orchestrator<S>>,
    probe: PredictionClient,
    config: Arc<ConfigStore>,
    form: FormCapture,
    strict: bool,
}

impl<S: PredictionService> App<S> {
    pub fn new(
        orchestrator: Arc<Orchestrator<S>>,
        probe: PredictionClient,
        config: Arc<ConfigStore>,
        strict: bool,
    ) -> Self {
        Self {
            orchestrator,
            probe,
            config,
            form: FormCapture::new(),
            strict,
        }
    }

    pub fn form(&self) -> &FormCapture {
        &self.form
    }

    /// Handles every message that does not need more input.
    pub async fn update(&mut self, message: Message) -> String {
        debug!(?message, "handling message");
        match message {
            Message::SetField(field, raw) => {
                self.form.set(field, &raw);
                format!("{} = {}\n", field.label(), self.form.record().get(field))
            }
            Message::ShowForm => render_record(self.form.record()),
            Message::Submit => match self.record_to_submit() {
                Ok(record) => format!("{}{}", render_loading(), self.resolve(record).await),
                Err(errors) => errors,
            },
            Message::ShowSettings => format!(
                "API Configuration\nAPI URL: {}\n",
                self.config.base_url().await
            ),
            Message::SaveSettings(url) => {
                self.config.update(url.as_str()).await;
                format!("API URL saved: {}\n", url)
            }
            Message::TestConnection(url) => {
                let url = match url {
                    Some(url) => url,
                    None => self.config.base_url().await,
                };
                let connectivity = self.probe.test_connection(&url).await;
                format!("{}\n", render_connectivity(connectivity))
            }
            Message::Dismiss => {
                self.orchestrator.dismiss();
                "Cleared.\n".to_string()
            }
            Message::Help => HELP.to_string(),
            Message::FillForm | Message::Quit => String::new(),
        }
    }

    /// The record to send, or the rendered field errors in strict mode.
    fn record_to_submit(&self) -> Result<HealthRecord, String> {
        if self.strict {
            self.form
                .validate()
                .map_err(|errors| errors.iter().map(|e| format!("{}\n", e)).collect())
        } else {
            Ok(self.form.submit())
        }
    }

    async fn resolve(&self, record: HealthRecord) -> String {
        match self.orchestrator.submit(record).await {
            RequestState::Succeeded(response) => format!(
                "Prediction Complete - Analysis finished successfully\n\n{}",
                render_results(&response)
            ),
            RequestState::Failed(message) => render_error(&message),
            RequestState::Idle | RequestState::Loading => String::new(),
        }
    }

    pub async fn run<R, W>(&mut self, input: R, out: &mut W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();
        out.write_all(BANNER.as_bytes()).await?;
        out.write_all(HELP.as_bytes()).await?;

        loop {
            out.write_all(b"> ").await?;
            out.flush().await?;
            let line = match lines.next_line().await? {
                Some(line) => line,
                None => break,
            };

            let message = match Message::parse(&line) {
                Ok(Some(message)) => message,
                Ok(None) => continue,
                Err(e) => {
                    out.write_all(format!("{}\n", e).as_bytes()).await?;
                    continue;
                }
            };

            match message {
                Message::Quit => break,
                Message::FillForm => {
                    if !prompt_fields(&mut lines, out, &mut self.form).await? {
                        break;
                    }
                }
                // The loading line goes out before the request is awaited.
                Message::Submit => match self.record_to_submit() {
                    Ok(record) => {
                        out.write_all(render_loading().as_bytes()).await?;
                        out.flush().await?;
                        let reply = self.resolve(record).await;
                        out.write_all(reply.as_bytes()).await?;
                    }
                    Err(errors) => out.write_all(errors.as_bytes()).await?,
                },
                other => {
                    let reply = self.update(other).await;
                    out.write_all(reply.as_bytes()).await?;
                }
            }
        }
        out.flush().await
    }
}
