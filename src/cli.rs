//! Command-line interface and pipeline orchestration

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::info;

use crate::auth::{self, ConsentFlow};
use crate::classifier::RecruiterClassifier;
use crate::client::{GmailClient, ProductionGmailClient};
use crate::config::{Config, EmailConfig};
use crate::error::Result;
use crate::label_manager::LabelManager;
use crate::labeler::Labeler;
use crate::models::RunSummary;
use crate::scanner::MessageScanner;

#[derive(Parser, Debug)]
#[command(name = "recruiter-labeler")]
#[command(version)]
#[command(about = "Label unread recruiter emails in Gmail", long_about = None)]
pub struct Cli {
    /// Directory holding default.conf and user.conf
    #[arg(long, default_value = ".")]
    pub config_dir: PathBuf,

    /// Paste the authorization code instead of running a local web server
    #[arg(long)]
    pub noauth_local_webserver: bool,

    /// Port for the local web server receiving the OAuth redirect
    #[arg(long, conflicts_with = "noauth_local_webserver")]
    pub auth_host_port: Option<u16>,

    /// Log level when RUST_LOG is unset
    #[arg(long, value_enum, default_value_t = LogLevel::Warning)]
    pub logging_level: LogLevel,

    /// Verbose logging (debug for this crate)
    #[arg(short, long)]
    pub verbose: bool,

    /// Classify without changing any labels
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "UPPER")]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    /// EnvFilter directive for this level
    pub fn directive(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error | LogLevel::Critical => "error",
        }
    }
}

impl Cli {
    /// Consent flow selected by the auth flags
    pub fn consent_flow(&self) -> ConsentFlow {
        if self.noauth_local_webserver {
            ConsentFlow::Interactive
        } else if let Some(port) = self.auth_host_port {
            ConsentFlow::LocalServerPort(port)
        } else {
            ConsentFlow::LocalServer
        }
    }
}

/// Load config, authenticate, load models, then classify and label
pub async fn run_pipeline(cli: &Cli) -> Result<RunSummary> {
    let config = Config::load(&cli.config_dir).await?;

    info!("Authenticating with Gmail API...");
    let hub = auth::initialize_gmail_hub(
        &config.paths.client_secrets_path,
        &config.paths.user_credentials,
        cli.consent_flow(),
    )
    .await?;
    let client = ProductionGmailClient::new(hub);

    let classifier = RecruiterClassifier::load(
        &config.paths.classification_network_path,
        &config.paths.word_vector_model_path,
    )
    .await?;

    classify_and_label(&client, &classifier, &config.email, cli.dry_run).await
}

/// One pass: ensure labels, find unread messages, classify all, label all
///
/// Every message is classified before any label changes, so a failure while
/// classifying leaves the mailbox untouched.
pub async fn classify_and_label(
    client: &dyn GmailClient,
    classifier: &RecruiterClassifier,
    email: &EmailConfig,
    dry_run: bool,
) -> Result<RunSummary> {
    let labels = LabelManager::new(client)
        .initialise_labels(&email.classified_label_name, &email.recruiter_label_name)
        .await?;

    let message_ids = MessageScanner::new(client)
        .unread_message_ids(
            &email.classified_label_name,
            &email.email_classification_filter,
        )
        .await?;

    let mut classifications = Vec::with_capacity(message_ids.len());
    for message_id in &message_ids {
        classifications.push(classifier.classify_message(client, message_id).await?);
    }

    Labeler::new(client, labels, dry_run)
        .apply(&classifications)
        .await?;

    Ok(RunSummary {
        checked: classifications.len(),
        recruiter: classifications.iter().filter(|c| c.is_recruiter).count(),
        dry_run,
    })
}
