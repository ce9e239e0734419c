//! Recruiter Labeler
//!
//! Checks unread Gmail inbox messages, classifies each one as recruiter
//! outreach with a pre-trained word-vector model and feed-forward network,
//! and labels them.
//!
//! # Overview
//!
//! One linear batch job per invocation:
//! - **Configuration**: `default.conf` overridden by `user.conf` (INI)
//! - **Authentication**: OAuth2 with token caching
//! - **Labels**: the "classified" and "recruiter" labels are created if absent
//! - **Discovery**: unread inbox messages without the classified label
//! - **Classification**: word vectors averaged into a 200-value input, scored
//!   by the network, recruiter when `score[0] - score[1] > 0.47`
//! - **Labeling**: classified on every message; recruiter messages also get
//!   the recruiter label and leave the inbox
//!
//! # Example Usage
//!
//! ```no_run
//! use recruiter_labeler::{auth, classifier::RecruiterClassifier, cli, client::ProductionGmailClient, config::Config};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load(Path::new(".")).await?;
//!
//!     let hub = auth::initialize_gmail_hub(
//!         &config.paths.client_secrets_path,
//!         &config.paths.user_credentials,
//!         auth::ConsentFlow::default(),
//!     )
//!     .await?;
//!     let client = ProductionGmailClient::new(hub);
//!
//!     let classifier = RecruiterClassifier::load(
//!         &config.paths.classification_network_path,
//!         &config.paths.word_vector_model_path,
//!     )
//!     .await?;
//!
//!     let summary = cli::classify_and_label(&client, &classifier, &config.email, false).await?;
//!     println!("{}", summary);
//!     Ok(())
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`auth`] - OAuth2 authentication and Gmail API initialization
//! - [`client`] - Gmail API client trait and production implementation
//! - [`classifier`] - Message text extraction and the recruiter decision
//! - [`cli`] - Command-line interface and pipeline orchestration
//! - [`config`] - INI configuration loading and validation
//! - [`error`] - Error types and result aliases
//! - [`label_manager`] - Creation and lookup of the run's labels
//! - [`labeler`] - Per-message label changes
//! - [`models`] - Core data structures
//! - [`network`] - Feed-forward network loading and inference
//! - [`scanner`] - Unread message discovery
//! - [`word_vectors`] - word2vec binary model loading and vectorisation

pub mod auth;
pub mod classifier;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod label_manager;
pub mod labeler;
pub mod models;
pub mod network;
pub mod scanner;
pub mod word_vectors;

// Re-export commonly used types for convenience
pub use error::{GmailError, Result};

pub use models::{Classification, LabelChange, LabelIds, LabelInfo, LabelVisibility, RunSummary};

pub use classifier::{RecruiterClassifier, INPUT_VECTOR_LENGTH, RECRUITER_THRESHOLD};

pub use config::{Config, EmailConfig, PathsConfig};

pub use client::{GmailClient, ProductionGmailClient};

pub use label_manager::LabelManager;
pub use labeler::Labeler;
pub use scanner::MessageScanner;

pub use cli::{Cli, LogLevel};
