use ini::{Ini, ParseOption};
use std::path::{Path, PathBuf};

use crate::error::{GmailError, Result};

/// Shipped defaults, read first
pub const DEFAULT_CONFIG_FILE: &str = "default.conf";

/// Per-user overrides, read second
pub const USER_CONFIG_FILE: &str = "user.conf";

const PATHS_SECTION: &str = "Paths";
const EMAIL_SECTION: &str = "Email";

/// Gmail system labels that a user label must never shadow
const SYSTEM_LABELS: &[&str] = &[
    "INBOX", "UNREAD", "SPAM", "TRASH", "SENT", "DRAFT", "STARRED", "IMPORTANT", "CHAT",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub paths: PathsConfig,
    pub email: EmailConfig,
}

/// `[Paths]` section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathsConfig {
    pub client_secrets_path: PathBuf,
    pub user_credentials: PathBuf,
    pub classification_network_path: PathBuf,
    pub word_vector_model_path: PathBuf,
}

/// `[Email]` section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailConfig {
    pub classified_label_name: String,
    pub recruiter_label_name: String,
    pub email_classification_filter: String,
}

impl Config {
    /// Load `default.conf` then `user.conf` from `dir`, later values winning
    ///
    /// Either file may be absent; a key missing from both is an error.
    pub async fn load(dir: &Path) -> Result<Self> {
        let mut merged = Ini::new();

        for name in [DEFAULT_CONFIG_FILE, USER_CONFIG_FILE] {
            let path = dir.join(name);
            if !tokio::fs::try_exists(&path).await? {
                tracing::warn!("Config file not found at {:?}, skipping", path);
                continue;
            }

            let content = tokio::fs::read_to_string(&path).await.map_err(|e| {
                GmailError::ConfigError(format!("Failed to read config file {:?}: {}", path, e))
            })?;
            let layer = Ini::load_from_str_opt(&content, parse_option()).map_err(|e| {
                GmailError::ConfigError(format!("Failed to parse config file {:?}: {}", path, e))
            })?;

            merge_into(&mut merged, &layer);
            tracing::info!("Loaded configuration from {:?}", path);
        }

        let config = Self::from_ini(&merged)?;
        config.validate()?;
        Ok(config)
    }

    /// Build a config from an already-merged INI document
    pub fn from_ini(ini: &Ini) -> Result<Self> {
        Ok(Self {
            paths: PathsConfig {
                client_secrets_path: required(ini, PATHS_SECTION, "client_secrets_path")?.into(),
                user_credentials: required(ini, PATHS_SECTION, "user_credentials")?.into(),
                classification_network_path: required(
                    ini,
                    PATHS_SECTION,
                    "classification_network_path",
                )?
                .into(),
                word_vector_model_path: required(ini, PATHS_SECTION, "word_vector_model_path")?
                    .into(),
            },
            email: EmailConfig {
                classified_label_name: required(ini, EMAIL_SECTION, "classified_label_name")?,
                recruiter_label_name: required(ini, EMAIL_SECTION, "recruiter_label_name")?,
                email_classification_filter: required(
                    ini,
                    EMAIL_SECTION,
                    "email_classification_filter",
                )?,
            },
        })
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let paths = [
            ("Paths.client_secrets_path", &self.paths.client_secrets_path),
            ("Paths.user_credentials", &self.paths.user_credentials),
            (
                "Paths.classification_network_path",
                &self.paths.classification_network_path,
            ),
            ("Paths.word_vector_model_path", &self.paths.word_vector_model_path),
        ];
        for (key, path) in paths {
            if path.as_os_str().is_empty() {
                return Err(GmailError::ConfigError(format!("{} cannot be empty", key)));
            }
        }

        let labels = [
            ("Email.classified_label_name", &self.email.classified_label_name),
            ("Email.recruiter_label_name", &self.email.recruiter_label_name),
        ];
        for (key, name) in labels {
            if name.trim().is_empty() {
                return Err(GmailError::ConfigError(format!("{} cannot be empty", key)));
            }
            if SYSTEM_LABELS
                .iter()
                .any(|system| system.eq_ignore_ascii_case(name.trim()))
            {
                return Err(GmailError::ConfigError(format!(
                    "{} cannot be the system label '{}'",
                    key, name
                )));
            }
        }

        if self.email.classified_label_name == self.email.recruiter_label_name {
            return Err(GmailError::ConfigError(
                "Email.classified_label_name and Email.recruiter_label_name must differ"
                    .to_string(),
            ));
        }

        tracing::debug!("Configuration validation passed");
        Ok(())
    }
}

/// Backslashes are kept literally so Windows paths survive
fn parse_option() -> ParseOption {
    ParseOption {
        enabled_escape: false,
        ..ParseOption::default()
    }
}

/// Copy every key of `layer` into `base`, overwriting existing values
///
/// Keys are lowercased so `Client_Secrets_Path` and `client_secrets_path`
/// name the same setting. Section names stay case-sensitive.
fn merge_into(base: &mut Ini, layer: &Ini) {
    for (section, properties) in layer.iter() {
        for (key, value) in properties.iter() {
            base.with_section(section).set(key.to_lowercase(), value);
        }
    }
}

fn required(ini: &Ini, section: &str, key: &str) -> Result<String> {
    ini.get_from(Some(section), key)
        .map(|value| value.trim().to_string())
        .ok_or_else(|| {
            GmailError::ConfigError(format!("Missing key '{}' in section [{}]", key, section))
        })
}
