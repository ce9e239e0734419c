//! Resolution and creation of the labels the run applies
use crate::client::GmailClient;
use crate::error::{GmailError, Result};
use crate::models::{LabelIds, LabelInfo, LabelVisibility};
use tracing::{debug, info};

/// Ensures the "classified" and "recruiter" labels exist
pub struct LabelManager<'a> {
    client: &'a dyn GmailClient,
}

impl<'a> LabelManager<'a> {
    /// Creates a new LabelManager instance
    pub fn new(client: &'a dyn GmailClient) -> Self {
        Self { client }
    }

    /// Resolve both label IDs, creating whichever label is missing
    ///
    /// Existing labels are listed once and matched by exact name, so a second
    /// run finds what the first one created and creates nothing.
    pub async fn initialise_labels(
        &self,
        classified_label_name: &str,
        recruiter_label_name: &str,
    ) -> Result<LabelIds> {
        let existing = self.client.list_labels().await?;
        info!("Loaded {} existing labels", existing.len());

        let classified = self
            .resolve(&existing, classified_label_name, LabelVisibility::SHOWN)
            .await?;
        let recruiter = self
            .resolve(
                &existing,
                recruiter_label_name,
                LabelVisibility::HIDDEN_ON_MESSAGES,
            )
            .await?;

        Ok(LabelIds {
            classified,
            recruiter,
        })
    }

    async fn resolve(
        &self,
        existing: &[LabelInfo],
        name: &str,
        visibility: LabelVisibility,
    ) -> Result<String> {
        if let Some(id) = find_label_id(existing, name) {
            debug!("Label '{}' already exists with ID: {}", name, id);
            return Ok(id.to_string());
        }

        info!("Creating label: {}", name);
        let label_id = self
            .client
            .create_label(name, visibility)
            .await
            .map_err(|e| GmailError::LabelError(format!("Failed to create label '{}': {}", name, e)))?;

        info!("Successfully created label '{}' with ID: {}", name, label_id);
        Ok(label_id)
    }
}

/// ID of the label named exactly `name`, if present
pub fn find_label_id<'l>(labels: &'l [LabelInfo], name: &str) -> Option<&'l str> {
    labels
        .iter()
        .find(|label| label.name == name)
        .map(|label| label.id.as_str())
}
