//! Gmail API client
//!
//! Calls are issued one at a time and never retried; any failure is returned
//! to the caller and ends the run.

use async_trait::async_trait;
use google_gmail1::api::{Label, ModifyMessageRequest};
use tracing::debug;

use crate::auth::{GmailHub, MODIFY_SCOPE};
use crate::error::{GmailError, Result};
use crate::models::{LabelInfo, LabelVisibility};

/// Page size for messages.list
const LIST_PAGE_SIZE: u32 = 100;

/// Trait defining Gmail client operations for easier testing
#[async_trait]
pub trait GmailClient: Send + Sync {
    /// List all labels in the account
    async fn list_labels(&self) -> Result<Vec<LabelInfo>>;

    /// Create a new label, returning its ID
    async fn create_label(&self, name: &str, visibility: LabelVisibility) -> Result<String>;

    /// List IDs of messages carrying every label in `label_ids` and matching `query`
    ///
    /// IDs are returned in provider order across all result pages.
    async fn list_message_ids(&self, label_ids: &[String], query: &str) -> Result<Vec<String>>;

    /// Fetch the decoded RFC 822 bytes of a message
    async fn get_raw_message(&self, message_id: &str) -> Result<Vec<u8>>;

    /// Add and remove labels on one message in a single call
    async fn modify_labels(
        &self,
        message_id: &str,
        add_label_ids: &[String],
        remove_label_ids: &[String],
    ) -> Result<()>;
}

/// Production Gmail client backed by the google-gmail1 hub
pub struct ProductionGmailClient {
    hub: GmailHub,
}

impl ProductionGmailClient {
    /// Create a new production Gmail client
    pub fn new(hub: GmailHub) -> Self {
        Self { hub }
    }
}

/// `None` instead of an empty list, as Gmail expects for omitted fields
fn non_empty(ids: &[String]) -> Option<Vec<String>> {
    if ids.is_empty() {
        None
    } else {
        Some(ids.to_vec())
    }
}

#[async_trait]
impl GmailClient for ProductionGmailClient {
    async fn list_labels(&self) -> Result<Vec<LabelInfo>> {
        debug!("Calling Gmail API to list labels...");
        let (_, response) = self
            .hub
            .users()
            .labels_list("me")
            .add_scope(MODIFY_SCOPE)
            .doit()
            .await?;

        let labels: Vec<LabelInfo> = response
            .labels
            .unwrap_or_default()
            .into_iter()
            .filter_map(|label| match (label.id, label.name) {
                (Some(id), Some(name)) => Some(LabelInfo { id, name }),
                _ => None,
            })
            .collect();

        debug!("Successfully parsed {} labels", labels.len());
        Ok(labels)
    }

    async fn create_label(&self, name: &str, visibility: LabelVisibility) -> Result<String> {
        let label = Label {
            name: Some(name.to_string()),
            message_list_visibility: Some(visibility.message_list.to_string()),
            label_list_visibility: Some(visibility.label_list.to_string()),
            ..Default::default()
        };

        let (_, created_label) = self
            .hub
            .users()
            .labels_create(label, "me")
            .add_scope(MODIFY_SCOPE)
            .doit()
            .await?;

        created_label
            .id
            .ok_or_else(|| GmailError::LabelError(format!("Created label '{}' has no ID", name)))
    }

    async fn list_message_ids(&self, label_ids: &[String], query: &str) -> Result<Vec<String>> {
        let mut all_ids = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut call = self
                .hub
                .users()
                .messages_list("me")
                .q(query)
                .max_results(LIST_PAGE_SIZE);

            for label_id in label_ids {
                call = call.add_label_ids(label_id);
            }

            if let Some(token) = page_token.as_ref() {
                call = call.page_token(token);
            }

            let (_, response) = call.add_scope(MODIFY_SCOPE).doit().await?;

            if let Some(messages) = response.messages {
                all_ids.extend(messages.into_iter().filter_map(|msg_ref| msg_ref.id));
            }

            page_token = response.next_page_token;
            if page_token.is_none() {
                break;
            }
        }

        debug!("Listed {} message IDs for query {:?}", all_ids.len(), query);
        Ok(all_ids)
    }

    async fn get_raw_message(&self, message_id: &str) -> Result<Vec<u8>> {
        // google-gmail1 decodes the base64url `raw` field during deserialization
        let (_, message) = self
            .hub
            .users()
            .messages_get("me", message_id)
            .format("raw")
            .add_scope(MODIFY_SCOPE)
            .doit()
            .await?;

        message.raw.ok_or_else(|| {
            GmailError::InvalidMessageFormat(format!("Message {} has no raw content", message_id))
        })
    }

    async fn modify_labels(
        &self,
        message_id: &str,
        add_label_ids: &[String],
        remove_label_ids: &[String],
    ) -> Result<()> {
        let modify_request = ModifyMessageRequest {
            add_label_ids: non_empty(add_label_ids),
            remove_label_ids: non_empty(remove_label_ids),
        };

        self.hub
            .users()
            .messages_modify(modify_request, "me", message_id)
            .add_scope(MODIFY_SCOPE)
            .doit()
            .await?;

        Ok(())
    }
}
