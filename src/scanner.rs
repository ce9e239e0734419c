//! Discovery of unread inbox messages that still need classifying

use crate::client::GmailClient;
use crate::error::Result;
use crate::models::{INBOX_LABEL, UNREAD_LABEL};
use tracing::info;

/// Build the search query that skips already-classified messages
///
/// Gmail's `label:` operator spells spaces in label names as hyphens. The
/// user's filter is appended verbatim.
pub fn build_unread_query(classified_label_name: &str, classification_filter: &str) -> String {
    let label_term = classified_label_name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-");

    format!("-label:{} {}", label_term, classification_filter.trim())
        .trim_end()
        .to_string()
}

/// Label IDs every candidate message must carry
pub fn unread_inbox_label_ids() -> Vec<String> {
    vec![UNREAD_LABEL.to_string(), INBOX_LABEL.to_string()]
}

/// Lists unread inbox messages not yet carrying the classified label
pub struct MessageScanner<'a> {
    client: &'a dyn GmailClient,
}

impl<'a> MessageScanner<'a> {
    pub fn new(client: &'a dyn GmailClient) -> Self {
        Self { client }
    }

    /// IDs of unread inbox messages matching the filter, in provider order
    pub async fn unread_message_ids(
        &self,
        classified_label_name: &str,
        classification_filter: &str,
    ) -> Result<Vec<String>> {
        let query = build_unread_query(classified_label_name, classification_filter);
        info!("Searching unread inbox messages with query: {}", query);

        let ids = self
            .client
            .list_message_ids(&unread_inbox_label_ids(), &query)
            .await?;

        info!("Found {} unread messages to classify", ids.len());
        Ok(ids)
    }
}
