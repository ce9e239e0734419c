//! Common test utilities and fixtures

#![allow(dead_code)]

use async_trait::async_trait;
use mockall::mock;
use ndarray::{Array1, Array2};
use recruiter_labeler::client::GmailClient;
use recruiter_labeler::config::EmailConfig;
use recruiter_labeler::error::{GmailError, Result};
use recruiter_labeler::models::{LabelChange, LabelInfo, LabelVisibility};
use recruiter_labeler::network::{Activation, Layer, Network};
use recruiter_labeler::word_vectors::WordVectorModel;
use recruiter_labeler::{RecruiterClassifier, INPUT_VECTOR_LENGTH};
use std::sync::Mutex;

pub const CLASSIFIED: &str = "classified";
pub const RECRUITER: &str = "recruiter";

/// Email settings used by the pipeline tests
pub fn email_config() -> EmailConfig {
    EmailConfig {
        classified_label_name: CLASSIFIED.to_string(),
        recruiter_label_name: RECRUITER.to_string(),
        email_classification_filter: String::new(),
    }
}

/// Build a raw RFC 822 message
pub fn raw_message(subject: &str, body: &str) -> Vec<u8> {
    format!(
        "From: sender@example.com\r\nTo: me@example.com\r\nSubject: {}\r\nContent-Type: text/plain; charset=utf-8\r\n\r\n{}\r\n",
        subject, body
    )
    .into_bytes()
}

/// Classifier where any message mentioning "hiring" scores [1, 0] and a
/// message without known words scores [0, 0]
pub fn create_test_classifier() -> RecruiterClassifier {
    let mut hiring = vec![0.0; INPUT_VECTOR_LENGTH];
    hiring[0] = 1.0;
    let model = WordVectorModel::from_entries(INPUT_VECTOR_LENGTH, vec![("hiring", hiring)])
        .expect("valid word vectors");

    let mut weights = Array2::<f32>::zeros((2, INPUT_VECTOR_LENGTH));
    weights[[0, 0]] = 1.0;
    let layer = Layer::new(weights, Array1::zeros(2), Activation::Linear).expect("valid layer");
    let network = Network::new(vec![layer]).expect("valid network");

    RecruiterClassifier::new(network, model).expect("matching shapes")
}

/// Create a test LabelInfo
pub fn create_test_label_info(id: &str, name: &str) -> LabelInfo {
    LabelInfo {
        id: id.to_string(),
        name: name.to_string(),
    }
}

// Mock implementation of GmailClient for testing
mock! {
    pub GmailClient {}

    #[async_trait::async_trait]
    impl GmailClient for GmailClient {
        async fn list_labels(&self) -> Result<Vec<LabelInfo>>;
        async fn create_label(&self, name: &str, visibility: LabelVisibility) -> Result<String>;
        async fn list_message_ids(&self, label_ids: &[String], query: &str) -> Result<Vec<String>>;
        async fn get_raw_message(&self, message_id: &str) -> Result<Vec<u8>>;
        async fn modify_labels(
            &self,
            message_id: &str,
            add_label_ids: &[String],
            remove_label_ids: &[String],
        ) -> Result<()>;
    }
}

/// A message held by the in-memory mailbox
#[derive(Debug, Clone)]
pub struct StoredMessage {
    pub id: String,
    pub raw: Vec<u8>,
    pub label_ids: Vec<String>,
}

#[derive(Debug, Default)]
struct MailboxState {
    labels: Vec<LabelInfo>,
    messages: Vec<StoredMessage>,
    created_labels: Vec<(String, LabelVisibility)>,
    modifications: Vec<LabelChange>,
    next_label: usize,
}

/// Stateful Gmail stand-in so several runs can observe each other's effects
///
/// `list_message_ids` honours required label IDs and `-label:<name>`
/// exclusions in the query; other query terms are ignored.
#[derive(Debug)]
pub struct InMemoryMailbox {
    state: Mutex<MailboxState>,
}

impl InMemoryMailbox {
    pub fn new() -> Self {
        let state = MailboxState {
            labels: vec![
                create_test_label_info("INBOX", "INBOX"),
                create_test_label_info("UNREAD", "UNREAD"),
            ],
            ..Default::default()
        };
        Self {
            state: Mutex::new(state),
        }
    }

    /// Add an unread inbox message
    pub fn add_unread(&self, id: &str, raw: Vec<u8>) {
        self.state.lock().unwrap().messages.push(StoredMessage {
            id: id.to_string(),
            raw,
            label_ids: vec!["INBOX".to_string(), "UNREAD".to_string()],
        });
    }

    pub fn message(&self, id: &str) -> StoredMessage {
        self.state
            .lock()
            .unwrap()
            .messages
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .expect("message exists")
    }

    pub fn label_id(&self, name: &str) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .labels
            .iter()
            .find(|l| l.name == name)
            .map(|l| l.id.clone())
    }

    pub fn labels_named(&self, name: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .labels
            .iter()
            .filter(|l| l.name == name)
            .count()
    }

    pub fn created_labels(&self) -> Vec<(String, LabelVisibility)> {
        self.state.lock().unwrap().created_labels.clone()
    }

    pub fn modifications(&self) -> Vec<LabelChange> {
        self.state.lock().unwrap().modifications.clone()
    }

    fn excluded_label_ids(state: &MailboxState, query: &str) -> Vec<String> {
        query
            .split_whitespace()
            .filter_map(|term| term.strip_prefix("-label:"))
            .filter_map(|name| {
                state
                    .labels
                    .iter()
                    .find(|l| l.name.replace(' ', "-") == name)
                    .map(|l| l.id.clone())
            })
            .collect()
    }
}

impl Default for InMemoryMailbox {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GmailClient for InMemoryMailbox {
    async fn list_labels(&self) -> Result<Vec<LabelInfo>> {
        Ok(self.state.lock().unwrap().labels.clone())
    }

    async fn create_label(&self, name: &str, visibility: LabelVisibility) -> Result<String> {
        let mut state = self.state.lock().unwrap();
        if state.labels.iter().any(|l| l.name == name) {
            return Err(GmailError::BadRequest(format!(
                "Label name exists or conflicts: {}",
                name
            )));
        }
        state.next_label += 1;
        let id = format!("Label_{}", state.next_label);
        state.labels.push(create_test_label_info(&id, name));
        state.created_labels.push((name.to_string(), visibility));
        Ok(id)
    }

    async fn list_message_ids(&self, label_ids: &[String], query: &str) -> Result<Vec<String>> {
        let state = self.state.lock().unwrap();
        let excluded = Self::excluded_label_ids(&state, query);

        Ok(state
            .messages
            .iter()
            .filter(|m| label_ids.iter().all(|l| m.label_ids.contains(l)))
            .filter(|m| !excluded.iter().any(|l| m.label_ids.contains(l)))
            .map(|m| m.id.clone())
            .collect())
    }

    async fn get_raw_message(&self, message_id: &str) -> Result<Vec<u8>> {
        self.state
            .lock()
            .unwrap()
            .messages
            .iter()
            .find(|m| m.id == message_id)
            .map(|m| m.raw.clone())
            .ok_or_else(|| GmailError::MessageNotFound(message_id.to_string()))
    }

    async fn modify_labels(
        &self,
        message_id: &str,
        add_label_ids: &[String],
        remove_label_ids: &[String],
    ) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let message = state
            .messages
            .iter_mut()
            .find(|m| m.id == message_id)
            .ok_or_else(|| GmailError::MessageNotFound(message_id.to_string()))?;

        message.label_ids.retain(|l| !remove_label_ids.contains(l));
        for label in add_label_ids {
            if !message.label_ids.contains(label) {
                message.label_ids.push(label.clone());
            }
        }

        state.modifications.push(LabelChange {
            message_id: message_id.to_string(),
            add_label_ids: add_label_ids.to_vec(),
            remove_label_ids: remove_label_ids.to_vec(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_message_has_subject() {
        let raw = raw_message("Hello", "body");
        assert!(String::from_utf8(raw).unwrap().contains("Subject: Hello"));
    }

    #[tokio::test]
    async fn test_mailbox_excludes_label_from_query() {
        let mailbox = InMemoryMailbox::new();
        mailbox.add_unread("m1", raw_message("a", "b"));
        let id = mailbox
            .create_label("done", LabelVisibility::SHOWN)
            .await
            .unwrap();
        mailbox
            .modify_labels("m1", &[id], &[])
            .await
            .unwrap();

        let ids = mailbox
            .list_message_ids(&["INBOX".to_string()], "-label:done")
            .await
            .unwrap();
        assert!(ids.is_empty());
    }
}
