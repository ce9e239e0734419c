//! Recruiter classification: message text → word vectors → network scores

use mail_parser::MessageParser;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use tracing::debug;

use crate::client::GmailClient;
use crate::error::{GmailError, Result};
use crate::models::Classification;
use crate::network::Network;
use crate::word_vectors::WordVectorModel;

/// Length of the vector fed to the network
pub const INPUT_VECTOR_LENGTH: usize = 200;

/// Minimum margin of score[0] over score[1] for a recruiter message
pub const RECRUITER_THRESHOLD: f32 = 0.47;

/// Letters and digits, with apostrophes allowed inside a word
static WORD_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\p{L}\p{N}]+(?:'[\p{L}\p{N}]+)*").unwrap());

/// Decision rule applied to the network's two scores
pub fn is_recruiter_score(scores: &[f32; 2]) -> bool {
    scores[0] - scores[1] > RECRUITER_THRESHOLD
}

/// Lowercased words of `text`
pub fn tokenize(text: &str) -> Vec<String> {
    WORD_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

/// Words of the subject and every text body of a raw RFC 822 message
///
/// HTML-only messages contribute their HTML bodies converted to plain text.
pub fn words_from_message(raw: &[u8]) -> Result<Vec<String>> {
    let message = MessageParser::default().parse(raw).ok_or_else(|| {
        GmailError::InvalidMessageFormat("Message could not be parsed as MIME".to_string())
    })?;

    let mut words = message.subject().map(tokenize).unwrap_or_default();
    // Inline media shares the text body list; those entries have no text
    for body in (0..message.text_body.len()).filter_map(|part| message.body_text(part)) {
        words.extend(tokenize(&body));
    }
    Ok(words)
}

/// Word-vector model and network bundled with the decision rule
pub struct RecruiterClassifier {
    network: Network,
    model: WordVectorModel,
}

impl RecruiterClassifier {
    /// Pair a network with a word-vector model after checking their shapes
    pub fn new(network: Network, model: WordVectorModel) -> Result<Self> {
        if model.dimension() != INPUT_VECTOR_LENGTH {
            return Err(GmailError::ModelError(format!(
                "Word vectors have dimension {}, expected {}",
                model.dimension(),
                INPUT_VECTOR_LENGTH
            )));
        }
        if network.input_size() != INPUT_VECTOR_LENGTH {
            return Err(GmailError::ModelError(format!(
                "Network takes {} inputs, expected {}",
                network.input_size(),
                INPUT_VECTOR_LENGTH
            )));
        }
        if network.output_size() != 2 {
            return Err(GmailError::ModelError(format!(
                "Network produces {} scores, expected 2",
                network.output_size()
            )));
        }
        Ok(Self { network, model })
    }

    /// Load both models from disk
    pub async fn load(network_path: &Path, word_vector_model_path: &Path) -> Result<Self> {
        let network = Network::load(network_path).await?;
        let model = WordVectorModel::load(word_vector_model_path).await?;
        Self::new(network, model)
    }

    /// Network scores for a list of words
    pub fn score_words<S: AsRef<str>>(&self, words: &[S]) -> Result<[f32; 2]> {
        let input = self.model.vectorise(words);
        let output = self.network.feed_forward(input.view())?;
        Ok([output[0], output[1]])
    }

    /// Classify already-fetched raw message bytes
    pub fn classify_raw(&self, message_id: &str, raw: &[u8]) -> Result<Classification> {
        let words = words_from_message(raw)?;
        let scores = self.score_words(&words)?;
        let is_recruiter = is_recruiter_score(&scores);

        debug!(
            "Message {}: {} words, scores [{:.3}, {:.3}], recruiter={}",
            message_id,
            words.len(),
            scores[0],
            scores[1],
            is_recruiter
        );

        Ok(Classification {
            message_id: message_id.to_string(),
            scores,
            is_recruiter,
        })
    }

    /// Fetch a message and classify it
    pub async fn classify_message(
        &self,
        client: &dyn GmailClient,
        message_id: &str,
    ) -> Result<Classification> {
        let raw = client.get_raw_message(message_id).await?;
        self.classify_raw(message_id, &raw)
    }
}
