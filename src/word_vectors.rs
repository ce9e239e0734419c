//! Pre-trained word vectors in the word2vec binary format
//!
//! The file starts with an ASCII header `"<vocab_size> <dimension>\n"`,
//! followed by one record per word: the word's UTF-8 bytes, a single space,
//! then `dimension` little-endian `f32` values. Writers may put a newline
//! after each record, so whitespace before a word is skipped.

use ndarray::{Array1, Array2, ArrayView1};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{GmailError, Result};

/// Embedding table mapping words to fixed-length vectors
#[derive(Debug, Clone)]
pub struct WordVectorModel {
    index: HashMap<String, usize>,
    vectors: Array2<f32>,
}

impl WordVectorModel {
    /// Load a word2vec binary file
    pub async fn load(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            GmailError::ModelError(format!("Failed to read word vector model {:?}: {}", path, e))
        })?;
        let model = Self::from_bytes(&bytes)?;
        info!(
            "Loaded {} word vectors of dimension {} from {:?}",
            model.len(),
            model.dimension(),
            path
        );
        Ok(model)
    }

    /// Parse an in-memory word2vec binary image
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let header_end = bytes
            .iter()
            .position(|&b| b == b'\n')
            .ok_or_else(|| GmailError::ModelError("Missing word2vec header".to_string()))?;
        let header = std::str::from_utf8(&bytes[..header_end])
            .map_err(|e| GmailError::ModelError(format!("Invalid word2vec header: {}", e)))?;
        let (vocab_size, dimension) = parse_header(header)?;

        // Each record holds at least a separator and its vector
        let record_len = dimension
            .checked_mul(4)
            .ok_or_else(|| oversized_header(header))?;
        let body_len = bytes.len() - (header_end + 1);
        let min_body_len = record_len
            .checked_add(1)
            .and_then(|min_record| min_record.checked_mul(vocab_size))
            .ok_or_else(|| oversized_header(header))?;
        if min_body_len > body_len {
            return Err(oversized_header(header));
        }

        let mut index = HashMap::with_capacity(vocab_size);
        let mut vectors = Array2::<f32>::zeros((vocab_size, dimension));
        let mut pos = header_end + 1;

        for row in 0..vocab_size {
            while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
                pos += 1;
            }
            let word_len = bytes[pos..]
                .iter()
                .position(|&b| b == b' ')
                .ok_or_else(|| truncated(row))?;
            let word = String::from_utf8_lossy(&bytes[pos..pos + word_len]).into_owned();
            pos += word_len + 1;

            let record = bytes.get(pos..pos + record_len).ok_or_else(|| truncated(row))?;
            for (col, chunk) in record.chunks_exact(4).enumerate() {
                vectors[[row, col]] = f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
            }
            pos += record_len;

            // First occurrence wins on duplicate words
            index.entry(word).or_insert(row);
        }

        debug!("Parsed {} word2vec records", vocab_size);
        Ok(Self { index, vectors })
    }

    /// Build a model from `(word, vector)` pairs of equal length
    pub fn from_entries<I, S>(dimension: usize, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<f32>)>,
        S: Into<String>,
    {
        let mut index = HashMap::new();
        let mut flat = Vec::new();

        for (word, vector) in entries {
            if vector.len() != dimension {
                return Err(GmailError::ModelError(format!(
                    "Vector length {} does not match dimension {}",
                    vector.len(),
                    dimension
                )));
            }
            let row = index.len();
            if index.insert(word.into(), row).is_some() {
                return Err(GmailError::ModelError("Duplicate word in entries".to_string()));
            }
            flat.extend(vector);
        }

        let vectors = Array2::from_shape_vec((index.len(), dimension), flat)
            .map_err(|e| GmailError::ModelError(e.to_string()))?;
        Ok(Self { index, vectors })
    }

    /// Length of every word vector
    pub fn dimension(&self) -> usize {
        self.vectors.ncols()
    }

    /// Number of words in the vocabulary
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn get(&self, word: &str) -> Option<ArrayView1<'_, f32>> {
        self.index.get(word).map(|&row| self.vectors.row(row))
    }

    /// Mean vector of the in-vocabulary words
    ///
    /// Unknown words are ignored; with no known word the result is all zeros.
    pub fn vectorise<S: AsRef<str>>(&self, words: &[S]) -> Array1<f32> {
        let mut sum = Array1::<f32>::zeros(self.dimension());
        let mut known = 0usize;

        for word in words {
            if let Some(vector) = self.get(word.as_ref()) {
                sum += &vector;
                known += 1;
            }
        }

        debug!("{} of {} words found in vocabulary", known, words.len());
        if known > 0 {
            sum /= known as f32;
        }
        sum
    }
}

fn parse_header(header: &str) -> Result<(usize, usize)> {
    let mut parts = header.split_whitespace().map(str::parse::<usize>);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(Ok(vocab_size)), Some(Ok(dimension)), None) if dimension > 0 => {
            Ok((vocab_size, dimension))
        }
        _ => Err(GmailError::ModelError(format!(
            "Invalid word2vec header: {:?}",
            header
        ))),
    }
}

fn oversized_header(header: &str) -> GmailError {
    GmailError::ModelError(format!(
        "word2vec header {:?} describes more data than the file holds",
        header
    ))
}

fn truncated(row: usize) -> GmailError {
    GmailError::ModelError(format!("word2vec file truncated at record {}", row))
}
