//! Text encoding for the exported LAC model

use std::path::Path;
use tracing::debug;

use crate::error::{Error, Result};
use crate::resources::ResourceKind;
use crate::vocab::{Q2bMap, Vocab};

/// Word dictionary entry used for characters outside the vocabulary
pub const OOV_TOKEN: &str = "OOV";

/// Id written into the padded tail of shorter rows
pub const PAD_ID: i64 = 0;

/// A batch shaped like the `token_ids` / `length` inputs of the static model
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodedBatch {
    /// `[batch, max_len]`, right-padded with [`PAD_ID`]
    pub token_ids: Vec<Vec<i64>>,
    /// Number of real tokens per row
    pub lengths: Vec<i64>,
}

impl EncodedBatch {
    pub fn batch_size(&self) -> usize {
        self.token_ids.len()
    }

    pub fn max_len(&self) -> usize {
        self.token_ids.first().map(|row| row.len()).unwrap_or(0)
    }
}

/// Character-level tokenizer: one token per char, normalized through q2b
pub struct LacTokenizer {
    word_vocab: Vocab,
    q2b: Q2bMap,
    oov_id: i64,
}

impl LacTokenizer {
    /// Load `word.dic` and `q2b.dic` from a resource directory
    pub fn from_dir(resource_dir: &Path) -> Result<Self> {
        let word_vocab = Vocab::from_file(
            &ResourceKind::Word.local_path(resource_dir),
            Some(OOV_TOKEN),
        )?;
        let q2b = Q2bMap::from_file(&ResourceKind::Q2b.local_path(resource_dir))?;
        Self::new(word_vocab, q2b)
    }

    pub fn new(word_vocab: Vocab, q2b: Q2bMap) -> Result<Self> {
        let oov_id = word_vocab.token_to_id(OOV_TOKEN).ok_or_else(|| {
            Error::VocabError(format!("word vocabulary lacks {:?}", OOV_TOKEN))
        })?;
        debug!(
            "Tokenizer ready: {} words, {} q2b entries",
            word_vocab.len(),
            q2b.len()
        );
        Ok(Self {
            word_vocab,
            q2b,
            oov_id,
        })
    }

    pub fn encode(&self, text: &str) -> Vec<i64> {
        let mut buf = [0u8; 4];
        text.chars()
            .map(|c| {
                let token = self.q2b.convert(c.encode_utf8(&mut buf));
                self.word_vocab.token_to_id(token).unwrap_or(self.oov_id)
            })
            .collect()
    }

    pub fn encode_batch<S: AsRef<str>>(&self, texts: &[S]) -> EncodedBatch {
        let mut token_ids: Vec<Vec<i64>> = texts.iter().map(|t| self.encode(t.as_ref())).collect();
        let lengths: Vec<i64> = token_ids.iter().map(|row| row.len() as i64).collect();

        let max_len = token_ids.iter().map(|row| row.len()).max().unwrap_or(0);
        for row in &mut token_ids {
            row.resize(max_len, PAD_ID);
        }

        EncodedBatch { token_ids, lengths }
    }

    pub fn vocab_size(&self) -> usize {
        self.word_vocab.len()
    }
}
