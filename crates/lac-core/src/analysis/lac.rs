//! Lexical analysis on top of an exported LAC model

use std::path::Path;
use tracing::debug;

use crate::analysis::custom::Customization;
use crate::analysis::segment::{decode_segments, words, Segments};
use crate::analysis::tag::Tag;
use crate::error::{Error, Result};
use crate::resources::ResourceKind;
use crate::tokenizer::{EncodedBatch, LacTokenizer};
use crate::vocab::Vocab;

/// Tag dictionary entry used for ids the dictionary does not know
pub const UNKNOWN_TAG: &str = "O";

/// Runs the static model: one row of tag ids per input row.
///
/// Rows may be padded; only the first `lengths[i]` ids of row `i` are used.
pub trait Predictor {
    fn predict(&self, batch: &EncodedBatch) -> Result<Vec<Vec<i64>>>;
}

/// Segmenter and POS tagger
pub struct Lac<P: Predictor> {
    tokenizer: LacTokenizer,
    tag_vocab: Vocab,
    custom: Customization,
    predictor: P,
}

impl<P: Predictor> Lac<P> {
    pub fn new(tokenizer: LacTokenizer, tag_vocab: Vocab, predictor: P) -> Self {
        Self {
            tokenizer,
            tag_vocab,
            custom: Customization::new(),
            predictor,
        }
    }

    /// Load the dictionaries from a resource directory populated by `download`
    pub fn from_dir(resource_dir: &Path, predictor: P) -> Result<Self> {
        let tokenizer = LacTokenizer::from_dir(resource_dir)?;
        let tag_vocab = Vocab::from_file(
            &ResourceKind::Tag.local_path(resource_dir),
            Some(UNKNOWN_TAG),
        )?;
        Ok(Self::new(tokenizer, tag_vocab, predictor))
    }

    pub fn with_customization(mut self, custom: Customization) -> Self {
        self.custom = custom;
        self
    }

    /// Segment and tag every text
    pub fn analyze<S: AsRef<str>>(&self, texts: &[S]) -> Result<Vec<Segments>> {
        let batch = self.tokenizer.encode_batch(texts);
        let rows = self.predictor.predict(&batch)?;
        if rows.len() != texts.len() {
            return Err(Error::InferenceError(format!(
                "expected {} rows of tags, got {}",
                texts.len(),
                rows.len()
            )));
        }

        texts
            .iter()
            .zip(rows.iter().zip(&batch.lengths))
            .map(|(text, (row, &len))| self.post_process(text.as_ref(), row, len as usize))
            .collect()
    }

    /// Words of every text
    pub fn seg<S: AsRef<str>>(&self, texts: &[S]) -> Result<Vec<Vec<String>>> {
        Ok(self.analyze(texts)?.iter().map(|s| words(s)).collect())
    }

    fn post_process(&self, text: &str, row: &[i64], len: usize) -> Result<Segments> {
        let ids = row.get(..len).ok_or_else(|| {
            Error::InferenceError(format!(
                "row has {} tags but the text has {} tokens",
                row.len(),
                len
            ))
        })?;

        let mut tags: Vec<Tag> = self
            .tag_vocab
            .ids_to_tokens(ids)?
            .iter()
            .map(|s| Tag::parse(s))
            .collect();
        debug!(
            "tags: {:?}",
            tags.iter().map(|t| t.to_string()).collect::<Vec<_>>()
        );

        self.custom.apply(text, &mut tags);
        Ok(decode_segments(text, &tags))
    }
}
