//! Dictionary files shipped with the LAC model
//!
//! `word.dic` and `tag.dic` map integer ids to tokens, one tab-separated pair
//! per line. Both `<id>\t<token>` and `<token>\t<id>` orderings occur in the
//! wild; the ordering is taken from the first two-column line. A line with a
//! single column uses its line index as the id. `q2b.dic` maps full-width or
//! traditional characters to their half-width or simplified forms.

use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

use crate::error::{Error, Result};

/// Bidirectional token/id table
#[derive(Debug, Clone, Default)]
pub struct Vocab {
    token_to_id: HashMap<String, i64>,
    id_to_token: HashMap<i64, String>,
    unk_token: Option<String>,
}

impl Vocab {
    pub fn from_file(path: &Path, unk_token: Option<&str>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::VocabError(format!("Failed to read {:?}: {}", path, e)))?;
        let vocab = Self::parse(&contents, unk_token)?;
        debug!("Loaded {} entries from {:?}", vocab.len(), path);
        Ok(vocab)
    }

    pub fn parse(contents: &str, unk_token: Option<&str>) -> Result<Self> {
        let mut vocab = Self {
            unk_token: unk_token.map(|s| s.to_string()),
            ..Self::default()
        };
        let mut id_first = None;

        for (index, line) in contents.lines().enumerate() {
            if line.is_empty() {
                continue;
            }

            let fields: Vec<&str> = line.split('\t').collect();
            let (token, id) = match fields.as_slice() {
                [token] => (*token, index as i64),
                [a, b] => {
                    let id_first =
                        *id_first.get_or_insert_with(|| a.chars().all(|c| c.is_ascii_digit()));
                    let (token, id) = if id_first { (*b, *a) } else { (*a, *b) };
                    let id = id.parse::<i64>().map_err(|_| {
                        Error::VocabError(format!(
                            "invalid id {:?} at line {}",
                            id,
                            index + 1
                        ))
                    })?;
                    (token, id)
                }
                _ => {
                    return Err(Error::VocabError(format!(
                        "invalid content: {:?} at line {}",
                        line,
                        index + 1
                    )))
                }
            };

            vocab.token_to_id.insert(token.to_string(), id);
            vocab.id_to_token.insert(id, token.to_string());
        }

        if let Some(unk) = &vocab.unk_token {
            if !vocab.token_to_id.contains_key(unk) {
                return Err(Error::VocabError(format!(
                    "unknown token {:?} is not in the vocabulary",
                    unk
                )));
            }
        }

        Ok(vocab)
    }

    pub fn len(&self) -> usize {
        self.token_to_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.token_to_id.is_empty()
    }

    pub fn token_to_id(&self, token: &str) -> Option<i64> {
        self.token_to_id.get(token).copied()
    }

    pub fn id_to_token(&self, id: i64) -> Option<&str> {
        self.id_to_token.get(&id).map(|s| s.as_str())
    }

    /// Id of the unknown token, if the vocabulary has one
    pub fn unk_id(&self) -> Option<i64> {
        self.unk_token
            .as_deref()
            .and_then(|unk| self.token_to_id(unk))
    }

    /// Id of `token`, falling back to the unknown token
    pub fn id_or_unk(&self, token: &str) -> Result<i64> {
        self.token_to_id(token)
            .or_else(|| self.unk_id())
            .ok_or_else(|| Error::VocabError(format!("token {:?} not in vocabulary", token)))
    }

    /// Tokens for `ids`, with unknown ids mapped to the unknown token
    pub fn ids_to_tokens(&self, ids: &[i64]) -> Result<Vec<String>> {
        ids.iter()
            .map(|id| {
                self.id_to_token(*id)
                    .or(self.unk_token.as_deref())
                    .map(|s| s.to_string())
                    .ok_or_else(|| Error::VocabError(format!("id {} not in vocabulary", id)))
            })
            .collect()
    }
}

/// Full-width to half-width character map
#[derive(Debug, Clone, Default)]
pub struct Q2bMap {
    map: HashMap<String, String>,
}

impl Q2bMap {
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::VocabError(format!("Failed to read {:?}: {}", path, e)))?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let mut map = HashMap::new();
        for (index, line) in contents.lines().enumerate() {
            if line.is_empty() {
                continue;
            }
            match line.split('\t').collect::<Vec<_>>().as_slice() {
                [from, to] => {
                    map.insert(from.to_string(), to.to_string());
                }
                _ => {
                    return Err(Error::VocabError(format!(
                        "invalid content: {:?} at line {}",
                        line,
                        index + 1
                    )))
                }
            }
        }
        Ok(Self { map })
    }

    /// Normalized form of `token`, or `token` itself when unmapped
    pub fn convert<'a>(&'a self, token: &'a str) -> &'a str {
        self.map.get(token).map(|s| s.as_str()).unwrap_or(token)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
