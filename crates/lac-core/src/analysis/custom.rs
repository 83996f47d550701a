//! User dictionaries that override predicted tags

use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

use crate::analysis::segment::{Offset, Segment};
use crate::analysis::tag::Tag;
use crate::error::{Error, Result};

/// Prefix table for forward maximum matching.
///
/// Every word maps to its length in chars; every proper prefix maps to 0.
#[derive(Debug, Clone, Default)]
pub struct Trie {
    tree: HashMap<String, usize>,
}

impl Trie {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, word: &str) {
        if word.is_empty() {
            return;
        }

        let chars: Vec<char> = word.chars().collect();
        self.tree.insert(word.to_string(), chars.len());

        for i in 1..chars.len() {
            let frag: String = chars[..i].iter().collect();
            self.tree.entry(frag).or_insert(0);
        }
    }

    /// Offsets of dictionary words in `text`, scanning left to right.
    ///
    /// A match is kept only if it ends past the previous match.
    pub fn search(&self, text: &str) -> Vec<Offset> {
        let chars: Vec<char> = text.chars().collect();
        let mut offsets: Vec<Offset> = Vec::new();

        for start in 0..chars.len() {
            let mut frag = String::new();
            for end in start + 1..=chars.len() {
                frag.push(chars[end - 1]);
                let Some(&len) = self.tree.get(&frag) else {
                    break;
                };
                if len > 0 && offsets.last().map_or(true, |last| end > last.end) {
                    offsets.push(Offset::new(start, end));
                }
            }
        }

        offsets
    }
}

/// Words (optionally split into sub-words with their own POS) that the
/// analyzer must honor regardless of the model's prediction.
#[derive(Debug, Clone, Default)]
pub struct Customization {
    items: HashMap<String, Vec<Segment>>,
    tree: Trie,
}

impl Customization {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let mut custom = Self::new();
        custom.load_from_file(path)?;
        Ok(custom)
    }

    pub fn load_from_file(&mut self, path: &Path) -> Result<()> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::VocabError(format!("Failed to read user dictionary {:?}: {}", path, e))
        })?;
        self.load_from_lines(contents.lines());
        debug!("Loaded {} custom items from {:?}", self.len(), path);
        Ok(())
    }

    /// Each line is `word[/POS] [word[/POS] ...]`; the concatenation of the
    /// words is the dictionary item.
    pub fn load_from_lines<'a, I>(&mut self, lines: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        for line in lines {
            let mut word = String::new();
            let mut start = 0;
            let mut segments = Vec::new();

            for field in line.split_whitespace() {
                let (w, pos) = field.split_once('/').unwrap_or((field, ""));
                let len = w.chars().count();
                segments.push(Segment::new(w, pos, start, start + len));
                start += len;
                word.push_str(w);
            }

            if segments.is_empty() {
                continue;
            }
            self.tree.add(&word);
            self.items.insert(word, segments);
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Rewrite `tags` so every dictionary match in `text` becomes its own word(s)
    pub fn apply(&self, text: &str, tags: &mut [Tag]) {
        if self.is_empty() {
            return;
        }

        let chars: Vec<char> = text.chars().collect();
        for offset in self.tree.search(text) {
            let word: String = chars[offset.start..offset.end].iter().collect();
            let Some(segments) = self.items.get(&word) else {
                continue;
            };

            for segment in segments {
                let first = offset.start + segment.offset.start;
                let last = (offset.start + segment.offset.end).min(tags.len());
                for i in first..last {
                    tags[i].set_pos_if_nonempty(&segment.pos);
                    tags[i].bio = if i == first { "B" } else { "I" }.to_string();
                }
            }

            if let Some(next) = tags.get_mut(offset.end) {
                next.bio = "B".to_string();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = "春天的花开秋天的风以及冬天的落阳";

    #[test]
    fn test_trie_search() {
        let mut tree = Trie::new();
        for word in ["春天", "花开", "秋天的风", "落阳"] {
            tree.add(word);
        }
        assert_eq!(
            tree.search(TEXT),
            vec![
                Offset::new(0, 2),
                Offset::new(3, 5),
                Offset::new(5, 9),
                Offset::new(14, 16),
            ]
        );
    }

    #[test]
    fn test_trie_prefers_longer_overlapping_match() {
        let mut tree = Trie::new();
        tree.add("中国");
        tree.add("中国人");
        tree.add("国人");
        assert_eq!(
            tree.search("中国人民"),
            vec![Offset::new(0, 2), Offset::new(0, 3)]
        );
    }

    #[test]
    fn test_apply_user_dictionary() {
        let mut custom = Customization::new();
        custom.load_from_lines(["春天/SEASON", "花/n 开/v", "秋天的风", "落 阳", "   "]);
        assert_eq!(custom.len(), 4);

        let mut tags: Vec<Tag> = [
            "TIME-B", "TIME-I", "u-B", "n-B", "v-I", "TIME-B", "TIME-I", "u-B", "n-B", "c-B",
            "c-I", "TIME-B", "TIME-I", "u-B", "LOC-B", "PER-I",
        ]
        .iter()
        .map(|s| Tag::parse(s))
        .collect();

        custom.apply(TEXT, &mut tags);

        let got: Vec<String> = tags.iter().map(|t| t.to_string()).collect();
        assert_eq!(
            got,
            vec![
                "SEASON-B", "SEASON-I", "u-B", "n-B", "v-B", "TIME-B", "TIME-I", "u-I", "n-I",
                "c-B", "c-I", "TIME-B", "TIME-I", "u-B", "LOC-B", "PER-B",
            ]
        );
    }

    #[test]
    fn test_load_from_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("user.dic");
        std::fs::write(&path, "春天/SEASON\n\n花/n 开/v\n").unwrap();

        let custom = Customization::from_file(&path).unwrap();
        assert_eq!(custom.len(), 2);
        assert!(Customization::from_file(&tmp.path().join("missing.dic")).is_err());
    }
}
