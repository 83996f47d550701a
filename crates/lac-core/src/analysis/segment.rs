//! Word segments assembled from per-character tags

use serde::Serialize;

use crate::analysis::tag::Tag;

/// Character offsets `[start, end)` into the analyzed text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Offset {
    pub start: usize,
    pub end: usize,
}

impl Offset {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub word: String,
    pub pos: String,
    pub offset: Offset,
}

impl Segment {
    pub fn new(word: impl Into<String>, pos: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            word: word.into(),
            pos: pos.into(),
            offset: Offset::new(start, end),
        }
    }
}

/// Segments of one analyzed text
pub type Segments = Vec<Segment>;

pub fn words(segments: &[Segment]) -> Vec<String> {
    segments.iter().map(|s| s.word.clone()).collect()
}

pub fn pos_tags(segments: &[Segment]) -> Vec<String> {
    segments.iter().map(|s| s.pos.clone()).collect()
}

/// Group the characters of `text` into words.
///
/// A word starts at every `B` tag and at an `O` following a non-`O` tag; it
/// takes the POS of its last character. Characters beyond `tags` are dropped.
pub fn decode_segments(text: &str, tags: &[Tag]) -> Segments {
    let mut segments = Vec::new();
    let mut word = String::new();
    let mut start = 0;
    let mut prev: Option<&Tag> = None;

    for (i, (ch, tag)) in text.chars().zip(tags).enumerate() {
        let opens = tag.is_begin() || (tag.is_outside() && prev.map_or(false, |p| !p.is_outside()));
        if opens && !word.is_empty() {
            let pos = prev.map(|p| p.pos.clone()).unwrap_or_default();
            segments.push(Segment::new(std::mem::take(&mut word), pos, start, i));
            start = i;
        }

        word.push(ch);
        prev = Some(tag);
    }

    if let Some(last) = prev {
        if !word.is_empty() {
            let end = start + word.chars().count();
            segments.push(Segment::new(word, last.pos.clone(), start, end));
        }
    }

    segments
}
