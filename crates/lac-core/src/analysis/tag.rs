//! Part-of-speech tags in BIO notation

use std::fmt;

/// A predicted tag such as `n-B` or `TIME-I`.
///
/// See <https://github.com/baidu/lac> for the POS and entity labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Part-of-speech or entity label
    pub pos: String,
    /// Inside-outside-beginning marker, empty when the tag carries none
    pub bio: String,
}

impl Tag {
    pub fn new(pos: impl Into<String>, bio: impl Into<String>) -> Self {
        Self {
            pos: pos.into(),
            bio: bio.into(),
        }
    }

    /// Split `POS-BIO` at the first `-`
    pub fn parse(s: &str) -> Self {
        match s.split_once('-') {
            Some((pos, bio)) => Self::new(pos, bio),
            None => Self::new(s, ""),
        }
    }

    pub fn is_begin(&self) -> bool {
        self.bio == "B"
    }

    pub fn is_outside(&self) -> bool {
        self.bio == "O"
    }

    pub fn set_pos_if_nonempty(&mut self, pos: &str) {
        if !pos.is_empty() {
            self.pos = pos.to_string();
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.bio.is_empty() {
            f.write_str(&self.pos)
        } else {
            write!(f, "{}-{}", self.pos, self.bio)
        }
    }
}
