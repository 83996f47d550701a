//! The fixed set of files a LAC resource directory holds

use std::fmt;
use std::path::{Path, PathBuf};

/// Logical resources published for the LAC model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Dygraph model weights
    ModelState,
    /// Tag dictionary (`id -> POS-BIO`)
    Tag,
    /// Full-width to half-width character map
    Q2b,
    /// Word dictionary (`id -> character`)
    Word,
}

impl ResourceKind {
    /// All resources in download order
    pub fn all() -> &'static [ResourceKind] {
        &[
            ResourceKind::ModelState,
            ResourceKind::Tag,
            ResourceKind::Q2b,
            ResourceKind::Word,
        ]
    }

    /// Logical name, also used as the checksum key in configuration
    pub fn name(&self) -> &'static str {
        match self {
            ResourceKind::ModelState => "model_state",
            ResourceKind::Tag => "tag",
            ResourceKind::Q2b => "q2b",
            ResourceKind::Word => "word",
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            ResourceKind::ModelState => "model_state.pdparams",
            ResourceKind::Tag => "tag.dic",
            ResourceKind::Q2b => "q2b.dic",
            ResourceKind::Word => "word.dic",
        }
    }

    pub fn local_path(&self, dir: &Path) -> PathBuf {
        dir.join(self.file_name())
    }

    pub fn remote_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.file_name())
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resources that are not yet present in `dir`
pub fn missing_resources(dir: &Path) -> Vec<ResourceKind> {
    ResourceKind::all()
        .iter()
        .copied()
        .filter(|kind| !kind.local_path(dir).exists())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_names() {
        let names: Vec<_> = ResourceKind::all().iter().map(|k| k.file_name()).collect();
        assert_eq!(
            names,
            vec!["model_state.pdparams", "tag.dic", "q2b.dic", "word.dic"]
        );
    }

    #[test]
    fn test_remote_url_joins_without_double_slash() {
        assert_eq!(
            ResourceKind::Tag.remote_url("http://host/lac/"),
            "http://host/lac/tag.dic"
        );
        assert_eq!(
            ResourceKind::Word.remote_url("http://host/lac"),
            "http://host/lac/word.dic"
        );
    }

    #[test]
    fn test_missing_resources() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(missing_resources(dir.path()).len(), 4);

        std::fs::write(dir.path().join("tag.dic"), "0\tO\n").unwrap();
        let missing = missing_resources(dir.path());
        assert_eq!(
            missing,
            vec![ResourceKind::ModelState, ResourceKind::Q2b, ResourceKind::Word]
        );
    }
}
