//! Configuration types for the LAC resource tool

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::error::Result;

/// Remote object store holding the pretrained LAC resources
pub const DEFAULT_BASE_URL: &str = "https://bj.bcebos.com/paddlenlp/taskflow/lexical_analysis/lac";

/// Main tool configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LacConfig {
    /// Directory holding the downloaded resources and the `static/` export
    #[serde(default = "default_resource_dir")]
    pub resource_dir: PathBuf,

    /// Base URL the manifest file names are appended to
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Python interpreter with paddle and paddlenlp installed
    #[serde(default = "default_python")]
    pub python: String,

    /// Per-request timeout in seconds; unset means wait indefinitely
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Draw a progress bar while downloading
    #[serde(default = "default_show_progress")]
    pub show_progress: bool,

    /// Expected SHA-256 digests keyed by resource name (`model_state`, `tag`, ...)
    #[serde(default)]
    pub checksums: HashMap<String, String>,

    /// Hyperparameters of the BiGRU-CRF model being exported
    #[serde(default)]
    pub model: ModelParams,
}

impl Default for LacConfig {
    fn default() -> Self {
        Self {
            resource_dir: default_resource_dir(),
            base_url: default_base_url(),
            python: default_python(),
            timeout_secs: None,
            show_progress: default_show_progress(),
            checksums: HashMap::new(),
            model: ModelParams::default(),
        }
    }
}

impl LacConfig {
    /// Load configuration layered as defaults < TOML file < `LAC_*` environment.
    ///
    /// An explicit `file` must exist. Without one, `<config_dir>/lac/config.toml`
    /// is read when present.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        Self::load_layered(file, environment())
    }

    fn load_layered(file: Option<&Path>, env: config::Environment) -> Result<Self> {
        let mut builder = config::Config::builder();

        match file {
            Some(path) => {
                builder = builder.add_source(config::File::from(path).required(true));
            }
            None => {
                if let Some(path) = default_config_file() {
                    debug!("Looking for configuration in {:?}", path);
                    builder = builder.add_source(config::File::from(path).required(false));
                }
            }
        }

        let settings = builder.add_source(env).build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Expected digest for a resource, if one is configured
    pub fn checksum(&self, name: &str) -> Option<&str> {
        self.checksums.get(name).map(|s| s.as_str())
    }
}

/// `LAC_RESOURCE_DIR`, `LAC_MODEL__HIDDEN_SIZE`, ...
fn environment() -> config::Environment {
    config::Environment::with_prefix("LAC")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

fn default_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("lac").join("config.toml"))
}

fn default_resource_dir() -> PathBuf {
    PathBuf::from("./lac")
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_python() -> String {
    "python3".to_string()
}

fn default_show_progress() -> bool {
    true
}

/// BiGRU-CRF hyperparameters matching the published checkpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelParams {
    #[serde(default = "default_emb_dim")]
    pub emb_dim: usize,

    #[serde(default = "default_hidden_size")]
    pub hidden_size: usize,

    #[serde(default = "default_word_vocab_len")]
    pub word_vocab_len: usize,

    #[serde(default = "default_tag_vocab_len")]
    pub tag_vocab_len: usize,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            emb_dim: default_emb_dim(),
            hidden_size: default_hidden_size(),
            word_vocab_len: default_word_vocab_len(),
            tag_vocab_len: default_tag_vocab_len(),
        }
    }
}

fn default_emb_dim() -> usize {
    128
}

fn default_hidden_size() -> usize {
    128
}

fn default_word_vocab_len() -> usize {
    58224
}

fn default_tag_vocab_len() -> usize {
    57
}
