//! LAC Core - resources and static export for the LAC lexical analyzer
//!
//! This crate prepares a directory for serving Baidu's LAC (lexical analysis
//! of Chinese) model:
//! - downloads the pretrained weights and dictionaries from the object store,
//!   skipping files that are already present
//! - traces the BiGRU-CRF dygraph model into a static inference model through
//!   PaddlePaddle
//! - loads the dictionaries to encode text for, and decode tags from, the
//!   exported model, which runs under Paddle Inference
//!
//! # Example
//!
//! ```ignore
//! use lac_core::{workflow, HttpTransport, LacConfig, PaddleExporter};
//!
//! let config = LacConfig::load(None)?;
//! let transport = HttpTransport::new(config.timeout())?;
//! let exporter = PaddleExporter::from_config(&config);
//! let summary = workflow::download(&config, transport, &exporter)?;
//! ```

pub mod analysis;
mod bridge;
pub mod config;
pub mod error;
pub mod export;
pub mod resources;
pub mod tokenizer;
pub mod vocab;
pub mod workflow;

pub use analysis::{Customization, Lac, PaddlePredictor, Predictor, Segment, Segments, Tag};
pub use config::{LacConfig, ModelParams};
pub use error::{Error, Result};
pub use export::{ExportOutcome, ExportRequest, ModelExporter, PaddleExporter};
pub use resources::{FetchReport, HttpTransport, ResourceFetcher, ResourceKind, Transport};
pub use tokenizer::{EncodedBatch, LacTokenizer};
pub use workflow::{download, DownloadSummary};
