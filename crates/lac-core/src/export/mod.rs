//! Dygraph-to-static export of the LAC model

mod exporter;
mod paddle;
mod signature;

pub use exporter::{
    artifact_files, export_model, inference_prefix, ExportOutcome, ExportRequest, ModelExporter,
    INFERENCE_PREFIX, STATIC_DIR,
};
pub use paddle::PaddleExporter;
pub use signature::{lac_input_spec, DType, InputSpec};
