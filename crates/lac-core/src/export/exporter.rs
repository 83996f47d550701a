//! Export request/outcome types and the exporter seam

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::ModelParams;
use crate::error::{Error, Result};
use crate::export::signature::{lac_input_spec, InputSpec};
use crate::resources::{missing_resources, ResourceKind};

/// Directory under the resource dir that receives the traced model
pub const STATIC_DIR: &str = "static";

/// File stem of the traced model inside [`STATIC_DIR`]
pub const INFERENCE_PREFIX: &str = "inference";

/// Everything the external framework needs to trace and save the model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRequest {
    pub weights_path: PathBuf,
    pub output_prefix: PathBuf,
    pub params: ModelParams,
    pub input_spec: Vec<InputSpec>,
}

impl ExportRequest {
    pub fn new(resource_dir: &Path, params: ModelParams) -> Self {
        Self {
            weights_path: ResourceKind::ModelState.local_path(resource_dir),
            output_prefix: inference_prefix(resource_dir),
            params,
            input_spec: lac_input_spec(),
        }
    }

    pub fn static_dir(&self) -> &Path {
        self.output_prefix.parent().unwrap_or_else(|| Path::new("."))
    }
}

/// Files written by a successful export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutcome {
    pub output_prefix: PathBuf,
    pub files: Vec<PathBuf>,
}

/// Turns the dygraph checkpoint into a static inference model
pub trait ModelExporter {
    fn export(&self, request: &ExportRequest) -> Result<ExportOutcome>;
}

/// `<dir>/static/inference`
pub fn inference_prefix(resource_dir: &Path) -> PathBuf {
    resource_dir.join(STATIC_DIR).join(INFERENCE_PREFIX)
}

/// Artifact files (`inference.*`) sitting next to `prefix`, sorted
pub fn artifact_files(prefix: &Path) -> Result<Vec<PathBuf>> {
    let dir = match prefix.parent() {
        Some(dir) if dir.is_dir() => dir,
        _ => return Ok(Vec::new()),
    };
    let stem = prefix
        .file_name()
        .map(|s| format!("{}.", s.to_string_lossy()))
        .unwrap_or_default();

    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let matches = path
            .file_name()
            .map(|n| n.to_string_lossy().starts_with(&stem))
            .unwrap_or(false);
        if matches && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Run `exporter` once every manifest file is present in `resource_dir`
pub fn export_model<E: ModelExporter + ?Sized>(
    exporter: &E,
    resource_dir: &Path,
    params: &ModelParams,
) -> Result<ExportOutcome> {
    let missing = missing_resources(resource_dir);
    if !missing.is_empty() {
        let names: Vec<_> = missing.iter().map(|k| k.file_name()).collect();
        return Err(Error::MissingResource(format!(
            "{} not found in {:?}",
            names.join(", "),
            resource_dir
        )));
    }

    let request = ExportRequest::new(resource_dir, params.clone());
    exporter.export(&request)
}
