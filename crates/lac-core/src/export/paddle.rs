//! Dygraph-to-static export through PaddlePaddle

use serde::Deserialize;
use std::fs;
use tracing::{info, warn};

use crate::bridge::PythonBridge;
use crate::config::LacConfig;
use crate::error::{Error, Result};
use crate::export::exporter::{artifact_files, ExportOutcome, ExportRequest, ModelExporter};

#[derive(Debug, Deserialize)]
struct StatusResponse {
    status: Option<String>,
}

/// Exporter that delegates tracing and saving to PaddlePaddle
pub struct PaddleExporter {
    bridge: PythonBridge,
}

impl PaddleExporter {
    pub fn new(python_cmd: impl Into<String>) -> Self {
        Self {
            bridge: PythonBridge::new(python_cmd, Error::ExportError),
        }
    }

    pub fn from_config(config: &LacConfig) -> Self {
        Self::new(config.python.clone())
    }

    /// Replace the program passed to the interpreter
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.bridge.set_program(program);
        self
    }

    /// Check if paddle and paddlenlp can be imported
    pub fn check_dependencies(&self) -> Result<bool> {
        match self.bridge.call::<StatusResponse>("check", serde_json::Value::Null) {
            Ok(response) => Ok(response.status.as_deref() == Some("ok")),
            Err(e) => {
                warn!("Python dependencies not available: {}", e);
                Ok(false)
            }
        }
    }
}

impl ModelExporter for PaddleExporter {
    fn export(&self, request: &ExportRequest) -> Result<ExportOutcome> {
        fs::create_dir_all(request.static_dir())?;

        info!("Converting to the inference model costs a little time.");
        let _: StatusResponse = self
            .bridge
            .call("export", serde_json::to_value(request)?)?;

        let files = artifact_files(&request.output_prefix)?;
        if files.is_empty() {
            return Err(Error::ExportError(format!(
                "no artifact written at {:?}",
                request.output_prefix
            )));
        }

        info!(
            "The inference model is saved in the path: {:?}",
            request.output_prefix
        );
        Ok(ExportOutcome {
            output_prefix: request.output_prefix.clone(),
            files,
        })
    }
}
