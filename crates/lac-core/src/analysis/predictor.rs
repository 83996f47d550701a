//! Runs the exported static model through Paddle Inference

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::analysis::lac::Predictor;
use crate::bridge::PythonBridge;
use crate::config::LacConfig;
use crate::error::{Error, Result};
use crate::export::inference_prefix;
use crate::tokenizer::EncodedBatch;

#[derive(Debug, Deserialize)]
struct PredictResponse {
    tags: Vec<Vec<i64>>,
}

/// Predictor backed by `paddle.inference` on `static/inference.*`.
///
/// Every call starts a fresh interpreter and loads the model again, so batch
/// texts together.
pub struct PaddlePredictor {
    bridge: PythonBridge,
    model_prefix: PathBuf,
}

impl PaddlePredictor {
    /// Use the model exported into `resource_dir`
    pub fn from_dir(resource_dir: &Path, python_cmd: impl Into<String>) -> Result<Self> {
        let model_prefix = inference_prefix(resource_dir);
        for ext in ["pdmodel", "pdiparams"] {
            let path = model_prefix.with_extension(ext);
            if !path.is_file() {
                return Err(Error::MissingResource(format!(
                    "{:?} not found; run `lac download` first",
                    path
                )));
            }
        }

        Ok(Self {
            bridge: PythonBridge::new(python_cmd, Error::InferenceError),
            model_prefix,
        })
    }

    pub fn from_config(config: &LacConfig) -> Result<Self> {
        Self::from_dir(&config.resource_dir, config.python.clone())
    }

    /// Replace the program passed to the interpreter
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.bridge.set_program(program);
        self
    }

    pub fn model_prefix(&self) -> &Path {
        &self.model_prefix
    }
}

impl Predictor for PaddlePredictor {
    fn predict(&self, batch: &EncodedBatch) -> Result<Vec<Vec<i64>>> {
        if batch.batch_size() == 0 {
            return Ok(Vec::new());
        }
        debug!(
            "Predicting {} row(s) of up to {} tokens",
            batch.batch_size(),
            batch.max_len()
        );

        let response: PredictResponse = self.bridge.call(
            "predict",
            serde_json::json!({
                "model_prefix": self.model_prefix,
                "token_ids": batch.token_ids,
                "lengths": batch.lengths,
            }),
        )?;
        Ok(response.tags)
    }
}
