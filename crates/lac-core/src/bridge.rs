//! Subprocess bridge to the Paddle side of the tool
//!
//! Each call starts `<python> -c <program>`, feeds one JSON request on stdin and
//! takes the last JSON object printed on stdout as the response. A response
//! carrying an `error` field is a failure.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::io::Write;
use std::process::{Command, Output, Stdio};
use tracing::debug;

use crate::error::{Error, Result};

/// Program shared by the exporter and the predictor
pub(crate) const PADDLE_PROGRAM: &str = include_str!("../scripts/lac_paddle.py");

/// Builds the error variant a caller reports bridge failures as
pub(crate) type ErrorKind = fn(String) -> Error;

#[derive(Debug, Clone)]
pub(crate) struct PythonBridge {
    python_cmd: String,
    program: String,
    error: ErrorKind,
}

impl PythonBridge {
    pub fn new(python_cmd: impl Into<String>, error: ErrorKind) -> Self {
        Self {
            python_cmd: python_cmd.into(),
            program: PADDLE_PROGRAM.to_string(),
            error,
        }
    }

    pub fn set_program(&mut self, program: impl Into<String>) {
        self.program = program.into();
    }

    /// Send `command` with `fields` merged into the request object
    pub fn call<R: DeserializeOwned>(&self, command: &str, fields: Value) -> Result<R> {
        let mut request = match fields {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => return Err((self.error)(format!("request is not an object: {}", other))),
        };
        request.insert("command".to_string(), Value::from(command));
        debug!("{} request to {}", command, self.python_cmd);

        let output = self.run(Value::Object(request).to_string().as_bytes())?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        let mut response = last_json_object(&stdout)
            .ok_or_else(|| (self.error)(format!("no JSON response from Python: {:?}", stdout.trim())))?;

        if let Some(err) = response.remove("error").filter(|e| !e.is_null()) {
            let message = err.as_str().map(str::to_string).unwrap_or_else(|| err.to_string());
            return Err((self.error)(message));
        }

        serde_json::from_value(Value::Object(response))
            .map_err(|e| (self.error)(format!("unexpected {} response: {}", command, e)))
    }

    fn run(&self, stdin_bytes: &[u8]) -> Result<Output> {
        let mut child = Command::new(&self.python_cmd)
            .arg("-c")
            .arg(&self.program)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| (self.error)(format!("cannot start {}: {}", self.python_cmd, e)))?;

        // Dropping the handle closes the pipe so the program sees EOF.
        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(stdin_bytes)
                .map_err(|e| (self.error)(format!("writing request: {}", e)))?;
        }

        let output = child
            .wait_with_output()
            .map_err(|e| (self.error)(format!("waiting for {}: {}", self.python_cmd, e)))?;

        if output.status.success() {
            Ok(output)
        } else {
            Err((self.error)(format!(
                "{} exited with {}: {}",
                self.python_cmd,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )))
        }
    }
}

/// Paddle logs to stdout as well, so only the last `{...}` line counts
fn last_json_object(stdout: &str) -> Option<Map<String, Value>> {
    stdout
        .lines()
        .rev()
        .filter(|line| line.trim_start().starts_with('{'))
        .find_map(|line| match serde_json::from_str(line) {
            Ok(Value::Object(map)) => Some(map),
            _ => None,
        })
}
