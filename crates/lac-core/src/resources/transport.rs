//! HTTP transport used by the resource fetcher

use std::io::Read;
use std::time::Duration;
use tracing::debug;

use crate::error::{Error, Result};

/// A successful response whose body has not been read yet
pub struct RemoteFile {
    pub content_length: Option<u64>,
    pub body: Box<dyn Read>,
}

/// Issues a blocking GET and hands back the body stream.
///
/// Implementations must turn non-success statuses into errors.
pub trait Transport {
    fn get(&self, url: &str) -> Result<RemoteFile>;
}

/// Transport backed by a blocking reqwest client
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        // The blocking client applies a 30s timeout unless told otherwise.
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<RemoteFile> {
        let response = self.client.get(url).send()?;
        let status = response.status();
        debug!("GET {} -> {}", url, status);

        if !status.is_success() {
            return Err(Error::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(RemoteFile {
            content_length: response.content_length(),
            body: Box::new(response),
        })
    }
}
