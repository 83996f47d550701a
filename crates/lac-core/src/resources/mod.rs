//! Resource manifest and downloading

mod fetcher;
mod manifest;
mod transport;

pub use fetcher::{FetchReport, ResourceFetcher};
pub use manifest::{missing_resources, ResourceKind};
pub use transport::{HttpTransport, RemoteFile, Transport};
