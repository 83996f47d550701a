//! The `download` workflow: fetch resources, then export the static model

use tracing::info;

use crate::config::LacConfig;
use crate::error::Result;
use crate::export::{export_model, ExportOutcome, ModelExporter};
use crate::resources::{FetchReport, ResourceFetcher, Transport};

/// Result of a full download run
#[derive(Debug, Clone)]
pub struct DownloadSummary {
    pub fetch: FetchReport,
    pub export: ExportOutcome,
}

/// Populate `config.resource_dir` and convert the model found there.
///
/// The exporter only runs after every resource is present locally.
pub fn download<T, E>(config: &LacConfig, transport: T, exporter: &E) -> Result<DownloadSummary>
where
    T: Transport,
    E: ModelExporter + ?Sized,
{
    let dir = &config.resource_dir;
    info!("Preparing LAC resources in {:?}", dir);

    let fetcher = ResourceFetcher::from_config(transport, config);
    let fetch = fetcher.ensure_resources(dir)?;
    info!(
        "{} resource(s) downloaded, {} already present",
        fetch.fetched.len(),
        fetch.skipped.len()
    );

    let export = export_model(exporter, dir, &config.model)?;
    Ok(DownloadSummary { fetch, export })
}
