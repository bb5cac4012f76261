use std::sync::Arc;

use hostwatch_common::config::Config;
use hostwatch_core::checks::NetworkChecks;
use hostwatch_core::cloud::{AwsMetadataClient, MetadataSource};
use hostwatch_core::scanner::{CommandScanner, PortScanner};
use hostwatch_core::system::{SystemRepo, SystemRepository};
use tracing::Span;

/// Everything a request handler needs, shared across requests.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub checks: Arc<NetworkChecks>,
    pub system: Arc<dyn SystemRepository>,
    pub metadata: Arc<dyn MetadataSource>,
    /// Root span every request is handled in.
    pub span: Span,
}

impl AppState {
    /// Wires the production adapters from `config`.
    pub fn from_config(config: Config, span: Span) -> anyhow::Result<Self> {
        let scanner: Arc<dyn PortScanner> = Arc::new(CommandScanner::new(config.scan.clone()));
        let metadata = AwsMetadataClient::new(config.metadata_url.clone(), config.metadata_timeout())?;

        Ok(Self::new(
            config,
            scanner,
            Arc::new(SystemRepo::default()),
            Arc::new(metadata),
            span,
        ))
    }

    pub fn new(
        config: Config,
        scanner: Arc<dyn PortScanner>,
        system: Arc<dyn SystemRepository>,
        metadata: Arc<dyn MetadataSource>,
        span: Span,
    ) -> Self {
        let checks = NetworkChecks::new(scanner, config.probe_timeout());
        Self {
            config: Arc::new(config),
            checks: Arc::new(checks),
            system,
            metadata,
            span,
        }
    }
}
