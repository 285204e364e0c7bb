//! Wires real adapters into an `Orchestrator`.

use std::sync::Arc;

use signalrouter_bus::{BusAdapter, HttpBusAdapter};
use signalrouter_common::{Config, RouterError};
use signalrouter_domains::{ChannelRegistry, RoutingPipeline};
use signalrouter_store::{DocumentStore, HistoryStore, HttpDocumentStore, PostgresHistoryStore};

use crate::metrics::RouterMetrics;
use crate::orchestrator::Orchestrator;
use crate::registry_cache::{ActiveSources, RegistryCache};
use crate::shutdown::ShutdownSignal;

/// Connects to Postgres, runs pending migrations, and assembles an
/// `Orchestrator` ready to `run()`. The channel registry starts empty and
/// picks up its first real snapshot on the orchestrator's first registry
/// refresh (cycle 0).
pub async fn build(config: Config) -> Result<Orchestrator, RouterError> {
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(8)
        .connect(&config.database_url)
        .await
        .map_err(|e| RouterError::Fatal(format!("failed to connect to history store: {e}")))?;

    let history_store = PostgresHistoryStore::new(pool);
    history_store.migrate().await?;
    let history_store: Arc<dyn HistoryStore> = Arc::new(history_store);

    let http_client = reqwest::Client::new();
    let document_store: Arc<dyn DocumentStore> = Arc::new(HttpDocumentStore::new(
        http_client.clone(),
        config.document_store_url.clone(),
    ));
    let bus: Arc<dyn BusAdapter> = Arc::new(HttpBusAdapter::new(http_client, config.bus_url.clone()));

    let pipeline = Arc::new(RoutingPipeline::new());
    let registry_cache = Arc::new(RegistryCache::new(ChannelRegistry::default()));
    let active_sources = Arc::new(ActiveSources::new());
    let metrics = Arc::new(RouterMetrics::new());
    let shutdown = ShutdownSignal::new();

    Ok(Orchestrator {
        config,
        document_store,
        history_store,
        bus,
        pipeline,
        registry_cache,
        active_sources,
        metrics,
        shutdown,
    })
}
