//! The main cycle loop: discover, refresh, fan out one batch per active
//! source bounded by a concurrency cap, log metrics, sleep until the next
//! cycle or a shutdown signal.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use signalrouter_bus::BusAdapter;
use signalrouter_common::Config;
use signalrouter_domains::{ChannelRegistry, RoutingPipeline};
use signalrouter_store::{DocumentStore, HistoryStore};
use tokio::sync::Semaphore;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::metrics::RouterMetrics;
use crate::registry_cache::{ActiveSources, RegistryCache};
use crate::shutdown::ShutdownSignal;
use crate::source_worker::{process_source, SourceWorkerContext};
use crate::timeout::with_timeout;

pub struct Orchestrator {
    pub config: Config,
    pub document_store: Arc<dyn DocumentStore>,
    pub history_store: Arc<dyn HistoryStore>,
    pub bus: Arc<dyn BusAdapter>,
    pub pipeline: Arc<RoutingPipeline>,
    pub registry_cache: Arc<RegistryCache>,
    pub active_sources: Arc<ActiveSources>,
    pub metrics: Arc<RouterMetrics>,
    pub shutdown: ShutdownSignal,
}

impl Orchestrator {
    /// Runs cycles until `shutdown` is triggered, then drains in-flight
    /// batches for up to `shutdown_drain_secs` before returning.
    pub async fn run(&self) {
        let adapter_timeout = Duration::from_secs(self.config.adapter_timeout_secs);
        let poll_interval = Duration::from_secs(self.config.poll_interval_secs);
        let discovery_every = self.config.discovery_interval_cycles();
        let registry_every = self.config.registry_refresh_interval_cycles();

        let mut cycle: u64 = 0;
        while !self.shutdown.is_triggered() {
            let cycle_id = Uuid::new_v4();
            let span = info_span!("cycle", %cycle_id, cycle);

            async {
                let started = Instant::now();

                if cycle % discovery_every == 0 {
                    self.refresh_discovery(adapter_timeout).await;
                }
                if cycle % registry_every == 0 {
                    self.refresh_registry(adapter_timeout).await;
                }

                let lag = self.run_cycle().await;

                let snapshot = self.metrics.snapshot(started.elapsed(), lag);
                info!(%snapshot, "cycle complete");
                self.metrics.reset();
            }
            .instrument(span)
            .await;

            cycle += 1;

            tokio::select! {
                _ = tokio::time::sleep(poll_interval) => {}
                _ = self.shutdown.wait() => {
                    warn!("shutdown requested during inter-cycle sleep");
                }
            }
        }
    }

    async fn refresh_discovery(&self, adapter_timeout: Duration) {
        let discovered = with_timeout(
            adapter_timeout,
            "discover_indexes",
            self.document_store.discover_indexes(),
        )
        .await
        .unwrap_or_else(|err| {
            warn!(error = %err, "index discovery failed, keeping previous active sources");
            BTreeSet::new()
        });

        let enabled_sources = with_timeout(
            adapter_timeout,
            "load_enabled_sources",
            self.history_store.load_enabled_sources(),
        )
        .await
        .unwrap_or_else(|err| {
            warn!(error = %err, "loading enabled sources failed");
            Vec::new()
        })
        .into_iter()
        .filter(|s| s.enabled)
        .map(|s| s.index_pattern);

        self.active_sources.refresh(discovered, enabled_sources);
    }

    async fn refresh_registry(&self, adapter_timeout: Duration) {
        match with_timeout(
            adapter_timeout,
            "load_custom_channels",
            self.history_store.load_custom_channels(),
        )
        .await
        {
            Ok(channels) => self.registry_cache.store(ChannelRegistry::new(channels)),
            Err(err) => warn!(error = %err, "channel registry refresh failed, keeping previous snapshot"),
        }
    }

    /// Fans out one batch per active source, bounded by `max_source_concurrency`.
    /// A shutdown signal mid-cycle cuts off at most `shutdown_drain_secs` of
    /// draining before abandoning whatever hasn't finished. Exposed as `pub`
    /// so tests can drive a single deterministic cycle directly instead of
    /// racing `run()`'s sleep.
    pub async fn run_cycle(&self) -> Option<i64> {
        let adapter_timeout = Duration::from_secs(self.config.adapter_timeout_secs);
        let sources = self.active_sources.snapshot();
        if sources.is_empty() {
            return None;
        }

        let permits = if self.config.max_source_concurrency == 0 {
            sources.len().min(8).max(1)
        } else {
            self.config.max_source_concurrency.max(1)
        };
        let semaphore = Arc::new(Semaphore::new(permits));
        let registry = self.registry_cache.load();

        let handles: Vec<_> = sources
            .iter()
            .cloned()
            .map(|index| {
                let semaphore = semaphore.clone();
                let ctx = SourceWorkerContext {
                    document_store: self.document_store.clone(),
                    history_store: self.history_store.clone(),
                    bus: self.bus.clone(),
                    pipeline: self.pipeline.clone(),
                    batch_size: self.config.batch_size,
                    adapter_timeout,
                    metrics: self.metrics.clone(),
                };
                let registry = registry.clone();
                let span = info_span!("source_batch", source = %index);
                tokio::spawn(
                    async move {
                        let _permit = semaphore.acquire_owned().await.expect("semaphore never closed");
                        process_source(&ctx, &index, &registry).await
                    }
                    .instrument(span),
                )
            })
            .collect();

        let processing = futures::future::join_all(handles);
        tokio::pin!(processing);

        let results = tokio::select! {
            results = &mut processing => results,
            _ = self.shutdown.wait() => {
                warn!("shutdown requested mid-cycle; draining in-flight sources");
                let drain = Duration::from_secs(self.config.shutdown_drain_secs);
                match tokio::time::timeout(drain, &mut processing).await {
                    Ok(results) => results,
                    Err(_) => {
                        warn!("drain deadline exceeded; abandoning in-flight batches");
                        return None;
                    }
                }
            }
        };

        results
            .into_iter()
            .filter_map(|r| r.unwrap_or_else(|err| {
                warn!(error = %err, "source worker task panicked");
                None
            }))
            .max()
    }
}
