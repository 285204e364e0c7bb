//! Per-source batch processing: fetch one batch, route each article through
//! the pipeline in order, dedup and publish each candidate channel, and
//! advance the cursor only through the contiguous prefix of articles that
//! fully committed.
//!
//! Articles within a batch are processed strictly in fetch order to preserve
//! per-source ordering: all of article N's channels publish before article
//! N+1's first channel is even evaluated. The cursor saved at the end of the
//! batch stops just before the first article with an unrecorded publish, so
//! that article is still fetched next cycle and gets a chance to replay its
//! history write, even though later articles in the same batch may already
//! have been fully published and recorded — those are simply reprocessed
//! next cycle and skip via `HasPublished`.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use signalrouter_bus::BusAdapter;
use signalrouter_common::RouterError;
use signalrouter_domains::{Article, ChannelRegistry, RoutingPipeline};
use signalrouter_store::{Cursor, DocumentStore, HistoryStore};
use tracing::{debug, error, warn};

use crate::envelope::build_envelope;
use crate::metrics::RouterMetrics;
use crate::timeout::with_timeout;

pub struct SourceWorkerContext {
    pub document_store: Arc<dyn DocumentStore>,
    pub history_store: Arc<dyn HistoryStore>,
    pub bus: Arc<dyn BusAdapter>,
    pub pipeline: Arc<RoutingPipeline>,
    pub batch_size: i64,
    pub adapter_timeout: Duration,
    pub metrics: Arc<RouterMetrics>,
}

/// Outcome of routing one article's candidate channel set.
enum ArticleOutcome {
    /// Every candidate channel is either already deduped or was published
    /// and recorded this cycle. Safe for the cursor to pass.
    Committed,
    /// At least one candidate channel failed to publish, or published but
    /// failed to record. The cursor must not pass this article, so the next
    /// cycle re-fetches it and retries the unrecorded channels.
    Pending,
    /// A store call needed to even determine dedup state failed. The whole
    /// batch stops here; nothing after this article is processed.
    BatchAbort,
}

/// Runs one batch for one source. Returns the lag (in seconds, cycle-start
/// `now` minus the newest article's `published_at`) observed in this batch,
/// or `None` if nothing was fetched.
pub async fn process_source(
    ctx: &SourceWorkerContext,
    index: &str,
    registry: &ChannelRegistry,
) -> Option<i64> {
    let cursor = match with_timeout(
        ctx.adapter_timeout,
        "load_cursor",
        ctx.history_store.load_cursor(index),
    )
    .await
    {
        Ok(Some(cursor)) => cursor,
        Ok(None) => Cursor::epoch(),
        Err(err) => {
            log_adapter_error("load_cursor", index, &err);
            return None;
        }
    };

    let batch = match with_timeout(
        ctx.adapter_timeout,
        "fetch_batch",
        ctx.document_store.fetch_batch(index, &cursor, ctx.batch_size.max(1) as u32),
    )
    .await
    {
        Ok(batch) => batch,
        Err(err) => {
            log_adapter_error("fetch_batch", index, &err);
            return None;
        }
    };

    if batch.articles.is_empty() {
        return None;
    }

    for _ in &batch.articles {
        RouterMetrics::incr(&ctx.metrics.articles_fetched);
    }

    let newest_published_at = batch.articles.iter().map(|a| a.published_at).max();

    let mut committed_through: Option<Cursor> = None;
    let mut seen_pending = false;

    for article in &batch.articles {
        match process_article(ctx, index, article, registry).await {
            ArticleOutcome::Committed => {
                if !seen_pending {
                    committed_through = Some(Cursor {
                        published_at: article.published_at,
                        id: article.id.clone(),
                    });
                }
            }
            ArticleOutcome::Pending => {
                seen_pending = true;
            }
            ArticleOutcome::BatchAbort => {
                warn!(index, article_id = %article.id, "batch aborted on a store failure mid-batch");
                break;
            }
        }
    }

    if let Some(cursor) = committed_through {
        match with_timeout(
            ctx.adapter_timeout,
            "save_cursor",
            ctx.history_store.save_cursor(index, &cursor),
        )
        .await
        {
            Ok(()) => RouterMetrics::incr(&ctx.metrics.cursor_saved),
            Err(err) => log_adapter_error("save_cursor", index, &err),
        }
    }

    newest_published_at.map(|ts| (Utc::now() - ts).num_seconds())
}

/// Processes one article's candidate channel set in order, never stopping
/// early on a per-channel `publish`/`record_publish` failure — a failing
/// channel must not stop the rest of the article's candidates, or the rest
/// of the batch.
#[tracing::instrument(skip(ctx, article, registry), fields(article_id = %article.id))]
async fn process_article(
    ctx: &SourceWorkerContext,
    index: &str,
    article: &Article,
    registry: &ChannelRegistry,
) -> ArticleOutcome {
    let candidates = ctx.pipeline.evaluate(article, registry);
    let mut pending = false;
    let mut published_any = false;

    for route in candidates {
        let has_published =
            with_timeout(ctx.adapter_timeout, "has_published", ctx.history_store.has_published(&article.id, &route.topic)).await;

        let already_published = match has_published {
            Ok(exists) => exists,
            Err(err) => {
                log_adapter_error("has_published", index, &err);
                return ArticleOutcome::BatchAbort;
            }
        };

        if already_published {
            RouterMetrics::incr(&ctx.metrics.dedup_hits);
            continue;
        }

        let payload = build_envelope(article, &route);
        let publish_result =
            with_timeout(ctx.adapter_timeout, "publish", ctx.bus.publish(&route.topic, &payload)).await;

        if let Err(err) = publish_result {
            log_adapter_error("publish", index, &err);
            RouterMetrics::incr(&ctx.metrics.publish_errors);
            pending = true;
            continue;
        }

        let record_result = with_timeout(
            ctx.adapter_timeout,
            "record_publish",
            ctx.history_store.record_publish(
                &article.id,
                &route.topic,
                route.channel_id.as_deref(),
                route.route_id.as_deref(),
                Utc::now(),
            ),
        )
        .await;

        match record_result {
            Ok(()) => {
                published_any = true;
                RouterMetrics::incr(&ctx.metrics.channels_published);
            }
            Err(RouterError::AlreadyExists) => {
                RouterMetrics::incr(&ctx.metrics.dedup_hits);
            }
            Err(err) => {
                log_adapter_error("record_publish", index, &err);
                RouterMetrics::incr(&ctx.metrics.history_write_errors);
                pending = true;
            }
        }

        debug!(
            index,
            article_id = %article.id,
            channel = %route.topic,
            "routed article to channel"
        );
    }

    if published_any {
        RouterMetrics::incr(&ctx.metrics.articles_published);
    }

    if pending {
        ArticleOutcome::Pending
    } else {
        ArticleOutcome::Committed
    }
}

fn log_adapter_error(call: &str, index: &str, err: &RouterError) {
    if err.is_permanent() {
        error!(call, index, error = %err, "adapter call failed permanently");
    } else {
        warn!(call, index, error = %err, "adapter call failed transiently");
    }
}
