//! Per-call timeout wrapper: every adapter suspension point — `FetchBatch`,
//! `HasPublished`, `Publish`, `RecordPublish`, `SaveCursor`,
//! `LoadCustomChannels`, `DiscoverIndexes` — goes through this so a hung
//! adapter call degrades to a `Transient` error instead of blocking a cycle
//! forever.

use std::future::Future;
use std::time::Duration;

use signalrouter_common::RouterError;

pub async fn with_timeout<F, T>(duration: Duration, label: &str, fut: F) -> Result<T, RouterError>
where
    F: Future<Output = Result<T, RouterError>>,
{
    match tokio::time::timeout(duration, fut).await {
        Ok(result) => result,
        Err(_) => Err(RouterError::Transient(format!(
            "{label} timed out after {:.1}s",
            duration.as_secs_f64()
        ))),
    }
}
