//! Graceful shutdown: SIGINT/SIGTERM trigger a drain — stop accepting new
//! cycles, let in-flight per-source batches finish for up to
//! `shutdown_drain_secs`, then stop.

use tokio::sync::watch;

#[derive(Clone)]
pub struct ShutdownSignal {
    tx: std::sync::Arc<watch::Sender<bool>>,
    rx: watch::Receiver<bool>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            tx: std::sync::Arc::new(tx),
            rx,
        }
    }

    pub fn trigger(&self) {
        let _ = self.tx.send(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.rx.clone()
    }

    /// Resolves once shutdown has been triggered.
    pub async fn wait(&self) {
        let mut rx = self.rx.clone();
        let _ = rx.wait_for(|&v| v).await;
    }

    /// Installs OS signal handlers that trigger shutdown on Ctrl+C/SIGTERM.
    pub fn install_handlers(&self) {
        let signal = self.clone();
        tokio::spawn(async move {
            let ctrl_c = async {
                tokio::signal::ctrl_c()
                    .await
                    .expect("failed to install Ctrl+C handler");
            };

            #[cfg(unix)]
            let terminate = async {
                tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                    .expect("failed to install SIGTERM handler")
                    .recv()
                    .await;
            };

            #[cfg(not(unix))]
            let terminate = std::future::pending::<()>();

            tokio::select! {
                _ = ctrl_c => tracing::info!("received Ctrl+C, starting graceful drain"),
                _ = terminate => tracing::info!("received SIGTERM, starting graceful drain"),
            }

            signal.trigger();
        });
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn not_triggered_initially() {
        let shutdown = ShutdownSignal::new();
        assert!(!shutdown.is_triggered());
    }

    #[tokio::test]
    async fn wait_resolves_after_trigger() {
        let shutdown = ShutdownSignal::new();
        let waiter = shutdown.clone();
        let handle = tokio::spawn(async move { waiter.wait().await });

        tokio::task::yield_now().await;
        shutdown.trigger();

        tokio::time::timeout(std::time::Duration::from_millis(200), handle)
            .await
            .unwrap()
            .unwrap();
    }
}
