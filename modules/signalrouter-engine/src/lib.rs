pub mod bootstrap;
pub mod envelope;
pub mod metrics;
pub mod orchestrator;
pub mod registry_cache;
pub mod shutdown;
pub mod source_worker;
pub mod timeout;

pub use metrics::{MetricsSnapshot, RouterMetrics};
pub use orchestrator::Orchestrator;
pub use registry_cache::{ActiveSources, RegistryCache};
pub use shutdown::ShutdownSignal;
