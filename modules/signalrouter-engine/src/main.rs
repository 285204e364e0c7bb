use signalrouter_common::Config;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env();

    if config.log_format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(EnvFilter::from_default_env().add_directive("signalrouter=info".parse()?))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("signalrouter=info".parse()?))
            .init();
    }

    info!("signalrouter-engine starting");
    config.log_redacted();

    if let Err(err) = config.validate() {
        error!(error = %err, "invalid configuration");
        std::process::exit(1);
    }

    let orchestrator = match signalrouter_engine::bootstrap::build(config).await {
        Ok(orchestrator) => orchestrator,
        Err(err) => {
            error!(error = %err, "bootstrap failed");
            std::process::exit(1);
        }
    };

    orchestrator.shutdown.install_handlers();
    orchestrator.run().await;

    info!("signalrouter-engine stopped");
    Ok(())
}
