//! Channel server entry point.
mod config;

use anyhow::Result;
use channel_runtime::Runtime;
use config::ServerConfig;
use game_content::ContentFactory;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = ServerConfig::from_env();
    let _guard = setup_logging(&config)?;

    let content = ContentFactory::new(&config.data_dir).load_all()?;
    tracing::info!(
        data_dir = %config.data_dir.display(),
        ranks = content.ranks.len(),
        regions = content.regions.len(),
        "Content loaded"
    );

    let runtime = Runtime::builder()
        .config(config.runtime_config())
        .content(content)
        .build()
        .await?;
    for region in runtime.regions() {
        tracing::info!(%region, "Region online");
    }

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down");
    runtime.shutdown().await?;

    Ok(())
}

/// Setup logging to stderr and, when a log directory is configured, to file.
///
/// The returned guard flushes the file writer on drop.
fn setup_logging(
    config: &ServerConfig,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let (file_layer, guard) = match &config.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let file_appender = tracing_appender::rolling::daily(dir, "channel.log");
            let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking_file)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    if let Some(dir) = &config.log_dir {
        tracing::info!("Log file: {}/channel.log", dir.display());
    }

    Ok(guard)
}
