//! coinpulse - live crypto prices and market movement updates in the terminal.

use coinpulse::{App, Config, Result, config};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Log to a daily file; the terminal belongs to the dashboard.
fn init_logging() -> Result<WorkerGuard> {
    let log_dir = config::log_dir()?;
    std::fs::create_dir_all(&log_dir)?;

    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(log_dir, "coinpulse.log"));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "coinpulse=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(writer),
        )
        .init();

    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Flushes buffered log lines on exit
    let _guard = init_logging()?;

    // Load configuration
    let config = Config::load_or_default()?;
    tracing::info!(
        price_interval = ?config.polling.price_interval(),
        news_interval = ?config.polling.news_interval(),
        "starting"
    );

    // Run the application
    let mut app = App::new(config).await?;
    let result = app.run().await;
    drop(app);

    if let Err(e) = &result {
        tracing::error!(error = %e, "exited with error");
    }
    result
}
