use estate_flow::config::AppConfig;
use estate_flow::server;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env();

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_tracing(&config);

    config.validate()?;

    eprintln!("🏡 EstateFlow v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Deck:    http://0.0.0.0:{}/", config.port);
    eprintln!("   Landing: http://0.0.0.0:{}/landing", config.port);
    eprintln!("   Deck WS: ws://0.0.0.0:{}/ws/deck", config.port);
    if config.has_credential() {
        eprintln!("   Chat:    live ({})", config.model);
    } else {
        eprintln!("   Chat:    demo mode (set GEMINI_API_KEY to go live)");
    }
    if let Some(dir) = &config.log_dir {
        eprintln!("   Logs:    {}", dir.display());
    }
    eprintln!();

    server::serve(&config).await?;
    Ok(())
}

fn init_tracing(config: &AppConfig) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (file_layer, guard) = match &config.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "estate-flow.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(file_layer)
        .init();

    guard
}
