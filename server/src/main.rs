use colored::*;
use hostwatch_server::api;
use hostwatch_server::cli::CommandLine;
use hostwatch_server::logging;
use hostwatch_server::state::AppState;
use tokio::net::TcpListener;
use tracing::{info, info_span, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();
    let config = commands.load_config()?;

    logging::init_logging(&config.log_level, config.log_format)?;

    let span = info_span!("hostwatch");
    let bind = config.bind;
    let state = AppState::from_config(config, span.clone())?;

    let listener = TcpListener::bind(bind).await?;
    span.in_scope(|| {
        info!(
            "{} listening on {}",
            format!("hostwatch v{}", env!("CARGO_PKG_VERSION")).bright_green().bold(),
            listener.local_addr().unwrap_or(bind)
        );
    });

    axum::serve(listener, api::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    span.in_scope(|| info!("server stopped"));
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
