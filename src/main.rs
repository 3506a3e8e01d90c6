use anyhow::Result;
use chatrelay_config::Config;
use chatrelay_proxy::AppState;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "chatrelay", about = "chatrelay — chat-web relay to an upstream completion provider")]
struct Cli {
    /// Path to a YAML configuration file (environment variables take precedence).
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Override the listening port (default: 3002).
    #[arg(short, long)]
    port: Option<u16>,
    /// Override the listening address (default: 0.0.0.0).
    #[arg(long)]
    host: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = if let Some(path) = &cli.config {
        Config::from_file(path).map_err(|e| anyhow::anyhow!("config error: {e}"))?
    } else {
        Config::from_env().map_err(|e| anyhow::anyhow!("config error: {e}"))?
    };
    if let Some(p) = cli.port {
        config.port = p;
    }
    if let Some(h) = cli.host {
        config.host = h;
    }

    if !config.auth_enabled() {
        tracing::warn!("no AUTH_SECRET_KEY configured; auth is disabled");
    }

    let addr = format!("{}:{}", config.host, config.port);
    let state = AppState::new(config);
    let app = chatrelay_proxy::make_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "chatrelay listening");
    axum::serve(listener, app).await?;
    Ok(())
}
