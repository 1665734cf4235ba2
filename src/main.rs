use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use btkn_info::{
    config::Config,
    registry::TokenListRegistry,
    services::TokenLookupService,
    utils::ReqwestTransport,
    web::WebServer,
};

#[derive(Parser)]
#[command(name = "btkn-info")]
#[command(version)]
#[command(about = "Token metadata and logo lookups across nested BTKN token lists")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Listening IP address
    #[arg(short = 'H', long, value_name = "IP")]
    host: Option<String>,

    /// Listening port
    #[arg(short, long, value_name = "PORT")]
    port: Option<u16>,

    /// Token list registry file (overrides config file)
    #[arg(short, long, value_name = "FILE")]
    registry: Option<PathBuf>,

    /// Log level
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging with specified level
    let log_filter = if cli.log_level == "trace" {
        format!("btkn_info={},tower_http=trace", cli.log_level)
    } else {
        format!("btkn_info={}", cli.log_level)
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting btkn-info v{}", env!("CARGO_PKG_VERSION"));

    let mut config = Config::load_from_file(&cli.config)?;
    info!("Configuration loaded from: {}", cli.config);

    // Override config with CLI arguments
    if let Some(host) = cli.host {
        config.web.host = host;
    }
    if let Some(port) = cli.port {
        config.web.port = port;
    }
    if let Some(registry) = cli.registry {
        config.registry.path = registry;
    }

    let registry = Arc::new(TokenListRegistry::load(&config.registry.path).await?);
    if registry.is_empty() {
        tracing::warn!(
            "Registry {} has no token lists, every lookup will be a miss",
            config.registry.path.display()
        );
    }

    let client_timeout = config.fetch.document_timeout.max(config.fetch.resource_timeout);
    let transport = Arc::new(ReqwestTransport::new(client_timeout, &config.fetch.user_agent)?);
    let lookup = TokenLookupService::from_config(&config, registry, transport);
    info!(
        "Lookup service initialized (document ttl {}, logo ttl {}, {} concurrent fetches)",
        humantime::format_duration(config.cache.document_ttl),
        humantime::format_duration(config.cache.resource_ttl),
        config.fetch.max_concurrent_fetches
    );

    let web_server = WebServer::new(config, lookup)?;

    info!(
        "Starting web server on {}:{}",
        web_server.host(),
        web_server.port()
    );
    web_server.serve().await?;

    Ok(())
}
