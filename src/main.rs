use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use botlist_api::{
    config::Config,
    database::{Database, repositories::BotSeaOrmRepository},
    services::WebhookClient,
    web::{AppState, WebServer},
    widget::{CdnAvatarClient, StyleRegistry, WidgetAssets, WidgetService},
};

#[derive(Parser)]
#[command(name = "botlist-api")]
#[command(version)]
#[command(about = "Bot directory API with dynamically rendered SVG widgets")]
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

    /// Database URL (overrides config file)
    #[arg(short = 'd', long, value_name = "URL")]
    database_url: Option<String>,

    /// Log level
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_filter = if cli.log_level == "trace" {
        format!("botlist_api={},tower_http=trace", cli.log_level)
    } else {
        format!("botlist_api={}", cli.log_level)
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Bot List API v{}", env!("CARGO_PKG_VERSION"));

    let mut config = Config::load_from_file(&cli.config)?;
    info!("Configuration loaded from: {}", cli.config);

    if let Some(host) = cli.host {
        config.web.host = host;
    }
    if let Some(port) = cli.port {
        config.web.port = port;
    }
    if let Some(database_url) = cli.database_url {
        config.database.url = database_url;
    }

    let database = Database::new(&config.database).await?;
    database.migrate().await?;

    let assets = WidgetAssets::load(&config.assets)?;
    let avatars = Arc::new(CdnAvatarClient::new(&config.avatar)?);
    let widgets = Arc::new(WidgetService::new(
        BotSeaOrmRepository::new(database.connection()),
        avatars,
        assets,
        StyleRegistry::default(),
        &config.widget,
    ));
    info!(
        styles = ?widgets.styles().names().collect::<Vec<_>>(),
        cache_ttl = %humantime::format_duration(config.widget.cache_ttl),
        cache_capacity = config.widget.cache_capacity,
        "Widget service ready"
    );

    let webhooks = WebhookClient::new(&config.webhook)?;

    let server = WebServer::new(&config.web, AppState::new(database, widgets, webhooks))?;
    info!("Starting web server on {}", server.addr());

    server.serve().await
}
