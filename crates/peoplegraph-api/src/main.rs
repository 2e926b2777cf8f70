//! CLI entry point for the peoplegraph REST server.

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer};
use clap::Parser;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{fmt, EnvFilter};

use peoplegraph_api::{config, configure_with_limit, store_data};
use peoplegraph_graph::{GraphClient, MemoryStore, PersonStore};

#[derive(Parser)]
#[command(name = "peoplegraph")]
#[command(about = "REST API for people and their relationships, backed by Neo4j")]
struct Cli {
    /// Config file prefix (default: peoplegraph).
    #[arg(short, long, default_value = "peoplegraph")]
    config: String,

    /// Override the listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Serve from an in-memory store instead of Neo4j.
    #[arg(long)]
    memory: bool,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).json().init();

    let cli = Cli::parse();
    let mut app_config = config::load(&cli.config)?;
    if let Some(port) = cli.port {
        app_config.server.port = port;
    }

    let store: Arc<dyn PersonStore> = if cli.memory {
        tracing::warn!("Serving from the in-memory store; data is lost on exit");
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(GraphClient::connect(&app_config.neo4j).await?)
    };
    store.ensure_constraints().await?;

    let server = app_config.server.clone();
    tracing::info!(host = %server.host, port = server.port, "Starting HTTP server");

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(server.cors_max_age_secs);

        App::new()
            .wrap(cors)
            .wrap(TracingLogger::default())
            .app_data(store_data(store.clone()))
            .configure(|cfg| configure_with_limit(cfg, server.max_body_bytes))
    })
    .bind((app_config.server.host.as_str(), app_config.server.port))?
    .run()
    .await?;

    Ok(())
}
