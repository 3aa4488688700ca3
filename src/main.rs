//! Route table worker - backend service for the delivery route table
//!
//! This worker connects to NATS and handles messages from the frontend.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use route_table_worker::cli::{Cli, Command};
use route_table_worker::config::Config;
use route_table_worker::db;
use route_table_worker::handlers::{self, TableSettings};
use route_table_worker::services::row_store::{PgRowStore, RowStore};
use route_table_worker::services::schedule::{local_weekday, weekday_from_index};
use route_table_worker::services::snapshot::{load_rows_csv, render_table};
use route_table_worker::services::table_view::{build_table_view, TableViewOptions};
use route_table_worker::types::ViewContext;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs directory - use LOGS_DIR env var or default to ../logs (relative to worker)
    let logs_dir = std::env::var("LOGS_DIR")
        .unwrap_or_else(|_| "../logs".to_string());
    std::fs::create_dir_all(&logs_dir).ok();

    // File appender for persistent logs (daily rotation)
    let file_appender = RollingFileAppender::new(
        Rotation::DAILY,
        &logs_dir,
        "route-table-worker.log",
    );
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    // Initialize logging - both stdout and file
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,route_table_worker=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))  // stderr, keeps `view` output clean
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking).with_ansi(false))  // file
        .init();

    let config = Config::from_env()?;
    info!("Configuration loaded");

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::Migrate => {
            let pool = db::create_pool(config.require_database_url()?).await?;
            db::run_migrations(&pool).await
        }
        Command::View { rows, weekday, tiered, sort, search, page, page_size, all } => {
            let snapshot = load_rows_csv(&rows)?;
            let today = weekday.and_then(weekday_from_index).unwrap_or_else(local_weekday);

            let mut options = TableViewOptions::new(
                today,
                ViewContext { tiered },
                page_size.filter(|size| *size > 0).unwrap_or(config.page_size),
            );
            options.sort = sort;
            options.filter.search = search;
            options.page = page;
            options.disable_pagination = all;

            let view = build_table_view(&snapshot, &config.hub(), &options);
            print!("{}", render_table(&view));
            Ok(())
        }
    }
}

async fn serve(config: Config) -> Result<()> {
    info!("Starting route table worker...");

    let pool = db::create_pool(config.require_database_url()?).await?;
    info!("Connected to PostgreSQL");

    db::run_migrations(&pool).await?;

    // Connect to NATS (supports optional NATS_USER/NATS_PASSWORD auth).
    let nats_client = match (std::env::var("NATS_USER"), std::env::var("NATS_PASSWORD")) {
        (Ok(user), Ok(password)) if !user.is_empty() => {
            async_nats::ConnectOptions::new()
                .user_and_password(user, password)
                .connect(&config.nats_url)
                .await?
        }
        _ => async_nats::connect(&config.nats_url).await?,
    };
    info!("Connected to NATS at {}", config.nats_url);

    let store: Arc<dyn RowStore> = Arc::new(PgRowStore::new(pool));
    let settings = TableSettings {
        hub: config.hub(),
        page_size: config.page_size,
    };

    if let Err(e) = handlers::start_handlers(nats_client, store, settings).await {
        error!("Handler error: {}", e);
        return Err(e);
    }

    Ok(())
}
