//! NATS message handlers

pub mod ping;
pub mod table;

use std::sync::Arc;

use anyhow::Result;
use async_nats::Client;
use tokio::select;
use tracing::{error, info};

use crate::services::row_store::RowStore;

pub use table::TableSettings;

/// Start all message handlers
pub async fn start_handlers(
    client: Client,
    store: Arc<dyn RowStore>,
    settings: TableSettings,
) -> Result<()> {
    info!("Starting message handlers...");
    info!("Row store: {}, hub location: {:?}", store.name(), settings.hub.location);

    let settings = Arc::new(settings);

    let ping_sub = client.subscribe("routetable.ping").await?;
    let view_sub = client.subscribe("routetable.table.view").await?;
    let list_sub = client.subscribe("routetable.rows.list").await?;
    let update_sub = client.subscribe("routetable.rows.update").await?;
    let reorder_sub = client.subscribe("routetable.rows.reorder").await?;
    let sort_sub = client.subscribe("routetable.rows.sort").await?;

    info!("Subscribed to NATS subjects");

    let ping_handle = tokio::spawn(ping::handle_ping(client.clone(), ping_sub, store.clone()));
    let view_handle = tokio::spawn(table::handle_view(
        client.clone(),
        view_sub,
        store.clone(),
        settings.clone(),
    ));
    let list_handle = tokio::spawn(table::handle_list(client.clone(), list_sub, store.clone()));
    let update_handle = tokio::spawn(table::handle_update(client.clone(), update_sub, store.clone()));
    let reorder_handle = tokio::spawn(table::handle_reorder(client.clone(), reorder_sub, store.clone()));
    let sort_handle = tokio::spawn(table::handle_sort(client, sort_sub, store, settings));

    info!("All handlers started, waiting for messages...");

    // Any handler exiting means its subscription is gone
    select! {
        result = ping_handle => log_handler_exit("ping", result),
        result = view_handle => log_handler_exit("table.view", result),
        result = list_handle => log_handler_exit("rows.list", result),
        result = update_handle => log_handler_exit("rows.update", result),
        result = reorder_handle => log_handler_exit("rows.reorder", result),
        result = sort_handle => log_handler_exit("rows.sort", result),
    }

    Ok(())
}

fn log_handler_exit(name: &str, result: std::result::Result<Result<()>, tokio::task::JoinError>) {
    match result {
        Ok(Ok(())) => info!("Handler {} finished", name),
        Ok(Err(e)) => error!("Handler {} failed: {}", name, e),
        Err(e) => error!("Handler {} panicked: {}", name, e),
    }
}
