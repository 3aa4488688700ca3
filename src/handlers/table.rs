//! Route table handlers for NATS messages

use std::sync::Arc;

use anyhow::Result;
use async_nats::{Client, Subscriber};
use chrono::Weekday;
use futures::StreamExt;
use serde::Serialize;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::services::row_store::{apply_sort, RowStore, StoreError};
use crate::services::schedule::{local_weekday, weekday_from_index};
use crate::services::sorter::RowSorter;
use crate::services::table_view::{build_table_view, TableViewOptions};
use crate::types::{
    ApplySortRequest, EmptyPayload, ErrorResponse, Hub, ReorderRequest, ReorderResponse, Request,
    RowListResponse, SuccessResponse, TableViewRequest, UpdateRowRequest, ViewContext,
};

/// Table settings shared by all handlers
#[derive(Debug, Clone)]
pub struct TableSettings {
    pub hub: Hub,
    pub page_size: usize,
}

/// Weekday from a request, falling back to the local clock
pub fn resolve_weekday(index: Option<u8>) -> std::result::Result<Weekday, String> {
    match index {
        None => Ok(local_weekday()),
        Some(i) => weekday_from_index(i)
            .ok_or_else(|| format!("weekday must be between 0 (Sunday) and 6 (Saturday), got {}", i)),
    }
}

async fn publish<T: Serialize>(client: &Client, reply: async_nats::Subject, value: &T) -> Result<()> {
    let _ = client.publish(reply, serde_json::to_vec(value)?.into()).await;
    Ok(())
}

async fn publish_store_error(
    client: &Client,
    reply: async_nats::Subject,
    request_id: Uuid,
    e: &StoreError,
) -> Result<()> {
    let error = ErrorResponse::new(request_id, e.code(), e.to_string());
    let error = match e {
        StoreError::NotFound(id) | StoreError::DuplicateId(id) | StoreError::UnknownId(id) => {
            error.with_details(serde_json::json!({ "id": id }))
        }
        _ => error,
    };
    publish(client, reply, &error).await
}

/// Parse a request or answer with INVALID_REQUEST
async fn parse_request<T: serde::de::DeserializeOwned>(
    client: &Client,
    reply: &async_nats::Subject,
    payload: &[u8],
) -> Result<Option<Request<T>>> {
    match serde_json::from_slice(payload) {
        Ok(req) => Ok(Some(req)),
        Err(e) => {
            error!("Failed to parse request: {}", e);
            let error = ErrorResponse::new(Uuid::nil(), "INVALID_REQUEST", e.to_string());
            publish(client, reply.clone(), &error).await?;
            Ok(None)
        }
    }
}

/// Handle table.view messages
pub async fn handle_view(
    client: Client,
    mut subscriber: Subscriber,
    store: Arc<dyn RowStore>,
    settings: Arc<TableSettings>,
) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        debug!("Received table.view message");

        let reply = match msg.reply {
            Some(ref reply) => reply.clone(),
            None => {
                warn!("Message without reply subject");
                continue;
            }
        };

        let Some(request) = parse_request::<TableViewRequest>(&client, &reply, &msg.payload).await? else {
            continue;
        };

        let today = match resolve_weekday(request.payload.weekday) {
            Ok(day) => day,
            Err(message) => {
                let error = ErrorResponse::new(request.id, "INVALID_REQUEST", message);
                publish(&client, reply, &error).await?;
                continue;
            }
        };

        let rows = match store.list_rows().await {
            Ok(rows) => rows,
            Err(e) => {
                error!("Failed to load rows: {}", e);
                publish_store_error(&client, reply, request.id, &e).await?;
                continue;
            }
        };

        let options = TableViewOptions::from_request(&request.payload, today, settings.page_size);
        let view = build_table_view(&rows, &settings.hub, &options);
        publish(&client, reply, &SuccessResponse::new(request.id, view)).await?;
    }

    Ok(())
}

/// Handle rows.list messages
pub async fn handle_list(
    client: Client,
    mut subscriber: Subscriber,
    store: Arc<dyn RowStore>,
) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        debug!("Received rows.list message");

        let reply = match msg.reply {
            Some(ref reply) => reply.clone(),
            None => {
                warn!("Message without reply subject");
                continue;
            }
        };

        let Some(request) = parse_request::<EmptyPayload>(&client, &reply, &msg.payload).await? else {
            continue;
        };

        match store.list_rows().await {
            Ok(rows) => {
                let total = rows.len() as i64;
                let response = SuccessResponse::new(request.id, RowListResponse { items: rows, total });
                publish(&client, reply, &response).await?;
            }
            Err(e) => {
                error!("Failed to list rows: {}", e);
                publish_store_error(&client, reply, request.id, &e).await?;
            }
        }
    }

    Ok(())
}

/// Handle rows.update messages
pub async fn handle_update(
    client: Client,
    mut subscriber: Subscriber,
    store: Arc<dyn RowStore>,
) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        debug!("Received rows.update message");

        let reply = match msg.reply {
            Some(ref reply) => reply.clone(),
            None => {
                warn!("Message without reply subject");
                continue;
            }
        };

        let Some(request) = parse_request::<UpdateRowRequest>(&client, &reply, &msg.payload).await? else {
            continue;
        };

        let UpdateRowRequest { id, patch } = request.payload;
        match store.update_row(id, &patch).await {
            Ok(row) => {
                info!("Updated row {}", id);
                publish(&client, reply, &SuccessResponse::new(request.id, row)).await?;
            }
            Err(e) => {
                warn!("Failed to update row {}: {}", id, e);
                publish_store_error(&client, reply, request.id, &e).await?;
            }
        }
    }

    Ok(())
}

/// Handle rows.reorder messages (drag and drop result)
pub async fn handle_reorder(
    client: Client,
    mut subscriber: Subscriber,
    store: Arc<dyn RowStore>,
) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        debug!("Received rows.reorder message");

        let reply = match msg.reply {
            Some(ref reply) => reply.clone(),
            None => {
                warn!("Message without reply subject");
                continue;
            }
        };

        let Some(request) = parse_request::<ReorderRequest>(&client, &reply, &msg.payload).await? else {
            continue;
        };

        match store.reorder(&request.payload.ids).await {
            Ok(assignments) => {
                let response = SuccessResponse::new(request.id, ReorderResponse { assignments });
                publish(&client, reply, &response).await?;
            }
            Err(e) => {
                warn!("Reorder rejected: {}", e);
                publish_store_error(&client, reply, request.id, &e).await?;
            }
        }
    }

    Ok(())
}

/// Handle rows.sort messages: persist the order of a column sort
pub async fn handle_sort(
    client: Client,
    mut subscriber: Subscriber,
    store: Arc<dyn RowStore>,
    settings: Arc<TableSettings>,
) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        debug!("Received rows.sort message");

        let reply = match msg.reply {
            Some(ref reply) => reply.clone(),
            None => {
                warn!("Message without reply subject");
                continue;
            }
        };

        let Some(request) = parse_request::<ApplySortRequest>(&client, &reply, &msg.payload).await? else {
            continue;
        };

        let today = match resolve_weekday(request.payload.weekday) {
            Ok(day) => day,
            Err(message) => {
                let error = ErrorResponse::new(request.id, "INVALID_REQUEST", message);
                publish(&client, reply, &error).await?;
                continue;
            }
        };

        let sorter = RowSorter::new(
            today,
            ViewContext { tiered: request.payload.tiered },
            settings.hub.clone(),
        );

        match apply_sort(store.as_ref(), &sorter, request.payload.sort.as_ref()).await {
            Ok(assignments) => {
                info!("Persisted sorted order for {} rows", assignments.len());
                let response = SuccessResponse::new(request.id, ReorderResponse { assignments });
                publish(&client, reply, &response).await?;
            }
            Err(e) => {
                error!("Failed to apply sort: {}", e);
                publish_store_error(&client, reply, request.id, &e).await?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_weekday_from_index() {
        assert_eq!(resolve_weekday(Some(0)), Ok(Weekday::Sun));
        assert_eq!(resolve_weekday(Some(5)), Ok(Weekday::Fri));
        assert!(resolve_weekday(Some(9)).is_err());
    }

    #[test]
    fn test_resolve_weekday_defaults_to_clock() {
        assert!(resolve_weekday(None).is_ok());
    }
}
