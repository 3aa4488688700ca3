//! Row storage boundary
//!
//! The table engine reads a row snapshot and hands back explicit orderings.
//! Storage sits behind [`RowStore`] so handlers work against PostgreSQL in
//! production and an in-memory store in tests and the CLI.
//!
//! Overlapping reorders are not sequenced: the last write to land wins.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use sqlx::PgPool;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::db::queries;
use crate::db::queries::rows::ReorderOutcome;
use crate::services::sorter::RowSorter;
use crate::types::{ColumnSort, OrderAssignment, Row, RowPatch};

/// Errors surfaced by row storage
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("row {0} not found")]
    NotFound(Uuid),
    #[error("row {0} appears more than once in the new order")]
    DuplicateId(Uuid),
    #[error("row {0} is not part of the table")]
    UnknownId(Uuid),
    #[error("new order has {actual} rows, table has {expected}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("unknown delivery type: {0}")]
    InvalidDelivery(String),
    #[error("database error: {0}")]
    Database(String),
}

impl StoreError {
    /// Error code used in NATS error responses
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::NotFound(_) => "NOT_FOUND",
            StoreError::DuplicateId(_)
            | StoreError::UnknownId(_)
            | StoreError::LengthMismatch { .. } => "INVALID_REORDER",
            StoreError::InvalidDelivery(_) => "VALIDATION_ERROR",
            StoreError::Database(_) => "DATABASE_ERROR",
        }
    }
}

impl From<anyhow::Error> for StoreError {
    fn from(e: anyhow::Error) -> Self {
        StoreError::Database(format!("{:#}", e))
    }
}

/// Assign `order` values 1..N following `ids`. Rejects duplicates.
pub fn assign_order(ids: &[Uuid]) -> Result<Vec<OrderAssignment>, StoreError> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter()
        .enumerate()
        .map(|(index, id)| {
            if !seen.insert(*id) {
                return Err(StoreError::DuplicateId(*id));
            }
            Ok(OrderAssignment {
                id: *id,
                order: index as i32 + 1,
            })
        })
        .collect()
}

/// Persists a full new ordering produced by the UI (drag and drop)
#[async_trait]
pub trait ReorderPersistence: Send + Sync {
    /// Store `ids` as the new order, atomically. Returns the assigned values.
    async fn reorder(&self, ids: &[Uuid]) -> Result<Vec<OrderAssignment>, StoreError>;
}

/// Row snapshot access plus the mutations the table needs
#[async_trait]
pub trait RowStore: ReorderPersistence {
    /// All rows in persisted order
    async fn list_rows(&self) -> Result<Vec<Row>, StoreError>;

    /// Apply a partial update and return the updated row
    async fn update_row(&self, id: Uuid, patch: &RowPatch) -> Result<Row, StoreError>;

    /// Store name for logging
    fn name(&self) -> &str;
}

/// Persist the order produced by an explicit column sort.
pub async fn apply_sort(
    store: &dyn RowStore,
    sorter: &RowSorter,
    column_sort: Option<&ColumnSort>,
) -> Result<Vec<OrderAssignment>, StoreError> {
    let rows = store.list_rows().await?;
    let ids = sorter.sorted_ids(&rows, column_sort);
    debug!(
        "Applying sort {:?} to {} rows via {}",
        column_sort.map(|s| s.key.as_str()),
        ids.len(),
        store.name()
    );
    store.reorder(&ids).await
}

fn check_patch(patch: &RowPatch) -> Result<(), StoreError> {
    match patch.invalid_delivery() {
        Some(delivery) => Err(StoreError::InvalidDelivery(delivery.to_string())),
        None => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// Row store held in memory, kept sorted by `order`
#[derive(Clone, Default)]
pub struct InMemoryRowStore {
    rows: Arc<RwLock<Vec<Row>>>,
}

impl InMemoryRowStore {
    pub fn new(mut rows: Vec<Row>) -> Self {
        rows.sort_by_key(|row| row.order);
        Self {
            rows: Arc::new(RwLock::new(rows)),
        }
    }

    pub fn snapshot(&self) -> Vec<Row> {
        self.rows.read().clone()
    }
}

#[async_trait]
impl ReorderPersistence for InMemoryRowStore {
    async fn reorder(&self, ids: &[Uuid]) -> Result<Vec<OrderAssignment>, StoreError> {
        let assignments = assign_order(ids)?;

        let mut rows = self.rows.write();
        if assignments.len() != rows.len() {
            return Err(StoreError::LengthMismatch {
                expected: rows.len(),
                actual: assignments.len(),
            });
        }
        if let Some(unknown) = assignments
            .iter()
            .find(|a| !rows.iter().any(|row| row.id == a.id))
        {
            return Err(StoreError::UnknownId(unknown.id));
        }

        for assignment in &assignments {
            if let Some(row) = rows.iter_mut().find(|row| row.id == assignment.id) {
                row.order = assignment.order;
            }
        }
        rows.sort_by_key(|row| row.order);

        Ok(assignments)
    }
}

#[async_trait]
impl RowStore for InMemoryRowStore {
    async fn list_rows(&self) -> Result<Vec<Row>, StoreError> {
        Ok(self.snapshot())
    }

    async fn update_row(&self, id: Uuid, patch: &RowPatch) -> Result<Row, StoreError> {
        check_patch(patch)?;
        let mut rows = self.rows.write();
        let row = rows
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or(StoreError::NotFound(id))?;
        patch.apply(row);
        Ok(row.clone())
    }

    fn name(&self) -> &str {
        "InMemory"
    }
}

// ---------------------------------------------------------------------------
// PostgreSQL store
// ---------------------------------------------------------------------------

/// Row store backed by the `route_rows` table
#[derive(Clone)]
pub struct PgRowStore {
    pool: PgPool,
}

impl PgRowStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReorderPersistence for PgRowStore {
    async fn reorder(&self, ids: &[Uuid]) -> Result<Vec<OrderAssignment>, StoreError> {
        let assignments = assign_order(ids)?;

        match queries::rows::reorder_rows(&self.pool, &assignments).await? {
            ReorderOutcome::Applied => {
                info!("Persisted new order for {} rows", assignments.len());
                Ok(assignments)
            }
            ReorderOutcome::UnknownId(id) => Err(StoreError::UnknownId(id)),
            ReorderOutcome::LengthMismatch { expected, actual } => {
                Err(StoreError::LengthMismatch { expected, actual })
            }
        }
    }
}

#[async_trait]
impl RowStore for PgRowStore {
    async fn list_rows(&self) -> Result<Vec<Row>, StoreError> {
        Ok(queries::rows::list_rows(&self.pool).await?)
    }

    async fn update_row(&self, id: Uuid, patch: &RowPatch) -> Result<Row, StoreError> {
        check_patch(patch)?;
        queries::rows::update_row(&self.pool, id, patch)
            .await?
            .ok_or(StoreError::NotFound(id))
    }

    fn name(&self) -> &str {
        "Postgres"
    }
}
