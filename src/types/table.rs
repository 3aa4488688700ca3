//! Table view and row mutation messages

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Column, ColumnSort, Row, RowPatch, Tier};

fn default_page() -> usize {
    1
}

/// Request for a computed table view
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableViewRequest {
    /// Day of week, 0 = Sunday .. 6 = Saturday. Local clock when absent.
    #[serde(default)]
    pub weekday: Option<u8>,
    #[serde(default)]
    pub tiered: bool,
    #[serde(default)]
    pub sort: Option<ColumnSort>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub route: Option<String>,
    #[serde(default)]
    pub delivery: Option<String>,
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default)]
    pub page_size: Option<usize>,
    #[serde(default)]
    pub disable_pagination: bool,
    /// Row count the client last rendered; a different count resets the page
    #[serde(default)]
    pub known_row_count: Option<usize>,
}

/// A row together with its computed view model
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowView {
    #[serde(flatten)]
    pub row: Row,
    pub tier: Tier,
    /// Cumulative distance along the displayed order; `None` without coordinates
    pub cumulative_distance_km: Option<f64>,
    pub is_hub: bool,
}

/// Computed table view
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableView {
    pub columns: Vec<Column>,
    pub rows: Vec<RowView>,
    pub page: usize,
    pub page_count: usize,
    pub page_size: usize,
    /// Row count after filtering (all pages)
    pub total_rows: usize,
    pub total_distance_km: f64,
    pub return_leg_km: Option<f64>,
    /// Page was reset to 1 because the filtered row count changed
    pub page_reset: bool,
    pub weekday: u8,
}

/// Row list response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowListResponse {
    pub items: Vec<Row>,
    pub total: i64,
}

/// Update a single row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRowRequest {
    pub id: Uuid,
    #[serde(flatten)]
    pub patch: RowPatch,
}

/// New ordering produced by drag and drop
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderRequest {
    pub ids: Vec<Uuid>,
}

/// Persist the order produced by a column sort
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplySortRequest {
    #[serde(default)]
    pub weekday: Option<u8>,
    #[serde(default)]
    pub tiered: bool,
    #[serde(default)]
    pub sort: Option<ColumnSort>,
}

/// A persisted `order` value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderAssignment {
    pub id: Uuid,
    pub order: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderResponse {
    pub assignments: Vec<OrderAssignment>,
}
