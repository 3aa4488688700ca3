//! Computed table view: filter, classify, sort, measure and page a snapshot
//!
//! Everything here is a pure function of the row snapshot and the options.
//! Distances are measured over the full sorted order, not just the visible
//! page, so cumulative values stay the same when paging.

use chrono::Weekday;
use tracing::debug;

use crate::services::distance::aggregate_distances;
use crate::services::filter::RowFilter;
use crate::services::paginator::Paginator;
use crate::services::schedule::{classify, weekday_index};
use crate::services::sorter::RowSorter;
use crate::types::{default_columns, ColumnSort, Hub, Row, RowView, TableView, TableViewRequest, ViewContext};

/// Inputs of one table render
#[derive(Debug, Clone)]
pub struct TableViewOptions {
    pub today: Weekday,
    pub context: ViewContext,
    pub sort: Option<ColumnSort>,
    pub filter: RowFilter,
    pub page: usize,
    pub page_size: usize,
    pub disable_pagination: bool,
    /// Filtered row count from the previous render, if the caller has one
    pub known_row_count: Option<usize>,
}

impl TableViewOptions {
    pub fn new(today: Weekday, context: ViewContext, page_size: usize) -> Self {
        Self {
            today,
            context,
            sort: None,
            filter: RowFilter::default(),
            page: 1,
            page_size,
            disable_pagination: false,
            known_row_count: None,
        }
    }

    /// Options for a NATS view request. `page_size` is the configured default.
    pub fn from_request(request: &TableViewRequest, today: Weekday, page_size: usize) -> Self {
        Self {
            today,
            context: ViewContext { tiered: request.tiered },
            sort: request.sort.clone(),
            filter: RowFilter {
                search: request.search.clone(),
                route: request.route.clone(),
                delivery: request.delivery.clone(),
            },
            page: request.page,
            page_size: request.page_size.filter(|size| *size > 0).unwrap_or(page_size),
            disable_pagination: request.disable_pagination,
            known_row_count: request.known_row_count,
        }
    }

    fn paginator(&self) -> Paginator {
        let mut paginator = if self.disable_pagination {
            Paginator::without_pagination()
        } else {
            Paginator::new(self.page_size)
        };
        paginator.set_page(self.page);
        paginator.with_known_len(self.known_row_count)
    }
}

/// Build the table view for a row snapshot.
pub fn build_table_view(rows: &[Row], hub: &Hub, options: &TableViewOptions) -> TableView {
    let filtered = options.filter.apply(rows);

    let sorter = RowSorter::new(options.today, options.context, hub.clone());
    let ordered = sorter.sort(&filtered, options.sort.as_ref());

    let distances = aggregate_distances(&ordered, hub, hub.coordinates_in(rows));

    let mut paginator = options.paginator();
    let page_reset = paginator.observe_len(ordered.len());
    let page = paginator.slice(&ordered);

    let views: Vec<RowView> = page
        .rows
        .iter()
        .map(|row| RowView {
            tier: classify(row, options.today, options.context),
            cumulative_distance_km: distances.distance_for(&row.id),
            is_hub: hub.matches(row),
            row: row.clone(),
        })
        .collect();

    debug!(
        "Table view: {} of {} rows (filtered from {}), page {}/{}, {:.2} km",
        views.len(),
        ordered.len(),
        rows.len(),
        page.page,
        page.page_count,
        distances.total_km
    );

    TableView {
        columns: default_columns(),
        rows: views,
        page: page.page,
        page_count: page.page_count,
        page_size: if paginator.is_disabled() { ordered.len() } else { paginator.page_size() },
        total_rows: ordered.len(),
        total_distance_km: distances.total_km,
        return_leg_km: distances.return_leg_km,
        page_reset,
        weekday: weekday_index(options.today),
    }
}
