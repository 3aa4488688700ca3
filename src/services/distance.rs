//! Cumulative travel distance along the displayed row order
//!
//! Walks the rows in order, skipping the hub and rows without valid
//! coordinates, and sums Haversine legs between consecutive stops. The grand
//! total adds the closing leg from the last stop back to the hub.

use std::collections::HashMap;

use uuid::Uuid;

use crate::services::geo::haversine_distance;
use crate::types::{Coordinates, Hub, Row};

/// Distances computed for one ordering
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DistanceSummary {
    per_row: HashMap<Uuid, f64>,
    /// Last cumulative distance plus the return leg (when the hub is known)
    pub total_km: f64,
    /// Last stop back to the hub
    pub return_leg_km: Option<f64>,
    /// Rows that took part in the chain
    pub stop_count: usize,
}

impl DistanceSummary {
    /// Cumulative distance of a row; `None` when the row is not in the chain
    pub fn distance_for(&self, id: &Uuid) -> Option<f64> {
        self.per_row.get(id).copied()
    }

    /// Cumulative distance of the last stop, without the return leg
    pub fn chain_km(&self) -> f64 {
        self.total_km - self.return_leg_km.unwrap_or(0.0)
    }
}

/// Aggregate distances over `rows` in their current order.
///
/// `hub_coordinates` is the return point; when `None` the total is the last
/// cumulative distance only.
pub fn aggregate_distances(
    rows: &[Row],
    hub: &Hub,
    hub_coordinates: Option<Coordinates>,
) -> DistanceSummary {
    let mut per_row = HashMap::new();
    let mut cumulative = 0.0;
    let mut previous: Option<Coordinates> = None;

    for row in rows {
        if hub.matches(row) {
            continue;
        }
        let Some(coords) = row.coordinates() else {
            continue;
        };

        if let Some(prev) = previous {
            cumulative += haversine_distance(&prev, &coords);
        }
        per_row.insert(row.id, cumulative);
        previous = Some(coords);
    }

    let return_leg_km = match (previous, hub_coordinates.filter(Coordinates::is_valid)) {
        (Some(last), Some(hub_coords)) => Some(haversine_distance(&last, &hub_coords)),
        _ => None,
    };

    DistanceSummary {
        stop_count: per_row.len(),
        per_row,
        total_km: cumulative + return_leg_km.unwrap_or(0.0),
        return_leg_km,
    }
}

/// Display form of a distance: two decimals, or `—` when there is no value
pub fn format_distance(distance_km: Option<f64>) -> String {
    match distance_km {
        Some(km) => format!("{:.2}", km),
        None => "\u{2014}".to_string(),
    }
}
