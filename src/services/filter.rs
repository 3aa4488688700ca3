//! Row filtering for search and route/delivery pickers

use crate::types::Row;

/// Row filter; empty or blank fields match everything
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowFilter {
    /// Case-insensitive substring over route, code, location and delivery
    pub search: Option<String>,
    /// Exact route, case-insensitive
    pub route: Option<String>,
    /// Exact delivery type, case-insensitive
    pub delivery: Option<String>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl RowFilter {
    pub fn is_empty(&self) -> bool {
        non_blank(&self.search).is_none()
            && non_blank(&self.route).is_none()
            && non_blank(&self.delivery).is_none()
    }

    pub fn matches(&self, row: &Row) -> bool {
        if let Some(route) = non_blank(&self.route) {
            if !row.route.trim().eq_ignore_ascii_case(route) {
                return false;
            }
        }
        if let Some(delivery) = non_blank(&self.delivery) {
            if !row.delivery.trim().eq_ignore_ascii_case(delivery) {
                return false;
            }
        }
        if let Some(search) = non_blank(&self.search) {
            let needle = search.to_lowercase();
            return [&row.route, &row.code, &row.location, &row.delivery]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle));
        }
        true
    }

    /// Matching rows, input order kept
    pub fn apply(&self, rows: &[Row]) -> Vec<Row> {
        if self.is_empty() {
            return rows.to_vec();
        }
        rows.iter().filter(|row| self.matches(row)).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DeliveryAlt;
    use uuid::Uuid;

    fn row(route: &str, code: &str, location: &str, delivery: &str) -> Row {
        Row {
            id: Uuid::new_v4(),
            order: 1,
            route: route.to_string(),
            code: code.to_string(),
            location: location.to_string(),
            delivery: delivery.to_string(),
            delivery_alt: DeliveryAlt::Normal,
            active: true,
            latitude: None,
            longitude: None,
            kilometer: String::new(),
        }
    }

    #[test]
    fn test_empty_filter_keeps_all() {
        let rows = vec![row("R1", "1", "A", "Daily"), row("R2", "2", "B", "Weekday")];
        let filter = RowFilter {
            search: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&rows), rows);
    }

    #[test]
    fn test_search_matches_any_text_field() {
        let rows = vec![
            row("R1", "101", "Pasar Seni", "Daily"),
            row("R2", "202", "Bangsar", "Weekday"),
            row("R3", "303", "Cheras", "Alt 1"),
        ];
        let filter = RowFilter {
            search: Some("bang".to_string()),
            ..Default::default()
        };
        let found = filter.apply(&rows);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].location, "Bangsar");

        let filter = RowFilter {
            search: Some("weekDAY".to_string()),
            ..Default::default()
        };
        assert_eq!(filter.apply(&rows)[0].route, "R2");

        let filter = RowFilter {
            search: Some("30".to_string()),
            ..Default::default()
        };
        assert_eq!(filter.apply(&rows)[0].code, "303");
    }

    #[test]
    fn test_route_and_delivery_are_exact() {
        let rows = vec![
            row("R1", "1", "A", "Daily"),
            row("R10", "2", "B", "Daily"),
            row("r1", "3", "C", "Weekday"),
        ];
        let filter = RowFilter {
            route: Some("R1".to_string()),
            ..Default::default()
        };
        let codes: Vec<String> = filter.apply(&rows).into_iter().map(|r| r.code).collect();
        assert_eq!(codes, vec!["1", "3"]);

        let filter = RowFilter {
            route: Some("R1".to_string()),
            delivery: Some("daily".to_string()),
            ..Default::default()
        };
        let codes: Vec<String> = filter.apply(&rows).into_iter().map(|r| r.code).collect();
        assert_eq!(codes, vec!["1"]);
    }
}
