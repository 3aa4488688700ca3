//! Table column catalogue and sort descriptors

use serde::{Deserialize, Serialize};

/// Column value type (drives display, edit widget and comparison)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Text,
    Number,
    Currency,
    Select,
    Textarea,
}

/// A column of the route table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub data_key: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    pub sort_order: i32,
}

impl Column {
    fn new(data_key: &str, column_type: ColumnType, sort_order: i32) -> Self {
        Self {
            data_key: data_key.to_string(),
            column_type,
            sort_order,
        }
    }
}

/// Columns shown by default, in display order
pub fn default_columns() -> Vec<Column> {
    vec![
        Column::new("order", ColumnType::Number, 1),
        Column::new("route", ColumnType::Text, 2),
        Column::new("code", ColumnType::Text, 3),
        Column::new("location", ColumnType::Text, 4),
        Column::new("delivery", ColumnType::Select, 5),
        Column::new("kilometer", ColumnType::Number, 6),
        Column::new("deliveryAlt", ColumnType::Select, 7),
    ]
}

/// How a column key is compared when sorting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKind {
    /// Leading-number parse, non-numeric values count as 0
    Numeric,
    /// Locale-style, case-insensitive string compare
    Text,
}

/// Comparison kind for a column key. Unknown keys compare as text.
pub fn sort_kind(data_key: &str) -> SortKind {
    match data_key {
        "code" | "kilometer" | "order" | "no" => SortKind::Numeric,
        _ => SortKind::Text,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn apply(self, ordering: std::cmp::Ordering) -> std::cmp::Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// User-chosen column sort
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSort {
    pub key: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl ColumnSort {
    pub fn new(key: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            key: key.into(),
            direction,
        }
    }
}

impl std::str::FromStr for ColumnSort {
    type Err = String;

    /// Parses `key`, `key:asc` or `key:desc`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, direction) = match s.split_once(':') {
            Some((key, dir)) => {
                let direction = match dir.trim().to_ascii_lowercase().as_str() {
                    "asc" => SortDirection::Asc,
                    "desc" => SortDirection::Desc,
                    other => return Err(format!("unknown sort direction: {}", other)),
                };
                (key, direction)
            }
            None => (s, SortDirection::Asc),
        };
        let key = key.trim();
        if key.is_empty() {
            return Err("sort key must not be empty".to_string());
        }
        Ok(Self::new(key, direction))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_kind_for_known_keys() {
        assert_eq!(sort_kind("code"), SortKind::Numeric);
        assert_eq!(sort_kind("kilometer"), SortKind::Numeric);
        assert_eq!(sort_kind("order"), SortKind::Numeric);
        assert_eq!(sort_kind("route"), SortKind::Text);
        assert_eq!(sort_kind("somethingElse"), SortKind::Text);
    }

    #[test]
    fn test_column_sort_parse() {
        let sort: ColumnSort = "code:desc".parse().unwrap();
        assert_eq!(sort, ColumnSort::new("code", SortDirection::Desc));

        let sort: ColumnSort = "route".parse().unwrap();
        assert_eq!(sort.direction, SortDirection::Asc);

        assert!("code:sideways".parse::<ColumnSort>().is_err());
        assert!(":asc".parse::<ColumnSort>().is_err());
    }

    #[test]
    fn test_column_serializes_type_field() {
        let json = serde_json::to_string(&default_columns()[0]).unwrap();
        assert!(json.contains("\"dataKey\":\"order\""));
        assert!(json.contains("\"type\":\"number\""));
        assert!(json.contains("\"sortOrder\":1"));
    }
}
