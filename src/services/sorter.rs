//! Row ordering: tier grouping, column sort and hub pinning
//!
//! The displayed order is built in three passes:
//! 1. rows are grouped by schedule tier (`on-schedule`, `off-schedule`,
//!    `inactive`; only active/inactive in the plain view),
//! 2. inside a group, rows are ordered by the chosen column, or keep their
//!    input order when no column sort is set,
//! 3. the hub row, when present and not inactive, is moved to the top.
//!
//! The sort is stable: equal keys keep their input order. Together with the
//! pin pass this makes sorting idempotent.

use std::borrow::Cow;
use std::cmp::Ordering;

use chrono::Weekday;

use crate::services::schedule::classify;
use crate::types::{sort_kind, ColumnSort, Hub, Row, SortKind, Tier, ViewContext};

/// Sorts rows for one render: fixed weekday, view context and hub.
#[derive(Debug, Clone)]
pub struct RowSorter {
    pub today: Weekday,
    pub context: ViewContext,
    pub hub: Hub,
}

impl RowSorter {
    pub fn new(today: Weekday, context: ViewContext, hub: Hub) -> Self {
        Self { today, context, hub }
    }

    /// Displayed order of `rows`. Never touches the persisted `order` field.
    pub fn sort(&self, rows: &[Row], column_sort: Option<&ColumnSort>) -> Vec<Row> {
        let mut keyed: Vec<(Tier, &Row)> = rows
            .iter()
            .map(|row| (classify(row, self.today, self.context), row))
            .collect();

        // `sort_by` is stable, ties keep input order
        keyed.sort_by(|(tier_a, a), (tier_b, b)| {
            tier_a.cmp(tier_b).then_with(|| match column_sort {
                Some(sort) => sort.direction.apply(compare_by_column(a, b, &sort.key)),
                None => Ordering::Equal,
            })
        });

        let hub_index = keyed
            .iter()
            .position(|(tier, row)| *tier != Tier::Inactive && self.hub.matches(row));
        if let Some(index) = hub_index {
            let hub = keyed.remove(index);
            keyed.insert(0, hub);
        }

        keyed.into_iter().map(|(_, row)| row.clone()).collect()
    }

    /// Ids in displayed order
    pub fn sorted_ids(&self, rows: &[Row], column_sort: Option<&ColumnSort>) -> Vec<uuid::Uuid> {
        self.sort(rows, column_sort).iter().map(|row| row.id).collect()
    }
}

/// Compare two rows by a column key, ascending.
pub fn compare_by_column(a: &Row, b: &Row, data_key: &str) -> Ordering {
    let left = column_value(a, data_key);
    let right = column_value(b, data_key);
    match sort_kind(data_key) {
        SortKind::Numeric => parse_numeric(&left).total_cmp(&parse_numeric(&right)),
        SortKind::Text => locale_compare(&left, &right),
    }
}

/// Raw display value of a column
fn column_value<'a>(row: &'a Row, data_key: &str) -> Cow<'a, str> {
    match data_key {
        "order" | "no" => Cow::Owned(row.order.to_string()),
        "route" => Cow::Borrowed(row.route.as_str()),
        "code" => Cow::Borrowed(row.code.as_str()),
        "location" => Cow::Borrowed(row.location.as_str()),
        "delivery" => Cow::Borrowed(row.delivery.as_str()),
        "kilometer" => Cow::Borrowed(row.kilometer.as_str()),
        "deliveryAlt" => Cow::Borrowed(row.delivery_alt.as_str()),
        _ => Cow::Borrowed(""),
    }
}

/// Parse the leading number of a value (`"12.5 km"` is 12.5, `"1e3"` is 1000).
/// Values without a leading number count as 0.
pub fn parse_numeric(value: &str) -> f64 {
    let s = value.trim_start();
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let int_start = end;
    end = digits_from(end);
    let mut mantissa_digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_end = digits_from(end + 1);
        mantissa_digits += frac_end - end - 1;
        end = frac_end;
    }
    if mantissa_digits == 0 {
        return 0.0;
    }

    // Exponent only counts when it has digits ("2e" is 2)
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp = end + 1;
        if exp < bytes.len() && matches!(bytes[exp], b'+' | b'-') {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().unwrap_or(0.0)
}

/// Base letter of an accented Latin-1 letter, so "é" collates with "e".
/// Letters outside Latin-1 compare by code point.
fn fold_accent(c: char) -> char {
    match c {
        'à'..='å' => 'a',
        'ç' => 'c',
        'è'..='ë' => 'e',
        'ì'..='ï' => 'i',
        'ñ' => 'n',
        'ò'..='ö' | 'ø' => 'o',
        'ù'..='ü' => 'u',
        'ý' | 'ÿ' => 'y',
        _ => c,
    }
}

/// Locale-style compare: base letters first, then accents (unaccented
/// first), then case (lowercase first).
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    let (la, lb) = (a.to_lowercase(), b.to_lowercase());
    la.chars()
        .map(fold_accent)
        .cmp(lb.chars().map(fold_accent))
        .then_with(|| la.cmp(&lb))
        .then_with(|| b.cmp(a))
}
