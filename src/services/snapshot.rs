//! Row snapshots from CSV and plain-text rendering of a table view

use std::fmt::Write as _;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

use crate::services::distance::format_distance;
use crate::types::{Row, TableView};

/// Read rows from CSV with a header line. Column names follow the JSON
/// field names (`id`, `order` or `no`, `route`, `code`, `location`,
/// `delivery`, `deliveryAlt`, `active`, `latitude`, `longitude`, `kilometer`).
pub fn read_rows_csv<R: Read>(reader: R) -> Result<Vec<Row>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (index, record) in csv_reader.deserialize::<Row>().enumerate() {
        // +2: header line and 1-based numbering
        let row = record.with_context(|| format!("Invalid row on line {}", index + 2))?;
        rows.push(row);
    }
    rows.sort_by_key(|row| row.order);
    Ok(rows)
}

/// Read rows from a CSV file
pub fn load_rows_csv(path: &Path) -> Result<Vec<Row>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Cannot open {}", path.display()))?;
    read_rows_csv(file)
}

/// Plain-text table for terminal output
pub fn render_table(view: &TableView) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<4} {:<8} {:<8} {:<28} {:<10} {:<9} {:<13} {:>10}",
        "No", "Route", "Code", "Location", "Delivery", "Alt", "Tier", "Km"
    );
    for view_row in &view.rows {
        let row = &view_row.row;
        let location = if view_row.is_hub {
            format!("* {}", row.location)
        } else {
            row.location.clone()
        };
        let _ = writeln!(
            out,
            "{:<4} {:<8} {:<8} {:<28} {:<10} {:<9} {:<13} {:>10}",
            row.order,
            row.route,
            row.code,
            location,
            row.delivery,
            row.delivery_alt.as_str(),
            view_row.tier.as_str(),
            format_distance(view_row.cumulative_distance_km)
        );
    }
    let _ = writeln!(
        out,
        "Page {}/{} - {} rows - total {} km (return leg {} km)",
        view.page,
        view.page_count,
        view.total_rows,
        format_distance(Some(view.total_distance_km)),
        format_distance(view.return_leg_km)
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::table_view::{build_table_view, TableViewOptions};
    use crate::types::{DeliveryAlt, Hub, ViewContext};
    use chrono::Weekday;

    const CSV: &str = "\
id,no,route,code,location,delivery,deliveryAlt,active,latitude,longitude,kilometer
00000000-0000-0000-0000-000000000002,2,R1,20,Stop B,Daily,alt1,true,3.1500,101.7000,
00000000-0000-0000-0000-000000000001,1,R1,10,Depot,Daily,normal,true,3.1200,101.6800,
00000000-0000-0000-0000-000000000003,3,R1,30,Stop C,Weekday,bogus,false,,,12 km
";

    #[test]
    fn test_read_rows_csv() {
        let rows = read_rows_csv(CSV.as_bytes()).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].location, "Depot");
        assert_eq!(rows[1].delivery_alt, DeliveryAlt::Alt1);
        assert_eq!(rows[2].delivery_alt, DeliveryAlt::Normal);
        assert!(!rows[2].active);
        assert!(rows[2].latitude.is_none());
        assert_eq!(rows[2].kilometer, "12 km");
    }

    #[test]
    fn test_read_rows_csv_reports_line() {
        let bad = "id,no\nnot-a-uuid,1\n";
        let err = read_rows_csv(bad.as_bytes()).unwrap_err();
        assert!(format!("{:#}", err).contains("line 2"));
    }

    #[test]
    fn test_render_table_marks_hub_and_missing_distance() {
        let rows = read_rows_csv(CSV.as_bytes()).unwrap();
        let options = TableViewOptions::new(Weekday::Mon, ViewContext::TIERED, 10);
        let view = build_table_view(&rows, &Hub::new("Depot"), &options);
        let text = render_table(&view);

        assert!(text.contains("* Depot"));
        assert!(text.contains("—"));
        assert!(text.contains("Page 1/1 - 3 rows"));
    }
}
