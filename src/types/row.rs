//! Route row types (one row per delivery stop)

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Delivery types offered in the `delivery` column
pub const DELIVERY_TYPES: &[&str] = &["Daily", "Weekday", "Alt 1", "Alt 2"];

/// Delivery type that is skipped on Friday and Saturday in tiered views
pub const WEEKDAY_DELIVERY: &str = "Weekday";

/// Geographic coordinates in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Finite and inside the latitude/longitude ranges
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

/// Alternate-day delivery state of a row
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum DeliveryAlt {
    #[default]
    Normal,
    Alt1,
    Alt2,
    Inactive,
}

impl DeliveryAlt {
    pub const fn as_str(self) -> &'static str {
        match self {
            DeliveryAlt::Normal => "normal",
            DeliveryAlt::Alt1 => "alt1",
            DeliveryAlt::Alt2 => "alt2",
            DeliveryAlt::Inactive => "inactive",
        }
    }

    /// Parse a stored value. Anything unrecognised counts as `normal`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "alt1" => DeliveryAlt::Alt1,
            "alt2" => DeliveryAlt::Alt2,
            "inactive" => DeliveryAlt::Inactive,
            _ => DeliveryAlt::Normal,
        }
    }
}

impl From<String> for DeliveryAlt {
    fn from(value: String) -> Self {
        DeliveryAlt::parse(&value)
    }
}

/// A delivery stop as shown in the route table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    pub id: Uuid,
    /// Persisted position (`no` column)
    #[serde(alias = "no")]
    pub order: i32,
    #[serde(default)]
    pub route: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub delivery: String,
    #[serde(default)]
    pub delivery_alt: DeliveryAlt,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    /// Free-form kilometer note kept with the row
    #[serde(default)]
    pub kilometer: String,
}

fn default_active() -> bool {
    true
}

impl Row {
    /// Coordinates, if both parts are present and valid
    pub fn coordinates(&self) -> Option<Coordinates> {
        let coords = Coordinates::new(self.latitude?, self.longitude?);
        coords.is_valid().then_some(coords)
    }

    /// Whether this row is the hub identified by `hub_location`
    pub fn is_hub(&self, hub_location: &str) -> bool {
        let hub = hub_location.trim();
        !hub.is_empty() && self.location.trim().eq_ignore_ascii_case(hub)
    }
}

/// The fixed anchor location (depot) of the route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hub {
    /// `location` value identifying the hub row
    pub location: String,
    /// Used when the hub row is missing or has no coordinates
    pub fallback_coordinates: Option<Coordinates>,
}

impl Hub {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            fallback_coordinates: None,
        }
    }

    pub fn with_fallback(mut self, coordinates: Coordinates) -> Self {
        self.fallback_coordinates = Some(coordinates);
        self
    }

    pub fn matches(&self, row: &Row) -> bool {
        row.is_hub(&self.location)
    }

    /// Hub coordinates: the hub row's own, then the configured fallback
    pub fn coordinates_in(&self, rows: &[Row]) -> Option<Coordinates> {
        rows.iter()
            .find(|row| self.matches(row))
            .and_then(Row::coordinates)
            .or(self.fallback_coordinates.filter(Coordinates::is_valid))
    }
}

/// Database shape of a row; `delivery_alt` is stored as text
#[derive(Debug, Clone, FromRow)]
pub struct RowRecord {
    pub id: Uuid,
    pub sort_order: i32,
    pub route: String,
    pub code: String,
    pub location: String,
    pub delivery: String,
    pub delivery_alt: String,
    pub active: bool,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub kilometer: String,
}

impl From<RowRecord> for Row {
    fn from(record: RowRecord) -> Self {
        Self {
            id: record.id,
            order: record.sort_order,
            route: record.route,
            code: record.code,
            location: record.location,
            delivery: record.delivery,
            delivery_alt: DeliveryAlt::parse(&record.delivery_alt),
            active: record.active,
            latitude: record.latitude,
            longitude: record.longitude,
            kilometer: record.kilometer,
        }
    }
}

/// Partial update of a row; absent fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowPatch {
    pub route: Option<String>,
    pub code: Option<String>,
    pub location: Option<String>,
    pub delivery: Option<String>,
    pub delivery_alt: Option<DeliveryAlt>,
    pub active: Option<bool>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub kilometer: Option<String>,
    /// Drop stored coordinates; `latitude`/`longitude` in the same patch still apply
    #[serde(default)]
    pub clear_coordinates: bool,
}

impl RowPatch {
    /// Delivery value outside [`DELIVERY_TYPES`], if any
    pub fn invalid_delivery(&self) -> Option<&str> {
        self.delivery
            .as_deref()
            .filter(|d| !DELIVERY_TYPES.contains(d))
    }

    /// Apply the patch in place
    pub fn apply(&self, row: &mut Row) {
        if let Some(ref route) = self.route {
            row.route = route.clone();
        }
        if let Some(ref code) = self.code {
            row.code = code.clone();
        }
        if let Some(ref location) = self.location {
            row.location = location.clone();
        }
        if let Some(ref delivery) = self.delivery {
            row.delivery = delivery.clone();
        }
        if let Some(delivery_alt) = self.delivery_alt {
            row.delivery_alt = delivery_alt;
        }
        if let Some(active) = self.active {
            row.active = active;
        }
        if self.clear_coordinates {
            row.latitude = None;
            row.longitude = None;
        }
        if let Some(latitude) = self.latitude {
            row.latitude = Some(latitude);
        }
        if let Some(longitude) = self.longitude {
            row.longitude = Some(longitude);
        }
        if let Some(ref kilometer) = self.kilometer {
            row.kilometer = kilometer.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delivery_alt_unknown_defaults_to_normal() {
        assert_eq!(DeliveryAlt::parse("weekly"), DeliveryAlt::Normal);
        assert_eq!(DeliveryAlt::parse(""), DeliveryAlt::Normal);
        assert_eq!(DeliveryAlt::parse(" ALT2 "), DeliveryAlt::Alt2);
    }

    #[test]
    fn test_row_deserialize_with_unknown_delivery_alt() {
        let json = r#"{
            "id": "00000000-0000-0000-0000-000000000001",
            "no": 4,
            "location": "Shop A",
            "deliveryAlt": "sometimes"
        }"#;
        let row: Row = serde_json::from_str(json).unwrap();
        assert_eq!(row.order, 4);
        assert_eq!(row.delivery_alt, DeliveryAlt::Normal);
        assert!(row.active);
        assert!(row.latitude.is_none());
    }

    #[test]
    fn test_row_serializes_camel_case() {
        let row = Row {
            id: Uuid::nil(),
            order: 1,
            route: "R1".to_string(),
            code: "10".to_string(),
            location: "Shop".to_string(),
            delivery: "Daily".to_string(),
            delivery_alt: DeliveryAlt::Alt1,
            active: true,
            latitude: Some(3.1),
            longitude: Some(101.6),
            kilometer: String::new(),
        };
        let json = serde_json::to_string(&row).unwrap();
        assert!(json.contains("\"deliveryAlt\":\"alt1\""));
        assert!(json.contains("\"order\":1"));
    }

    #[test]
    fn test_coordinates_validity() {
        let row = Row {
            id: Uuid::nil(),
            order: 1,
            route: String::new(),
            code: String::new(),
            location: String::new(),
            delivery: String::new(),
            delivery_alt: DeliveryAlt::Normal,
            active: true,
            latitude: Some(95.0),
            longitude: Some(101.0),
            kilometer: String::new(),
        };
        assert!(row.coordinates().is_none());

        let row = Row { latitude: Some(f64::NAN), ..row };
        assert!(row.coordinates().is_none());

        let row = Row { latitude: Some(3.0), longitude: None, ..row };
        assert!(row.coordinates().is_none());
    }

    #[test]
    fn test_is_hub_matches_trimmed_case_insensitive() {
        let row = Row {
            id: Uuid::nil(),
            order: 1,
            route: String::new(),
            code: String::new(),
            location: "  Central Kitchen ".to_string(),
            delivery: String::new(),
            delivery_alt: DeliveryAlt::Normal,
            active: true,
            latitude: None,
            longitude: None,
            kilometer: String::new(),
        };
        assert!(row.is_hub("central kitchen"));
        assert!(!row.is_hub("Kitchen"));
        assert!(!row.is_hub(""));
    }

    #[test]
    fn test_patch_rejects_unknown_delivery() {
        let patch = RowPatch {
            delivery: Some("Monthly".to_string()),
            ..Default::default()
        };
        assert_eq!(patch.invalid_delivery(), Some("Monthly"));

        let patch = RowPatch {
            delivery: Some("Weekday".to_string()),
            ..Default::default()
        };
        assert!(patch.invalid_delivery().is_none());
    }

    #[test]
    fn test_patch_clears_coordinates() {
        let mut row = Row {
            id: Uuid::nil(),
            order: 1,
            route: "R1".to_string(),
            code: "7".to_string(),
            location: "Shop".to_string(),
            delivery: "Daily".to_string(),
            delivery_alt: DeliveryAlt::Normal,
            active: true,
            latitude: Some(3.1),
            longitude: Some(101.6),
            kilometer: String::new(),
        };

        let patch: RowPatch = serde_json::from_str(r#"{"clearCoordinates": true}"#).unwrap();
        patch.apply(&mut row);
        assert!(row.latitude.is_none());
        assert!(row.longitude.is_none());
        assert!(row.coordinates().is_none());

        let patch: RowPatch = serde_json::from_str(r#"{"active": false}"#).unwrap();
        assert!(!patch.clear_coordinates);
    }
}
