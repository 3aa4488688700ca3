//! Configuration management

use anyhow::{self, Context, Result};

use crate::defaults::{DEFAULT_HUB_LOCATION, DEFAULT_NATS_URL, DEFAULT_PAGE_SIZE};
use crate::types::{Coordinates, Hub};

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// NATS server URL
    pub nats_url: String,

    /// PostgreSQL connection string (needed by `serve` and `migrate`)
    pub database_url: Option<String>,

    /// `location` value of the hub row
    pub hub_location: String,

    /// Hub coordinates used when the hub row has none
    pub hub_coordinates: Option<Coordinates>,

    /// Rows per table page
    pub page_size: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let nats_url = std::env::var("NATS_URL")
            .unwrap_or_else(|_| DEFAULT_NATS_URL.to_string());

        let database_url = std::env::var("DATABASE_URL").ok();

        let hub_location = std::env::var("HUB_LOCATION")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_HUB_LOCATION.to_string());

        let hub_coordinates = parse_hub_coordinates(
            std::env::var("HUB_LAT").ok().as_deref(),
            std::env::var("HUB_LNG").ok().as_deref(),
        )?;

        let page_size = match std::env::var("PAGE_SIZE") {
            Ok(value) => value
                .trim()
                .parse::<usize>()
                .with_context(|| format!("PAGE_SIZE must be a positive integer, got {:?}", value))?,
            Err(_) => DEFAULT_PAGE_SIZE,
        };
        if page_size == 0 {
            anyhow::bail!("PAGE_SIZE must be at least 1");
        }

        Ok(Self {
            nats_url,
            database_url,
            hub_location,
            hub_coordinates,
            page_size,
        })
    }

    /// Database URL, or an error naming the missing variable
    pub fn require_database_url(&self) -> Result<&str> {
        self.database_url
            .as_deref()
            .context("DATABASE_URL must be set")
    }

    /// Hub definition for the table engine
    pub fn hub(&self) -> Hub {
        let hub = Hub::new(self.hub_location.clone());
        match self.hub_coordinates {
            Some(coords) => hub.with_fallback(coords),
            None => hub,
        }
    }
}

/// Both or neither of `HUB_LAT` / `HUB_LNG` must be set
fn parse_hub_coordinates(lat: Option<&str>, lng: Option<&str>) -> Result<Option<Coordinates>> {
    match (lat, lng) {
        (None, None) => Ok(None),
        (Some(lat), Some(lng)) => {
            let lat: f64 = lat.trim().parse().context("HUB_LAT must be a number")?;
            let lng: f64 = lng.trim().parse().context("HUB_LNG must be a number")?;
            let coords = Coordinates::new(lat, lng);
            if !coords.is_valid() {
                anyhow::bail!("HUB_LAT/HUB_LNG out of range: {}, {}", lat, lng);
            }
            Ok(Some(coords))
        }
        _ => anyhow::bail!("HUB_LAT and HUB_LNG must be set together"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hub_coordinates_none() {
        assert!(parse_hub_coordinates(None, None).unwrap().is_none());
    }

    #[test]
    fn test_parse_hub_coordinates_valid() {
        let coords = parse_hub_coordinates(Some("3.12"), Some(" 101.68 ")).unwrap().unwrap();
        assert_eq!(coords, Coordinates::new(3.12, 101.68));
    }

    #[test]
    fn test_parse_hub_coordinates_rejects_half_or_garbage() {
        assert!(parse_hub_coordinates(Some("3.12"), None).is_err());
        assert!(parse_hub_coordinates(Some("north"), Some("101.0")).is_err());
        assert!(parse_hub_coordinates(Some("95.0"), Some("101.0")).is_err());
    }

    #[test]
    fn test_require_database_url() {
        let config = Config {
            nats_url: DEFAULT_NATS_URL.to_string(),
            database_url: None,
            hub_location: DEFAULT_HUB_LOCATION.to_string(),
            hub_coordinates: None,
            page_size: DEFAULT_PAGE_SIZE,
        };
        assert!(config.require_database_url().is_err());

        let config = Config {
            database_url: Some("postgres://test".to_string()),
            ..config
        };
        assert_eq!(config.require_database_url().unwrap(), "postgres://test");
    }

    #[test]
    fn test_hub_uses_fallback_coordinates() {
        let config = Config {
            nats_url: DEFAULT_NATS_URL.to_string(),
            database_url: None,
            hub_location: "Central Kitchen".to_string(),
            hub_coordinates: Some(Coordinates::new(3.12, 101.68)),
            page_size: DEFAULT_PAGE_SIZE,
        };
        let hub = config.hub();
        assert_eq!(hub.location, "Central Kitchen");
        assert_eq!(hub.fallback_coordinates, Some(Coordinates::new(3.12, 101.68)));
    }

    #[test]
    #[ignore] // requires --test-threads=1 due to env var race
    fn test_config_page_size_defaults() {
        std::env::remove_var("PAGE_SIZE");
        let config = Config::from_env().unwrap();
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
    }
}
