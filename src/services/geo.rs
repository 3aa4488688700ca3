//! Geographic calculations

use crate::types::Coordinates;

/// Earth radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Calculate Haversine distance between two points in kilometers
pub fn haversine_distance(from: &Coordinates, to: &Coordinates) -> f64 {
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lon = (to.lng - from.lng).to_radians();

    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);

    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_kuala_lumpur_to_penang() {
        let kuala_lumpur = Coordinates { lat: 3.1390, lng: 101.6869 };
        let penang = Coordinates { lat: 5.4141, lng: 100.3288 };

        let distance = haversine_distance(&kuala_lumpur, &penang);

        // Straight line KL to George Town is roughly 294 km
        assert!((distance - 294.0).abs() < 5.0);
    }

    #[test]
    fn test_haversine_same_point() {
        let point = Coordinates { lat: 3.0, lng: 101.0 };
        let distance = haversine_distance(&point, &point);
        assert!((distance - 0.0).abs() < 0.001);
    }

    #[test]
    fn test_haversine_symmetric() {
        let a = Coordinates { lat: 3.1390, lng: 101.6869 };
        let b = Coordinates { lat: 3.1500, lng: 101.7000 };
        assert!((haversine_distance(&a, &b) - haversine_distance(&b, &a)).abs() < 1e-9);
    }

    #[test]
    fn test_haversine_one_degree_latitude() {
        let a = Coordinates { lat: 0.0, lng: 0.0 };
        let b = Coordinates { lat: 1.0, lng: 0.0 };
        let expected = EARTH_RADIUS_KM * std::f64::consts::PI / 180.0;
        assert!((haversine_distance(&a, &b) - expected).abs() < 1e-6);
    }
}
