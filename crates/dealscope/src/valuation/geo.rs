use super::domain::{AreaType, Coordinates};

const EARTH_RADIUS_MILES: f64 = 3958.8;

/// Great-circle distance in miles between two points.
pub fn haversine_miles(a: &Coordinates, b: &Coordinates) -> f64 {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_MILES * h.sqrt().asin()
}

const URBAN_MARKERS: &[&str] = &["sublocality", "neighborhood", "premise", "subpremise"];
const RURAL_MARKERS: &[&str] = &["natural_feature", "park", "administrative_area_level_2"];

impl AreaType {
    /// Classify an area from geocoder place types. Urban markers win over
    /// rural ones; anything inconclusive is treated as suburban.
    pub fn from_place_types<S: AsRef<str>>(place_types: &[S]) -> Self {
        let mut saw_rural = false;
        let mut saw_locality = false;

        for place_type in place_types {
            let value = place_type.as_ref();
            if URBAN_MARKERS.contains(&value) {
                return AreaType::Urban;
            }
            if RURAL_MARKERS.contains(&value) {
                saw_rural = true;
            }
            if value == "locality" {
                saw_locality = true;
            }
        }

        if saw_rural && !saw_locality {
            AreaType::Rural
        } else {
            AreaType::Suburban
        }
    }
}
