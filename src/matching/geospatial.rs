// src/matching/geospatial.rs - Service-area containment and coordinates from listing URLs

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::core::Coordinates;
use crate::utils::config::ServiceArea;

static PLACE_PIN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!3d(-?\d+(?:\.\d+)?)!4d(-?\d+(?:\.\d+)?)").unwrap());

/// Inclusive bounding-box check. Missing or non-finite halves are never inside.
pub fn is_within_service_area(latitude: Option<f64>, longitude: Option<f64>, area: &ServiceArea) -> bool {
    match Coordinates::from_parts(latitude, longitude) {
        Some(coords) => coordinates_in_area(&coords, area),
        None => false,
    }
}

pub fn coordinates_in_area(coords: &Coordinates, area: &ServiceArea) -> bool {
    (area.lat_min..=area.lat_max).contains(&coords.latitude)
        && (area.lon_min..=area.lon_max).contains(&coords.longitude)
}

fn parse_float(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Coordinates of a place from its listing URL.
///
/// The `!3d<lat>!4d<lon>` pin wins. A `/@lat,lon` pair only counts on
/// `/maps/place` pages; on search pages it is the viewport, not the place.
pub fn parse_coords_from_url(url: &str) -> Option<Coordinates> {
    if url.is_empty() {
        return None;
    }

    if let Some(captures) = PLACE_PIN.captures(url) {
        let latitude = captures.get(1).and_then(|m| parse_float(m.as_str()));
        let longitude = captures.get(2).and_then(|m| parse_float(m.as_str()));
        return Coordinates::from_parts(latitude, longitude);
    }

    if url.to_lowercase().contains("/maps/place") {
        if let Some((_, after)) = url.split_once("/@") {
            let mut parts = after.split(',');
            let latitude = parts.next().and_then(parse_float);
            let longitude = parts.next().and_then(parse_float);
            return Coordinates::from_parts(latitude, longitude);
        }
    }

    None
}
