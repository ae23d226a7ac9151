use std::time::Duration;

use serde::{Deserialize, Serialize};

const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A WGS84 point. Latitude/longitude in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Great-circle distance to `other` in meters (haversine).
    pub fn distance_m(&self, other: Coordinate) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let dlat = (other.lat - self.lat).to_radians();
        let dlon = (other.lon - self.lon).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_M * a.sqrt().atan2((1.0 - a).sqrt())
    }
}

/// Circular search area: everything within `radius_m` of `center`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub center: Coordinate,
    pub radius_m: f64,
}

impl Region {
    pub fn new(center: Coordinate, radius_m: f64) -> Self {
        Self { center, radius_m }
    }

    pub fn contains(&self, coord: Coordinate) -> bool {
        self.center.distance_m(coord) <= self.radius_m
    }
}

/// A candidate point of interest returned by a place search.
/// Identity is `id`; two hits with the same id are the same place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub id: String,
    pub name: String,
    pub coordinate: Coordinate,
}

impl Place {
    pub fn new(id: impl Into<String>, name: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            coordinate,
        }
    }
}

/// A computed path to a destination. Cleared whenever the destination changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub distance_m: f64,
    pub expected_travel_time: Duration,
}
