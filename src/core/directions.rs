//! Directions data model
//!
//! Provider-neutral representation of a multi-leg route as returned by a
//! directions service.

use serde::{Deserialize, Serialize};

/// A WGS84 coordinate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// One segment between two consecutive points of a route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    pub start_location: LatLng,
    pub end_location: LatLng,
    /// Provider-resolved address of the start point
    pub start_address: String,
    /// Provider-resolved address of the end point
    pub end_address: String,
    pub distance_m: u64,
    pub duration_s: u64,
}

/// A provider answer for `origin -> stops -> destination`
///
/// `legs` has one entry per hop, so `stops.len() + 1` of them for a
/// well-formed answer. `waypoint_order` is only present when optimization was
/// requested and gives the provider-chosen visiting order as indices into the
/// submitted stop list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DirectionsResult {
    pub legs: Vec<Leg>,
    pub waypoint_order: Option<Vec<usize>>,
}

impl DirectionsResult {
    pub fn new(legs: Vec<Leg>, waypoint_order: Option<Vec<usize>>) -> Self {
        Self {
            legs,
            waypoint_order,
        }
    }
}
