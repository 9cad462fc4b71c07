//! Derived, presentation-ready view of a directions result
//!
//! [`adapt`] turns the raw legs of a [`DirectionsResult`] into the three
//! things the UI needs: the stops in visiting order, the route totals, and
//! one coordinate per stop position for drawing the polyline.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::directions::{DirectionsResult, LatLng};
use crate::core::error::{Error, Result};

/// Total driving time of a route in whole seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TripDuration(pub u64);

impl TripDuration {
    pub fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    pub fn hours(&self) -> u64 {
        self.0 / 3600
    }

    /// Whole minutes left over after [`TripDuration::hours`]
    pub fn minutes(&self) -> u64 {
        (self.0 % 3600) / 60
    }
}

impl fmt::Display for TripDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}h {}m", self.hours(), self.minutes())
    }
}

/// Signed duration for a savings figure, e.g. `-0h 5m`
pub fn format_signed_duration(secs: i64) -> String {
    let formatted = TripDuration::from_secs(secs.unsigned_abs()).to_string();
    if secs < 0 {
        format!("-{formatted}")
    } else {
        formatted
    }
}

/// One route, reshaped for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteView {
    /// Start address, stops in visiting order, end address
    pub ordered_addresses: Vec<String>,
    pub total_distance_km: f64,
    pub total_duration: TripDuration,
    /// One point per entry of `ordered_addresses`
    pub coordinates: Vec<LatLng>,
}

impl RouteView {
    /// Addresses numbered from 1, as shown in the Order/Address tables
    pub fn numbered_addresses(&self) -> impl Iterator<Item = (usize, &str)> {
        self.ordered_addresses
            .iter()
            .enumerate()
            .map(|(idx, address)| (idx + 1, address.as_str()))
    }

    /// Stops only, without the resolved start and end addresses
    pub fn stop_addresses(&self) -> &[String] {
        let len = self.ordered_addresses.len();
        if len < 2 {
            return &[];
        }
        &self.ordered_addresses[1..len - 1]
    }
}

/// Build a [`RouteView`] from a provider result and the stops it was asked for
///
/// When `was_optimized` is set the stops are relabelled with the provider's
/// `waypoint_order`; otherwise they keep their upload order.
pub fn adapt(result: &DirectionsResult, stops: &[String], was_optimized: bool) -> Result<RouteView> {
    let (first, last) = match (result.legs.first(), result.legs.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => {
            return Err(Error::MalformedResponse(
                "directions result has no legs".to_string(),
            ))
        }
    };

    if result.legs.len() != stops.len() + 1 {
        return Err(Error::MalformedResponse(format!(
            "expected {} legs for {} stops, got {}",
            stops.len() + 1,
            stops.len(),
            result.legs.len()
        )));
    }

    let visiting_order: Vec<&String> = if was_optimized {
        let order = result.waypoint_order.as_deref().ok_or_else(|| {
            Error::MalformedResponse("optimized result has no waypoint order".to_string())
        })?;
        check_permutation(order, stops.len())?;
        order.iter().map(|&idx| &stops[idx]).collect()
    } else {
        stops.iter().collect()
    };

    let mut ordered_addresses = Vec::with_capacity(stops.len() + 2);
    ordered_addresses.push(first.start_address.clone());
    ordered_addresses.extend(visiting_order.into_iter().cloned());
    ordered_addresses.push(last.end_address.clone());

    let total_m: u64 = result.legs.iter().map(|leg| leg.distance_m).sum();
    let total_s: u64 = result.legs.iter().map(|leg| leg.duration_s).sum();

    let mut coordinates: Vec<LatLng> = result.legs.iter().map(|leg| leg.start_location).collect();
    coordinates.push(last.end_location);

    Ok(RouteView {
        ordered_addresses,
        total_distance_km: total_m as f64 / 1000.0,
        total_duration: TripDuration::from_secs(total_s),
        coordinates,
    })
}

/// `order` must contain every index in `0..len` exactly once
fn check_permutation(order: &[usize], len: usize) -> Result<()> {
    if order.len() != len {
        return Err(Error::MalformedResponse(format!(
            "waypoint order has {} entries for {} stops",
            order.len(),
            len
        )));
    }

    let mut seen = vec![false; len];
    for &idx in order {
        match seen.get_mut(idx) {
            None => {
                return Err(Error::MalformedResponse(format!(
                    "waypoint order index {idx} is out of range for {len} stops"
                )))
            }
            Some(true) => {
                return Err(Error::MalformedResponse(format!(
                    "waypoint order repeats index {idx}"
                )))
            }
            Some(slot) => *slot = true,
        }
    }
    Ok(())
}
