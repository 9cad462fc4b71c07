//! Side-by-side comparison of the baseline and optimized routes

use serde::{Deserialize, Serialize};

use crate::core::route_view::RouteView;

/// Both views for one stop set, plus how much the optimized one saves
///
/// Deltas are `baseline - optimized`, so a positive value is a saving.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteComparison {
    pub baseline: RouteView,
    pub optimized: RouteView,
    pub distance_delta_km: f64,
    pub duration_delta_secs: i64,
}

impl RouteComparison {
    /// The caller guarantees both views were derived from the same upload.
    pub fn new(baseline: RouteView, optimized: RouteView) -> Self {
        let distance_delta_km = baseline.total_distance_km - optimized.total_distance_km;
        let duration_delta_secs =
            baseline.total_duration.as_secs() as i64 - optimized.total_duration.as_secs() as i64;
        Self {
            baseline,
            optimized,
            distance_delta_km,
            duration_delta_secs,
        }
    }
}
