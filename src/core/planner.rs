//! One form submission, start to finish
//!
//! Validate the form, ask the provider for the route twice (as uploaded, then
//! optimized), adapt and compare the two answers, and only then store the
//! result. Any failure returns before the session slot is touched.

use std::collections::HashSet;
use std::sync::Arc;

use crate::core::compare::RouteComparison;
use crate::core::error::{Error, Result};
use crate::core::provider::DirectionsProvider;
use crate::core::route_view::adapt;
use crate::core::session::{ComparisonSession, SessionSlot};

/// Typed form input, produced once by the UI layer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteForm {
    pub start: String,
    pub end: String,
    pub stops: Vec<String>,
    pub submitted: bool,
}

impl RouteForm {
    pub fn new(start: impl Into<String>, end: impl Into<String>, stops: Vec<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            stops,
            submitted: true,
        }
    }

    /// Check the form before any provider call is made
    pub fn validate(&self) -> Result<()> {
        if !self.submitted {
            return Err(Error::ValidationError("Form was not submitted.".to_string()));
        }
        if self.start.trim().is_empty() || self.end.trim().is_empty() || self.stops.is_empty() {
            return Err(Error::ValidationError(
                "Fill start, end & upload stops file.".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for stop in &self.stops {
            // `|` separates waypoints in the directions request
            if stop.contains('|') {
                return Err(Error::ValidationError(format!(
                    "Stop address may not contain '|': {stop}"
                )));
            }
            if !seen.insert(stop.trim().to_lowercase()) {
                return Err(Error::ValidationError(format!(
                    "Duplicate stop address: {stop}"
                )));
            }
        }
        Ok(())
    }
}

/// Run a submission and store its comparison in `slot`
pub async fn submit<D: DirectionsProvider>(
    provider: &D,
    form: &RouteForm,
    slot: &SessionSlot,
) -> Result<Arc<ComparisonSession>> {
    let session = plan(provider, form).await?;
    log::info!(
        "Stored comparison for {} stops (saves {:.1} km, {} s)",
        session.stops.len(),
        session.comparison.distance_delta_km,
        session.comparison.duration_delta_secs
    );
    Ok(slot.set(session))
}

/// Fetch and compare both routes without storing anything
pub async fn plan<D: DirectionsProvider>(provider: &D, form: &RouteForm) -> Result<ComparisonSession> {
    form.validate()?;
    let start = form.start.trim();
    let end = form.end.trim();

    let baseline_raw = provider.fetch(start, end, &form.stops, false).await?;
    let optimized_raw = provider.fetch(start, end, &form.stops, true).await?;

    let baseline = adapt(&baseline_raw, &form.stops, false)?;
    let optimized = adapt(&optimized_raw, &form.stops, true)?;

    Ok(ComparisonSession {
        stops: form.stops.clone(),
        baseline_raw,
        optimized_raw,
        comparison: RouteComparison::new(baseline, optimized),
    })
}
