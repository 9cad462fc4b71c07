//! Google Maps Directions client
//!
//! Calls the Directions JSON web service and converts its multi-leg answer
//! into a [`DirectionsResult`]. Optimization is requested with the
//! `optimize:true` waypoint prefix; the service then reports the chosen
//! visiting order in `waypoint_order`.

use reqwest::{Client, ClientBuilder};
use serde::Deserialize;

use crate::core::directions::{DirectionsResult, LatLng, Leg};
use crate::core::error::{Error, Result};
use crate::core::provider::DirectionsProvider;

/// Public endpoint of the Google Maps web services
pub const DEFAULT_DIRECTIONS_BASE_URL: &str = "https://maps.googleapis.com";

const DIRECTIONS_PATH: &str = "/maps/api/directions/json";

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    routes: Vec<RouteJson>,
}

#[derive(Debug, Deserialize)]
struct RouteJson {
    legs: Vec<LegJson>,
    #[serde(default)]
    waypoint_order: Option<Vec<usize>>,
}

#[derive(Debug, Deserialize)]
struct LegJson {
    distance: ValueJson,
    duration: ValueJson,
    start_address: String,
    end_address: String,
    start_location: LatLng,
    end_location: LatLng,
}

#[derive(Debug, Deserialize)]
struct ValueJson {
    value: u64,
}

impl From<LegJson> for Leg {
    fn from(leg: LegJson) -> Self {
        Leg {
            start_location: leg.start_location,
            end_location: leg.end_location,
            start_address: leg.start_address,
            end_address: leg.end_address,
            distance_m: leg.distance.value,
            duration_s: leg.duration.value,
        }
    }
}

impl DirectionsResponse {
    fn into_result(self, optimize: bool) -> Result<DirectionsResult> {
        if self.status != "OK" {
            let message = match self.error_message {
                Some(msg) if !msg.is_empty() => format!("{}: {}", self.status, msg),
                _ => self.status,
            };
            return Err(Error::ProviderError(message));
        }

        let route = self.routes.into_iter().next().ok_or_else(|| {
            Error::MalformedResponse("status OK but no route returned".to_string())
        })?;

        let legs = route.legs.into_iter().map(Leg::from).collect();
        // The service echoes an identity order even when not optimizing
        let waypoint_order = if optimize { route.waypoint_order } else { None };
        Ok(DirectionsResult::new(legs, waypoint_order))
    }
}

/// Build the `waypoints` query value, `None` when there are no stops
fn waypoints_param(stops: &[String], optimize: bool) -> Option<String> {
    if stops.is_empty() {
        return None;
    }
    let joined = stops.join("|");
    Some(if optimize {
        format!("optimize:true|{joined}")
    } else {
        joined
    })
}

/// [`DirectionsProvider`] backed by the Google Directions web service
pub struct GoogleDirections {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GoogleDirections {
    /// Client for the public Google endpoint
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_key, DEFAULT_DIRECTIONS_BASE_URL)
    }

    /// Client for a custom endpoint (proxies, test servers)
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let client = ClientBuilder::new()
            .user_agent(format!("routewise/{}", env!("ROUTEWISE_VERSION")))
            .build()
            .map_err(|e| Error::ConfigError(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

impl DirectionsProvider for GoogleDirections {
    async fn fetch(
        &self,
        origin: &str,
        destination: &str,
        stops: &[String],
        optimize: bool,
    ) -> Result<DirectionsResult> {
        let url = format!("{}{}", self.base_url, DIRECTIONS_PATH);
        log::debug!(
            "[DIRECTIONS] {} -> {} via {} stops (optimize: {})",
            origin,
            destination,
            stops.len(),
            optimize
        );

        let mut query: Vec<(&str, String)> = vec![
            ("origin", origin.to_string()),
            ("destination", destination.to_string()),
        ];
        if let Some(waypoints) = waypoints_param(stops, optimize) {
            query.push(("waypoints", waypoints));
        }
        query.push(("key", self.api_key.clone()));

        let response = self.client.get(&url).query(&query).send().await.map_err(|e| {
            log::error!("Failed to send directions request to {}: {}", url, e);
            Error::from(e)
        })?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            log::error!("Directions API returned {}. Body: {}", status, text);
            let detail = serde_json::from_str::<DirectionsResponse>(&text)
                .ok()
                .and_then(|body| body.error_message)
                .unwrap_or(text);
            return Err(Error::ProviderError(format!("HTTP {status}: {detail}")));
        }

        let body: DirectionsResponse = serde_json::from_str(&text).map_err(|e| {
            log::error!("Failed to parse DirectionsResponse: {}. Body: {}", e, text);
            Error::MalformedResponse(e.to_string())
        })?;

        body.into_result(optimize)
    }
}
