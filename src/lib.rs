//! # Routewise Library
//!
//! Compare a multi-stop delivery route as uploaded against the order a
//! directions service picks when allowed to reorder the stops.
//!
//! ## Features
//!
//! - **Route reshaping**: turn a multi-leg directions answer into ordered
//!   stops, totals and a polyline
//! - **Comparison**: distance and duration saved by the optimized order
//! - **Session state**: the latest comparison per browser, replaced atomically
//! - **Route Q&A**: canned and free-text questions to a hosted language model
//! - **Web UI**: a single server-rendered page with tables and a map
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use routewise::{GoogleDirections, RouteForm, SessionSlot};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = GoogleDirections::new("my-api-key")?;
//!     let form = RouteForm::new(
//!         "1 Depot Road",
//!         "1 Depot Road",
//!         vec!["12 Rue Haute".to_string(), "4 Place Sainte-Croix".to_string()],
//!     );
//!
//!     let slot = SessionSlot::new();
//!     let session = routewise::submit(&provider, &form, &slot).await?;
//!     println!(
//!         "Saved {:.1} km",
//!         session.comparison.distance_delta_km
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Asking about the route
//!
//! ```rust,no_run
//! # use routewise::{RouteView, GroqChat};
//! # async fn demo(route: &RouteView) -> routewise::Result<()> {
//! let model = GroqChat::new("groq-key", routewise::DEFAULT_LLM_MODEL)?;
//! let answer = routewise::ask_about_route(&model, route, routewise::SUGGESTED_QUESTIONS[1]).await?;
//! println!("{answer}");
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod web;

// Re-export core types that users might need
pub use crate::core::assistant::{
    ask_about_route, qa_prompt, GroqChat, DEFAULT_LLM_MODEL, SUGGESTED_QUESTIONS,
};
pub use crate::core::config::Config;
pub use crate::core::error::{Error, Result};
pub use crate::core::google::GoogleDirections;
pub use crate::core::provider::{DirectionsProvider, LanguageModel};
pub use crate::core::stops::{parse_stop_lines, parse_stops, parse_stops_upload, SheetFormat};
pub use crate::core::{
    adapt, format_signed_duration, plan, submit, ComparisonSession, DirectionsResult, LatLng, Leg,
    RouteComparison, RouteForm, RouteView, SessionSlot, SessionStore, TripDuration,
};
pub use crate::web::{router, run_server, AppState};

/// Directions client configured from `config`
pub fn directions_from_config(config: &Config) -> Result<GoogleDirections> {
    GoogleDirections::with_base_url(&config.google_maps_api_key, &config.directions_base_url)
}

/// Language-model client configured from `config`, `None` when no key is set
pub fn assistant_from_config(config: &Config) -> Result<Option<GroqChat>> {
    config
        .groq_api_key
        .as_ref()
        .map(|key| GroqChat::with_base_url(key, &config.groq_model, &config.llm_base_url))
        .transpose()
}
