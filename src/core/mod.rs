//! Core library modules for routewise
//!
//! Route reshaping, comparison and session state, plus the clients for the
//! external directions and language-model services.

pub mod assistant;
pub mod compare;
pub mod config;
pub mod directions;
pub mod error;
pub mod google;
pub mod planner;
pub mod provider;
pub mod route_view;
pub mod session;
pub mod stops;

// Re-export main types for internal use
pub use compare::RouteComparison;
pub use directions::{DirectionsResult, LatLng, Leg};
pub use planner::{plan, submit, RouteForm};
pub use route_view::{adapt, format_signed_duration, RouteView, TripDuration};
pub use session::{ComparisonSession, SessionSlot, SessionStore};
