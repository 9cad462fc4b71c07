//! Seams to the external services
//!
//! The core only ever talks to a directions service and a language model
//! through these traits, so tests and alternative backends can stand in for
//! the production HTTP clients.

use std::future::Future;

use crate::core::directions::DirectionsResult;
use crate::core::error::Result;

pub trait DirectionsProvider: Send + Sync {
    /// Route `origin -> stops -> destination`.
    ///
    /// With `optimize` set the provider may reorder `stops` and must report the
    /// order it chose in [`DirectionsResult::waypoint_order`].
    fn fetch(
        &self,
        origin: &str,
        destination: &str,
        stops: &[String],
        optimize: bool,
    ) -> impl Future<Output = Result<DirectionsResult>> + Send;
}

pub trait LanguageModel: Send + Sync {
    /// Complete `prompt` and return the model's text.
    fn answer(&self, prompt: &str) -> impl Future<Output = Result<String>> + Send;
}
