//! Per-user session state
//!
//! A [`SessionSlot`] holds at most one [`ComparisonSession`]. It starts empty,
//! becomes populated on the first successful submission, and is replaced
//! wholesale on every later one. A browser's slot only enters the
//! [`SessionStore`] once its first submission has succeeded.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use serde::Serialize;

use crate::core::compare::RouteComparison;
use crate::core::directions::DirectionsResult;

/// The retained result of one successful submission
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonSession {
    pub stops: Vec<String>,
    pub baseline_raw: DirectionsResult,
    pub optimized_raw: DirectionsResult,
    pub comparison: RouteComparison,
}

/// Single-value slot with replace-on-write semantics
#[derive(Debug, Default)]
pub struct SessionSlot {
    current: RwLock<Option<Arc<ComparisonSession>>>,
}

impl SessionSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current session, or `None` if nothing was submitted successfully yet
    pub fn get(&self) -> Option<Arc<ComparisonSession>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Swap in a new session; readers see either the old or the new one in full
    pub fn set(&self, session: ComparisonSession) -> Arc<ComparisonSession> {
        let session = Arc::new(session);
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&session));
        session
    }

    pub fn is_empty(&self) -> bool {
        self.get().is_none()
    }
}

/// Session slots keyed by the browser's session id
#[derive(Debug, Default)]
pub struct SessionStore {
    slots: Mutex<HashMap<String, Arc<SessionSlot>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint an id for a browser that has none yet
    pub fn new_session_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }

    /// Slot for `session_id`, if that browser ever stored a comparison
    pub fn get(&self, session_id: &str) -> Option<Arc<SessionSlot>> {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(session_id)
            .cloned()
    }

    /// Register `slot` under `session_id`, replacing any earlier one
    pub fn insert(&self, session_id: &str, slot: Arc<SessionSlot>) {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(session_id.to_string(), slot);
    }

    pub fn len(&self) -> usize {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
