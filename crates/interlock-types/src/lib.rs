use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single scalar reading in an entity's state snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StateValue {
    /// Numeric reading (battery percentage, temperature, …).
    Number(f64),
    /// Textual reading (connectivity mode, firmware revision, …).
    Text(String),
}

impl From<f64> for StateValue {
    fn from(value: f64) -> Self {
        StateValue::Number(value)
    }
}

impl From<i64> for StateValue {
    fn from(value: i64) -> Self {
        StateValue::Number(value as f64)
    }
}

impl From<&str> for StateValue {
    fn from(value: &str) -> Self {
        StateValue::Text(value.to_string())
    }
}

impl From<String> for StateValue {
    fn from(value: String) -> Self {
        StateValue::Text(value)
    }
}

/// Point-in-time view of an acting entity's observable condition.
///
/// Extracted fresh on every guarded call and never cached across calls. An
/// entity that exposes no readings contributes an empty snapshot; rules are
/// then expected to fall back to their fail-safe defaults for the keys they
/// need.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    readings: HashMap<String, StateValue>,
}

impl StateSnapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the reading under `key`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<StateValue>) {
        self.readings.insert(key.into(), value.into());
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<StateValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Numeric reading under `key`, if present and numeric.
    pub fn number(&self, key: &str) -> Option<f64> {
        match self.readings.get(key) {
            Some(StateValue::Number(n)) => Some(*n),
            _ => None,
        }
    }

    /// Textual reading under `key`, if present and textual.
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.readings.get(key) {
            Some(StateValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// `true` when the snapshot carries no readings at all.
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}

/// Whether a guarded call was permitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuardStatus {
    Success,
    Error,
}

/// Structured record produced whenever a guarded action did not run normally:
/// either a rule rejected the current state, or the call was simulated under
/// dry-run.
///
/// Created fresh per call, handed to the caller, never retained by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuardResult {
    pub status: GuardStatus,
    /// Violation message of the first failing rule, or the simulation notice.
    pub reason: String,
    pub dry_run: bool,
}

impl GuardResult {
    /// Successful simulation: every rule passed but the entity is in dry-run
    /// mode, so the real action was suppressed.
    pub fn simulated() -> Self {
        Self {
            status: GuardStatus::Success,
            reason: "checks passed (simulated)".to_string(),
            dry_run: true,
        }
    }

    /// Blocked call: a rule rejected the current state.
    pub fn blocked(reason: impl Into<String>, dry_run: bool) -> Self {
        Self {
            status: GuardStatus::Error,
            reason: reason.into(),
            dry_run,
        }
    }

    /// `true` when the record reports a rule rejection.
    pub fn is_error(&self) -> bool {
        self.status == GuardStatus::Error
    }
}

/// Policy applied when a rule rejects the current state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnFail {
    /// Return a structured [`GuardResult`] so calling code can inspect and
    /// react without any error-handling machinery.
    #[default]
    Block,
    /// Signal an [`InterlockError::Violation`] instead of returning a value.
    Raise,
}

/// Global error type spanning guard violations and hardware driver failures.
#[derive(Error, Debug, Serialize, Deserialize)]
pub enum InterlockError {
    /// A rule rejected the current state and the guard is configured to
    /// raise. Carries the failing rule's explanation and its remedy hint.
    #[error("Guard violation: {message}")]
    Violation { message: String, suggestion: String },

    /// A hardware driver could not apply a command.
    #[error("Hardware fault on {component}: {details}")]
    HardwareFault { component: String, details: String },
}
