//! [`Rule`] – pure precondition predicates over a [`StateSnapshot`].
//!
//! Every rule is an immutable configuration value plus three capabilities: a
//! boolean check, a violation message computed from the same (possibly
//! defaulted) readings the check used, and a static remedy hint.
//!
//! Missing readings never raise. Each rule substitutes the value most likely
//! to fail its own check – a silent sensor is treated as a broken sensor:
//!
//! - [`BatteryMin`] – a missing battery reading counts as 0 %.
//! - [`MaxTemp`] – a missing temperature reading counts as 999 °C.
//! - [`RequireConnectivity`] – a missing connection reading counts as
//!   `OFFLINE`.

use interlock_types::StateSnapshot;

// ────────────────────────────────────────────────────────────────────────────
// Rule trait
// ────────────────────────────────────────────────────────────────────────────

/// A single precondition an acting entity must satisfy before a guarded
/// action may run.
///
/// Implement this trait to create custom rules and register them on a
/// [`Guard`][crate::guard::Guard]. Rules carry no mutable runtime state:
/// [`check`][Rule::check] and [`violation_message`][Rule::violation_message]
/// are pure functions of the snapshot, and the message must report the
/// defaulted reading actually evaluated, never the literal absence.
pub trait Rule: Send + Sync {
    /// Short identifier used in log events.
    fn name(&self) -> &str;

    /// `true` when the snapshot satisfies the precondition. Total: a missing
    /// reading falls back to the rule's fail-safe default instead of erroring.
    fn check(&self, state: &StateSnapshot) -> bool;

    /// Human-readable explanation of why [`check`][Rule::check] rejects
    /// `state`, computed from the same defaulted readings the check used.
    fn violation_message(&self, state: &StateSnapshot) -> String;

    /// Static remedy hint, independent of state.
    fn suggestion(&self) -> String;
}

// Fail-safe substitutes for absent readings.
const BATTERY_FALLBACK: f64 = 0.0;
const TEMP_FALLBACK: f64 = 999.0;
const CONNECTION_FALLBACK: &str = "OFFLINE";

// ────────────────────────────────────────────────────────────────────────────
// Built-in rules
// ────────────────────────────────────────────────────────────────────────────

/// Requires the `battery` reading to be at or above a minimum percentage.
pub struct BatteryMin {
    /// Minimum acceptable charge in percent.
    pub min_percent: f64,
}

impl Rule for BatteryMin {
    fn name(&self) -> &str {
        "battery_min"
    }

    fn check(&self, state: &StateSnapshot) -> bool {
        state.number("battery").unwrap_or(BATTERY_FALLBACK) >= self.min_percent
    }

    fn violation_message(&self, state: &StateSnapshot) -> String {
        let actual = state.number("battery").unwrap_or(BATTERY_FALLBACK);
        format!(
            "Battery too low: {actual}% (minimum {}%)",
            self.min_percent
        )
    }

    fn suggestion(&self) -> String {
        "Return to the dock and recharge before retrying.".to_string()
    }
}

/// Rejects operation when the `temperature` reading exceeds a maximum.
pub struct MaxTemp {
    /// Highest acceptable reading in degrees Celsius.
    pub max_celsius: f64,
}

impl Rule for MaxTemp {
    fn name(&self) -> &str {
        "max_temp"
    }

    fn check(&self, state: &StateSnapshot) -> bool {
        state.number("temperature").unwrap_or(TEMP_FALLBACK) <= self.max_celsius
    }

    fn violation_message(&self, state: &StateSnapshot) -> String {
        let actual = state.number("temperature").unwrap_or(TEMP_FALLBACK);
        format!(
            "Temperature {actual}°C exceeds limit {}°C",
            self.max_celsius
        )
    }

    fn suggestion(&self) -> String {
        "Let the unit cool down or inspect the thermal sensor.".to_string()
    }
}

/// Requires the `connection` reading to match a specific mode.
///
/// The comparison is case-insensitive, so a driver reporting `"ble"`
/// satisfies a rule requiring `"BLE"`.
pub struct RequireConnectivity {
    /// Required mode, e.g. `"WIFI"` or `"BLE"`.
    pub required: String,
}

impl RequireConnectivity {
    pub fn new(required: impl Into<String>) -> Self {
        Self {
            required: required.into(),
        }
    }
}

impl Rule for RequireConnectivity {
    fn name(&self) -> &str {
        "require_connectivity"
    }

    fn check(&self, state: &StateSnapshot) -> bool {
        state
            .text("connection")
            .unwrap_or(CONNECTION_FALLBACK)
            .eq_ignore_ascii_case(&self.required)
    }

    fn violation_message(&self, state: &StateSnapshot) -> String {
        let actual = state.text("connection").unwrap_or(CONNECTION_FALLBACK);
        format!(
            "Connectivity mismatch: required {}. Found: {actual}",
            self.required
        )
    }

    fn suggestion(&self) -> String {
        format!("Connect the unit via {} before retrying.", self.required)
    }
}
