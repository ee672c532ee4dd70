//! In-process simulated driver for demos and CI without physical hardware.

use interlock_types::InterlockError;
use tracing::info;

use crate::motion::MotionDriver;

/// A simulated motion unit that records every command it receives.
/// Always succeeds.
///
/// # Example
///
/// ```
/// use interlock_hal::{MotionDriver, SimMotion};
///
/// let mut unit = SimMotion::new("vacuum_1");
/// unit.move_to("Zone A").expect("sim move must succeed");
/// assert_eq!(unit.visited(), ["Zone A"]);
/// ```
pub struct SimMotion {
    id: String,
    visited: Vec<String>,
    halted: bool,
}

impl SimMotion {
    /// Create a new simulated unit with the given identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            visited: Vec::new(),
            halted: false,
        }
    }

    /// Zones visited so far, in command order.
    pub fn visited(&self) -> &[String] {
        &self.visited
    }

    /// `true` once a halt command has been received and no move followed it.
    pub fn is_halted(&self) -> bool {
        self.halted
    }
}

impl MotionDriver for SimMotion {
    fn id(&self) -> &str {
        &self.id
    }

    fn move_to(&mut self, zone: &str) -> Result<(), InterlockError> {
        info!(unit = %self.id, %zone, "sim driver moving");
        self.halted = false;
        self.visited.push(zone.to_string());
        Ok(())
    }

    fn halt(&mut self) -> Result<(), InterlockError> {
        info!(unit = %self.id, "sim driver halting");
        self.halted = true;
        Ok(())
    }
}
