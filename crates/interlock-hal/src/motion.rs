//! Generic `MotionDriver` trait for zone-addressable drive units.
//!
//! Drivers implement this trait; the rest of the stack only ever talks to the
//! trait, so a simulated driver can stand in for real hardware without
//! touching guard or rule logic.

use interlock_types::InterlockError;

/// A zone-addressable motion unit (mobile base, gantry, cleaning head, …).
pub trait MotionDriver: Send + Sync {
    /// Stable identifier for this unit, e.g. `"vacuum_1"`.
    fn id(&self) -> &str;

    /// Physically move the unit to `zone`.
    ///
    /// # Errors
    ///
    /// Returns [`InterlockError::HardwareFault`] if the command cannot be
    /// applied (e.g. the drive is faulted or the zone is unreachable).
    fn move_to(&mut self, zone: &str) -> Result<(), InterlockError>;

    /// Bring the unit to a safe stop and hold it there.
    ///
    /// # Errors
    ///
    /// Returns [`InterlockError::HardwareFault`] if the stop command cannot
    /// be applied.
    fn halt(&mut self) -> Result<(), InterlockError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal in-process driver used only for tests.
    struct MockDriver {
        id: String,
        zone: Option<String>,
    }

    impl MockDriver {
        fn new(id: &str) -> Self {
            Self {
                id: id.to_string(),
                zone: None,
            }
        }
    }

    impl MotionDriver for MockDriver {
        fn id(&self) -> &str {
            &self.id
        }

        fn move_to(&mut self, zone: &str) -> Result<(), InterlockError> {
            self.zone = Some(zone.to_string());
            Ok(())
        }

        fn halt(&mut self) -> Result<(), InterlockError> {
            self.zone = None;
            Ok(())
        }
    }

    #[test]
    fn mock_driver_moves_and_halts() {
        let mut driver = MockDriver::new("test_unit");
        assert_eq!(driver.id(), "test_unit");

        driver.move_to("dock").unwrap();
        assert_eq!(driver.zone.as_deref(), Some("dock"));

        driver.halt().unwrap();
        assert!(driver.zone.is_none());
    }
}
