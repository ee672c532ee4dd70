//! [`Subject`] – capability interface for acting entities.
//!
//! The guard engine never probes an arbitrary object for attributes at call
//! time; an entity opts in by implementing this trait, and the compiler
//! checks the capability at composition time. Both methods default to the
//! benign degradation values, so an implementer overrides exactly what the
//! entity actually exposes:
//!
//! - no overridden [`state_snapshot`][Subject::state_snapshot] ⇒ empty
//!   snapshot; every rule then falls back to its fail-safe default for the
//!   keys it needs;
//! - no overridden [`dry_run`][Subject::dry_run] ⇒ `false` (enforcing mode).

use interlock_types::StateSnapshot;

/// An acting entity that guarded actions operate on.
///
/// # Example
///
/// ```
/// use interlock_kernel::Subject;
/// use interlock_types::StateSnapshot;
///
/// struct Rover {
///     battery: f64,
///     rehearsing: bool,
/// }
///
/// impl Subject for Rover {
///     fn state_snapshot(&self) -> StateSnapshot {
///         StateSnapshot::new().with("battery", self.battery)
///     }
///
///     fn dry_run(&self) -> bool {
///         self.rehearsing
///     }
/// }
/// ```
pub trait Subject {
    /// Observable condition of the entity at the instant of the call.
    ///
    /// Called once per guarded invocation; the engine never caches the
    /// returned snapshot across calls.
    fn state_snapshot(&self) -> StateSnapshot {
        StateSnapshot::new()
    }

    /// When `true`, rules are still checked but a passing call is simulated
    /// instead of executing the real action.
    ///
    /// Read, never written, by the engine; a single entity instance can be
    /// toggled between enforcing and simulating across calls without
    /// reconfiguring any rules.
    fn dry_run(&self) -> bool {
        false
    }
}
