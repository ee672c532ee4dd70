//! [`Guard`] / [`Guarded`] – the guard-enforcement engine.
//!
//! [`Guard::wrap`] attaches an ordered rule list and an on-failure policy to
//! an action. Every [`Guarded::call`] then:
//!
//! 1. extracts a fresh [`StateSnapshot`] from the acting [`Subject`];
//! 2. reads the subject's dry-run flag;
//! 3. evaluates every registered [`Rule`] in insertion order, stopping at the
//!    first failure (later rules are never evaluated);
//! 4. resolves the outcome:
//!
//! | rules | dry-run | on-fail | outcome |
//! |---|---|---|---|
//! | pass | false | any | action runs; native value returned unchanged |
//! | pass | true  | any | action suppressed; simulated success reported |
//! | fail | any   | [`OnFail::Block`] | action suppressed; [`GuardResult`] with status error |
//! | fail | any   | [`OnFail::Raise`] | action suppressed; [`InterlockError::Violation`] returned |
//!
//! Dry-run never masks a failure: simulation only suppresses the real side
//! effect when the rules pass.
//!
//! # Example
//!
//! ```
//! use interlock_kernel::{BatteryMin, Guard, Subject};
//! use interlock_types::StateSnapshot;
//!
//! struct Rover {
//!     battery: f64,
//! }
//!
//! impl Subject for Rover {
//!     fn state_snapshot(&self) -> StateSnapshot {
//!         StateSnapshot::new().with("battery", self.battery)
//!     }
//! }
//!
//! let guarded = Guard::new()
//!     .with_rule(Box::new(BatteryMin { min_percent: 20.0 }))
//!     .wrap(|_rover: &Rover, zone: &str| format!("cleaned {zone}"));
//!
//! let healthy = Rover { battery: 80.0 };
//! assert!(guarded.call(&healthy, "bay-1").unwrap().is_executed());
//!
//! let dying = Rover { battery: 5.0 };
//! let outcome = guarded.call(&dying, "bay-2").unwrap();
//! assert!(outcome.suppressed().unwrap().is_error());
//! ```

use interlock_types::{GuardResult, InterlockError, OnFail, StateSnapshot};
use tracing::{debug, warn};

use crate::rules::Rule;
use crate::subject::Subject;

// ────────────────────────────────────────────────────────────────────────────
// Verdict
// ────────────────────────────────────────────────────────────────────────────

/// Result of evaluating a rule list against one snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// Every rule passed.
    Pass,
    /// A rule rejected the snapshot; later rules were not evaluated.
    Fail {
        /// The failing rule's explanation, reflecting the readings it used.
        message: String,
        /// The failing rule's remedy hint.
        suggestion: String,
    },
}

// ────────────────────────────────────────────────────────────────────────────
// Guard
// ────────────────────────────────────────────────────────────────────────────

/// Ordered rule list and on-failure policy, attached to one wrapped action.
///
/// An empty guard permits everything. Rules are evaluated in registration
/// order, first-failure-wins.
#[derive(Default)]
pub struct Guard {
    rules: Vec<Box<dyn Rule>>,
    on_fail: OnFail,
}

impl Guard {
    /// Create a guard with no rules and the default [`OnFail::Block`] policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rule. Rules are evaluated in insertion order.
    pub fn add_rule(&mut self, rule: Box<dyn Rule>) {
        self.rules.push(rule);
    }

    /// Builder-style [`add_rule`](Self::add_rule).
    pub fn with_rule(mut self, rule: Box<dyn Rule>) -> Self {
        self.add_rule(rule);
        self
    }

    /// Select what happens when a rule rejects the current state.
    pub fn on_fail(mut self, policy: OnFail) -> Self {
        self.on_fail = policy;
        self
    }

    /// Evaluate every registered rule against `state` in insertion order.
    ///
    /// Stops at the first rule whose check fails; only that rule's message
    /// and suggestion are ever computed.
    pub fn evaluate(&self, state: &StateSnapshot) -> Verdict {
        for rule in &self.rules {
            if !rule.check(state) {
                return Verdict::Fail {
                    message: rule.violation_message(state),
                    suggestion: rule.suggestion(),
                };
            }
        }
        Verdict::Pass
    }

    /// Attach this guard to `action`, producing a guarded action with the
    /// same calling convention.
    pub fn wrap<F>(self, action: F) -> Guarded<F> {
        Guarded {
            guard: self,
            action,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Outcome
// ────────────────────────────────────────────────────────────────────────────

/// Outcome of a guarded invocation.
///
/// Callers must be prepared for both variants – and, when the guard uses
/// [`OnFail::Raise`], for the error side of the surrounding `Result` as well.
#[derive(Debug)]
pub enum Outcome<T> {
    /// Every rule passed in enforcing mode; carries the action's native
    /// return value unchanged.
    Executed(T),
    /// The action did not run; carries the structured record explaining why
    /// (rule rejection, or simulated dry-run success).
    Suppressed(GuardResult),
}

impl<T> Outcome<T> {
    /// `true` when the real action ran.
    pub fn is_executed(&self) -> bool {
        matches!(self, Outcome::Executed(_))
    }

    /// The native return value, if the action ran.
    pub fn into_executed(self) -> Option<T> {
        match self {
            Outcome::Executed(value) => Some(value),
            Outcome::Suppressed(_) => None,
        }
    }

    /// The structured record, if the action was suppressed.
    pub fn suppressed(&self) -> Option<&GuardResult> {
        match self {
            Outcome::Suppressed(result) => Some(result),
            Outcome::Executed(_) => None,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Guarded
// ────────────────────────────────────────────────────────────────────────────

/// An action wrapped with a [`Guard`].
///
/// Produced by [`Guard::wrap`]. Invoke through [`Guarded::call`] for actions
/// operating on a [`Subject`], or [`Guarded::call_unbound`] for wrapped free
/// functions with no acting entity.
pub struct Guarded<F> {
    guard: Guard,
    action: F,
}

impl<F> Guarded<F> {
    /// Invoke the wrapped action on behalf of `subject`.
    ///
    /// A fresh snapshot is extracted on every call. Multi-argument actions
    /// take their arguments as a tuple; argument-less actions take `()`.
    ///
    /// # Errors
    ///
    /// Returns [`InterlockError::Violation`] only when the guard uses
    /// [`OnFail::Raise`] and a rule failed. Under the default
    /// [`OnFail::Block`] policy this method never errors.
    pub fn call<S, A, T>(&self, subject: &S, args: A) -> Result<Outcome<T>, InterlockError>
    where
        S: Subject,
        F: Fn(&S, A) -> T,
    {
        let state = subject.state_snapshot();
        let dry_run = subject.dry_run();

        match self.guard.evaluate(&state) {
            Verdict::Pass if dry_run => {
                debug!("rules passed in dry-run mode, action simulated");
                Ok(Outcome::Suppressed(GuardResult::simulated()))
            }
            Verdict::Pass => {
                debug!("rules passed, executing action");
                Ok(Outcome::Executed((self.action)(subject, args)))
            }
            Verdict::Fail {
                message,
                suggestion,
            } => {
                warn!(%message, "action suppressed by rule");
                match self.guard.on_fail {
                    OnFail::Block => {
                        Ok(Outcome::Suppressed(GuardResult::blocked(message, dry_run)))
                    }
                    OnFail::Raise => Err(InterlockError::Violation {
                        message,
                        suggestion,
                    }),
                }
            }
        }
    }

    /// Invoke a wrapped free function that has no acting entity.
    ///
    /// With no subject there is no state to extract, so rule evaluation is
    /// bypassed entirely and the action always runs. Guards attached to free
    /// functions are deliberately inert.
    pub fn call_unbound<A, T>(&self, args: A) -> T
    where
        F: Fn(A) -> T,
    {
        (self.action)(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{BatteryMin, RequireConnectivity};
    use interlock_types::GuardStatus;
    use std::cell::Cell;

    // ------------------------------------------------------------------
    // Test doubles
    // ------------------------------------------------------------------

    struct Rig {
        battery: f64,
        connection: &'static str,
        dry: bool,
    }

    impl Rig {
        fn healthy() -> Self {
            Self {
                battery: 90.0,
                connection: "WIFI",
                dry: false,
            }
        }

        fn drained() -> Self {
            Self {
                battery: 10.0,
                ..Self::healthy()
            }
        }
    }

    impl Subject for Rig {
        fn state_snapshot(&self) -> StateSnapshot {
            StateSnapshot::new()
                .with("battery", self.battery)
                .with("connection", self.connection)
        }

        fn dry_run(&self) -> bool {
            self.dry
        }
    }

    /// Rule that rejects everything, tagged so message order can be asserted.
    struct AlwaysFail {
        tag: &'static str,
    }

    impl Rule for AlwaysFail {
        fn name(&self) -> &str {
            self.tag
        }

        fn check(&self, _state: &StateSnapshot) -> bool {
            false
        }

        fn violation_message(&self, _state: &StateSnapshot) -> String {
            format!("{} rejected", self.tag)
        }

        fn suggestion(&self) -> String {
            format!("fix {}", self.tag)
        }
    }

    /// Rule that panics when evaluated – proves short-circuiting.
    struct MustNotRun;

    impl Rule for MustNotRun {
        fn name(&self) -> &str {
            "must_not_run"
        }

        fn check(&self, _state: &StateSnapshot) -> bool {
            panic!("rule after the first failure must not be evaluated");
        }

        fn violation_message(&self, _state: &StateSnapshot) -> String {
            unreachable!()
        }

        fn suggestion(&self) -> String {
            unreachable!()
        }
    }

    fn battery_guarded<'a>(
        calls: &'a Cell<u32>,
        min_percent: f64,
    ) -> Guarded<impl Fn(&Rig, &'static str) -> String + 'a> {
        Guard::new()
            .with_rule(Box::new(BatteryMin { min_percent }))
            .wrap(move |_rig: &Rig, zone: &'static str| {
                calls.set(calls.get() + 1);
                format!("cleaned {zone}")
            })
    }

    // ------------------------------------------------------------------
    // Decision table
    // ------------------------------------------------------------------

    #[test]
    fn passing_rules_execute_action_once_and_propagate_value() {
        let calls = Cell::new(0);
        let guarded = battery_guarded(&calls, 20.0);

        let outcome = guarded.call(&Rig::healthy(), "alpha").unwrap();

        assert_eq!(outcome.into_executed().as_deref(), Some("cleaned alpha"));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn failing_rule_blocks_action_with_structured_result() {
        let calls = Cell::new(0);
        let guarded = battery_guarded(&calls, 20.0);

        let outcome = guarded.call(&Rig::drained(), "beta").unwrap();

        let result = outcome.suppressed().expect("action must be suppressed");
        assert_eq!(result.status, GuardStatus::Error);
        assert!(!result.dry_run);
        assert!(result.reason.contains("10%"));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn dry_run_with_passing_rules_simulates() {
        let calls = Cell::new(0);
        let guarded = battery_guarded(&calls, 20.0);
        let rig = Rig {
            dry: true,
            ..Rig::healthy()
        };

        let outcome = guarded.call(&rig, "gamma").unwrap();

        let result = outcome.suppressed().expect("action must be simulated");
        assert_eq!(result.status, GuardStatus::Success);
        assert!(result.dry_run);
        assert_eq!(result.reason, "checks passed (simulated)");
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn dry_run_does_not_mask_failures() {
        let calls = Cell::new(0);
        let guarded = battery_guarded(&calls, 20.0);
        let rig = Rig {
            dry: true,
            ..Rig::drained()
        };

        let outcome = guarded.call(&rig, "delta").unwrap();

        let result = outcome.suppressed().expect("action must be suppressed");
        assert_eq!(result.status, GuardStatus::Error);
        assert!(result.dry_run);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn raise_policy_signals_violation_and_never_executes() {
        let calls = Cell::new(0);
        let guarded = Guard::new()
            .with_rule(Box::new(BatteryMin { min_percent: 20.0 }))
            .on_fail(OnFail::Raise)
            .wrap(|_rig: &Rig, _args: ()| calls.set(calls.get() + 1));

        let result = guarded.call(&Rig::drained(), ());

        match result {
            Err(InterlockError::Violation {
                message,
                suggestion,
            }) => {
                assert!(message.contains("10%"));
                assert!(suggestion.contains("recharge"));
            }
            other => panic!("expected a violation, got {other:?}"),
        }
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn raise_policy_is_inert_when_rules_pass() {
        let guarded = Guard::new()
            .with_rule(Box::new(BatteryMin { min_percent: 20.0 }))
            .on_fail(OnFail::Raise)
            .wrap(|_rig: &Rig, _args: ()| "ran");

        let outcome = guarded.call(&Rig::healthy(), ()).unwrap();
        assert_eq!(outcome.into_executed(), Some("ran"));
    }

    // ------------------------------------------------------------------
    // Ordering and short-circuiting
    // ------------------------------------------------------------------

    #[test]
    fn first_failing_rule_wins() {
        let guarded = Guard::new()
            .with_rule(Box::new(AlwaysFail { tag: "first" }))
            .with_rule(Box::new(AlwaysFail { tag: "second" }))
            .wrap(|_rig: &Rig, _args: ()| ());

        let outcome = guarded.call(&Rig::healthy(), ()).unwrap();
        assert_eq!(outcome.suppressed().unwrap().reason, "first rejected");
    }

    #[test]
    fn rules_after_the_first_failure_are_not_evaluated() {
        let guarded = Guard::new()
            .with_rule(Box::new(AlwaysFail { tag: "tripwire" }))
            .with_rule(Box::new(MustNotRun))
            .wrap(|_rig: &Rig, _args: ()| ());

        // Would panic inside MustNotRun without short-circuiting.
        let outcome = guarded.call(&Rig::healthy(), ()).unwrap();
        assert!(outcome.suppressed().unwrap().is_error());
    }

    #[test]
    fn rule_order_is_insertion_order() {
        let guarded = Guard::new()
            .with_rule(Box::new(BatteryMin { min_percent: 20.0 }))
            .with_rule(Box::new(RequireConnectivity::new("WIFI")))
            .wrap(|_rig: &Rig, _args: ()| ());

        // Both rules fail; the battery rule was registered first.
        let rig = Rig {
            battery: 5.0,
            connection: "BLE",
            dry: false,
        };
        let outcome = guarded.call(&rig, ()).unwrap();
        assert!(outcome.suppressed().unwrap().reason.contains("Battery"));
    }

    #[test]
    fn empty_guard_always_permits() {
        let guarded = Guard::new().wrap(|_rig: &Rig, _args: ()| "went through");
        let outcome = guarded.call(&Rig::drained(), ()).unwrap();
        assert_eq!(outcome.into_executed(), Some("went through"));
    }

    // ------------------------------------------------------------------
    // State extraction
    // ------------------------------------------------------------------

    #[test]
    fn snapshot_is_extracted_fresh_on_every_call() {
        struct Draining {
            battery: Cell<f64>,
        }

        impl Subject for Draining {
            fn state_snapshot(&self) -> StateSnapshot {
                StateSnapshot::new().with("battery", self.battery.get())
            }
        }

        let guarded = Guard::new()
            .with_rule(Box::new(BatteryMin { min_percent: 20.0 }))
            .wrap(|_s: &Draining, _args: ()| ());

        let subject = Draining {
            battery: Cell::new(50.0),
        };
        assert!(guarded.call(&subject, ()).unwrap().is_executed());

        // The battery drains between calls; a cached snapshot would let the
        // second call through.
        subject.battery.set(5.0);
        assert!(!guarded.call(&subject, ()).unwrap().is_executed());
    }

    #[test]
    fn stateless_subject_is_judged_on_the_empty_snapshot() {
        struct Bare;
        impl Subject for Bare {}

        let guarded = Guard::new()
            .with_rule(Box::new(BatteryMin { min_percent: 20.0 }))
            .wrap(|_s: &Bare, _args: ()| ());

        // Empty snapshot + fail-safe default (0 %) → blocked.
        let outcome = guarded.call(&Bare, ()).unwrap();
        assert!(outcome.suppressed().unwrap().reason.contains("0%"));
    }

    // ------------------------------------------------------------------
    // Free-function escape hatch
    // ------------------------------------------------------------------

    #[test]
    fn unbound_call_always_executes_regardless_of_rules() {
        let calls = Cell::new(0);
        let guarded = Guard::new()
            .with_rule(Box::new(AlwaysFail { tag: "ignored" }))
            .wrap(|n: u32| {
                calls.set(calls.get() + 1);
                n * 2
            });

        // No acting entity, so the failing rule cannot stop the call.
        assert_eq!(guarded.call_unbound(21), 42);
        assert_eq!(calls.get(), 1);
    }

    // ------------------------------------------------------------------
    // Direct evaluation
    // ------------------------------------------------------------------

    #[test]
    fn evaluate_reports_pass_and_fail_verdicts() {
        let guard = Guard::new().with_rule(Box::new(BatteryMin { min_percent: 20.0 }));

        let ok = StateSnapshot::new().with("battery", 80.0);
        assert_eq!(guard.evaluate(&ok), Verdict::Pass);

        let low = StateSnapshot::new().with("battery", 10.0);
        match guard.evaluate(&low) {
            Verdict::Fail {
                message,
                suggestion,
            } => {
                assert!(message.contains("10%"));
                assert!(suggestion.contains("recharge"));
            }
            Verdict::Pass => panic!("low battery must fail"),
        }
    }
}
