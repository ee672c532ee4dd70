//! `interlock-kernel` – Guard enforcement
//!
//! The interception layer of the interlock stack. It does not drive hardware;
//! it decides whether hardware may be driven.
//!
//! # Modules
//!
//! - [`subject`] – [`Subject`][subject::Subject]: the capability interface an
//!   acting entity implements to expose a state snapshot and a dry-run flag
//!   to the guard engine. Both methods carry benign defaults, so state-less
//!   entities participate without ceremony.
//! - [`rules`] – [`Rule`][rules::Rule]: a pure precondition predicate over a
//!   state snapshot, plus the built-in rules
//!   ([`BatteryMin`][rules::BatteryMin], [`MaxTemp`][rules::MaxTemp],
//!   [`RequireConnectivity`][rules::RequireConnectivity]). Missing readings
//!   never raise; each rule substitutes the value most likely to fail its own
//!   check.
//! - [`guard`] – [`Guard`][guard::Guard] / [`Guarded`][guard::Guarded]:
//!   the single interception point. [`Guard::wrap`][guard::Guard::wrap]
//!   attaches an ordered rule list and an on-failure policy to an action;
//!   every invocation then extracts fresh state, evaluates the rules in
//!   order, and resolves to execute, simulate, block, or raise.

pub mod guard;
pub mod rules;
pub mod subject;

pub use guard::{Guard, Guarded, Outcome, Verdict};
pub use rules::{BatteryMin, MaxTemp, RequireConnectivity, Rule};
pub use subject::Subject;
