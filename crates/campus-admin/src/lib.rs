//! Campus Admin: integrity rules, mutation operations and the roster
//! query engine.
//!
//! The services here are the only sanctioned way to change a loaded
//! tenant. Each operation validates, runs the relevant rules from
//! [`rules`], and commits at most one merge to the store.

pub mod billing;
pub mod config;
pub mod error;
pub mod inflight;
pub mod outcome;
pub mod query;
pub mod roster;
pub mod rules;
pub mod timezone;
pub mod validate;

pub use billing::{BillingService, CancelReason};
pub use config::ServiceConfig;
pub use error::RuleViolation;
pub use inflight::{ActionKind, InFlight};
pub use outcome::Outcome;
pub use query::{AdminRow, RosterQuery};
pub use roster::{AddedAdmin, RosterService, TransferOutcome};
pub use timezone::ViewerZone;
