//! Per-resource state controllers.
//!
//! Each controller owns one slice of UI state (`{ data, loading, error }`
//! plus resource-specific actions) and is that slice's sole mutator.
//! Failures are converted to human-readable strings in the snapshot; they
//! never propagate to the caller.

mod agents;
mod auth;
mod properties;
mod property;
mod stats;

pub use agents::{AgentsController, AgentsSnapshot};
pub use auth::{AuthContext, AuthController, AuthSnapshot};
pub use properties::{PropertiesController, PropertiesSnapshot};
pub use property::{PropertyController, PropertySnapshot, TracesController, TracesSnapshot};
pub use stats::{StatsController, StatsSnapshot};
