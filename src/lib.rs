//! Client data layer for the Million luxury real-estate platform.
//!
//! Everything between the UI and the REST backend: durable session and
//! favorites storage, the auth service owning the token lifecycle, a typed
//! API client, a mock/live data-service facade with offline fallback, and
//! per-resource state controllers the dashboard renders from.

pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod resources;
pub mod services;
pub mod storage;

pub use config::{DataMode, Environment, Settings};
pub use error::{ClientError, ClientResult};
