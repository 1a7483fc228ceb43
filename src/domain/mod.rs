//! Domain types consumed and produced by the data layer.

pub mod admin;
pub mod agent;
pub mod auth;
pub mod lead;
pub mod notification;
pub mod property;
pub mod stats;
pub mod trace;
