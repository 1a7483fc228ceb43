//! Dashboard statistics domain types

use serde::{Deserialize, Serialize};

/// Aggregate listing statistics for the agent dashboard.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PropertyStats {
    pub total: u64,
    pub active: u64,
    pub inactive: u64,
    pub sold: u64,
    pub pending: u64,
    pub total_value: i64,
    pub average_price: i64,
}
