//! Property trace domain types
//!
//! Traces are an immutable timeline of valuation/sale events tied to a
//! listing. The client only ever reads them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PropertyTrace {
    pub id: Uuid,
    pub property_id: Uuid,
    pub name: String,
    pub value: i64,
    pub tax: i64,
    pub date_sale: DateTime<Utc>,
}
