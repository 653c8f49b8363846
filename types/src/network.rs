//! Airtime network record.

use serde::{Deserialize, Serialize};

/// A mobile network supported by the airtime converter, keyed by the
/// contract-assigned network id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkRecord {
    pub id: u64,
    pub name: String,
    /// Token-to-airtime conversion rate as a decimal string.
    pub conversion_rate: String,
    pub active: bool,
}
