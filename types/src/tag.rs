//! Payment tag record.

use crate::EvmAddress;
use serde::{Deserialize, Serialize};

/// A human-readable payment tag, keyed by its name.
///
/// Case rules for tag names are enforced upstream at registration; the
/// mirror stores the name exactly as the contract emitted it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRecord {
    pub name: String,
    /// Who controls the tag (may transfer it).
    pub owner: EvmAddress,
    /// The address payments to this tag resolve to.
    pub resolved: EvmAddress,
}
