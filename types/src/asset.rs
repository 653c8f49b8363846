//! Registered asset record.

use crate::{EvmAddress, Timestamp};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raised when the chain reports a category/status discriminant outside the
/// contract's declared 0–4 range.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("value {0} is out of range for {1}")]
pub struct OutOfRange(pub u8, pub &'static str);

/// Asset category as declared by the AssetRegistry contract (uint8 0–4).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AssetCategory {
    Electronics,
    Vehicles,
    RealEstate,
    Documents,
    Other,
}

impl TryFrom<u8> for AssetCategory {
    type Error = OutOfRange;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(Self::Electronics),
            1 => Ok(Self::Vehicles),
            2 => Ok(Self::RealEstate),
            3 => Ok(Self::Documents),
            4 => Ok(Self::Other),
            other => Err(OutOfRange(other, "AssetCategory")),
        }
    }
}

/// Asset lifecycle status (uint8 0–4 on chain).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AssetStatus {
    Registered,
    PendingVerification,
    Verified,
    Disputed,
    Retired,
}

impl TryFrom<u8> for AssetStatus {
    type Error = OutOfRange;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(Self::Registered),
            1 => Ok(Self::PendingVerification),
            2 => Ok(Self::Verified),
            3 => Ok(Self::Disputed),
            4 => Ok(Self::Retired),
            other => Err(OutOfRange(other, "AssetStatus")),
        }
    }
}

/// One registered asset, keyed by the contract-assigned asset id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRecord {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub location: String,
    /// Opaque metadata blob (IPFS URI or JSON) carried through unparsed.
    pub metadata: String,
    pub category: AssetCategory,
    pub status: AssetStatus,
    /// Declared value as a decimal string (18-decimal fixed point).
    pub value: String,
    pub owner: EvmAddress,
    pub verified: bool,
    pub registered_at: Timestamp,
    pub updated_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_rejects_out_of_range() {
        assert_eq!(AssetCategory::try_from(4), Ok(AssetCategory::Other));
        assert!(AssetCategory::try_from(5).is_err());
    }

    #[test]
    fn status_covers_full_range() {
        for v in 0u8..=4 {
            assert!(AssetStatus::try_from(v).is_ok());
        }
        assert!(AssetStatus::try_from(255).is_err());
    }
}
