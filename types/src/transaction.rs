//! The canonical ledger entry: one record per observed chain transaction.

use crate::{EvmAddress, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// What kind of on-chain activity a transaction records.
///
/// Closed set; serialized in camelCase to match the wire format consumed by
/// the REST layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TxKind {
    Transfer,
    Mint,
    Burn,
    Payroll,
    EmployeeAdded,
    EmployeeUpdate,
    EmployeeDeactivation,
    TagRegistration,
    TagUpdate,
    TagTransfer,
    AssetRegistration,
    AssetVerification,
    AssetTransfer,
    AirtimeConversion,
    LockWithdrawal,
    NetworkAdded,
    NetworkUpdate,
    NetworkDeactivation,
}

impl fmt::Display for TxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Lifecycle status of a transaction record.
///
/// `Pending` records are created synchronously by the API layer when it
/// submits a chain transaction; the sync engines flip them to `Completed`
/// when the confirming event is observed. That is the only allowed
/// transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TxStatus {
    Pending,
    Completed,
    Failed,
}

/// A single entry in the transaction ledger, keyed by transaction hash.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Transaction hash, lowercase hex. Globally unique natural key.
    pub tx_hash: String,
    pub from: EvmAddress,
    pub to: EvmAddress,
    /// Decimal string with 18-decimal fixed-point semantics ("1.0", "0.25").
    /// Kept as a string end to end; never parsed into a float.
    pub amount: String,
    pub kind: TxKind,
    pub status: TxStatus,
    /// Block the confirming event landed in. None while pending.
    pub block_number: Option<u64>,
    /// Block timestamp for completed chain transactions, not wall clock.
    pub timestamp: Timestamp,
    /// Event-specific extras: employeeId, networkId, tag name, phone, …
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl TransactionRecord {
    /// A completed record as derived from an observed event.
    pub fn completed(
        tx_hash: impl Into<String>,
        from: EvmAddress,
        to: EvmAddress,
        amount: impl Into<String>,
        kind: TxKind,
        block_number: u64,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            tx_hash: tx_hash.into().to_lowercase(),
            from,
            to,
            amount: amount.into(),
            kind,
            status: TxStatus::Completed,
            block_number: Some(block_number),
            timestamp,
            metadata: BTreeMap::new(),
        }
    }

    /// Attach one metadata entry (builder style).
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}
