//! Raw log entries as returned by `eth_getLogs`.

use alloy_primitives::{Address, Bytes, B256};
use serde::{Deserialize, Deserializer};

/// One raw log entry from the node, before decoding.
///
/// Block number, transaction hash and log index are optional on the wire
/// (they are absent for pending logs); the decoder rejects logs without
/// them rather than inventing placeholders.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLog {
    pub address: Address,
    pub topics: Vec<B256>,
    pub data: Bytes,
    #[serde(default, deserialize_with = "quantity_opt")]
    pub block_number: Option<u64>,
    #[serde(default)]
    pub transaction_hash: Option<B256>,
    #[serde(default, deserialize_with = "quantity_opt")]
    pub log_index: Option<u64>,
    /// True when the log was removed by a re-org; such logs are skipped.
    #[serde(default)]
    pub removed: bool,
}

impl RawLog {
    /// The event signature hash, if the log has any topics at all.
    pub fn topic0(&self) -> Option<B256> {
        self.topics.first().copied()
    }
}

fn quantity_opt<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(s) => {
            let digits = s.strip_prefix("0x").unwrap_or(&s);
            u64::from_str_radix(digits, 16)
                .map(Some)
                .map_err(serde::de::Error::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_wire_shape() {
        let json = r#"{
            "address": "0x455e53cbb86018ac2b8092fdcd39d8444affc3f6",
            "topics": ["0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef"],
            "data": "0x",
            "blockNumber": "0x10",
            "transactionHash": "0x00000000000000000000000000000000000000000000000000000000000000aa",
            "logIndex": "0x2",
            "removed": false
        }"#;
        let log: RawLog = serde_json::from_str(json).unwrap();
        assert_eq!(log.block_number, Some(16));
        assert_eq!(log.log_index, Some(2));
        assert!(!log.removed);
        assert!(log.topic0().is_some());
    }

    #[test]
    fn pending_log_has_no_block_number() {
        let json = r#"{
            "address": "0x455e53cbb86018ac2b8092fdcd39d8444affc3f6",
            "topics": [],
            "data": "0x"
        }"#;
        let log: RawLog = serde_json::from_str(json).unwrap();
        assert_eq!(log.block_number, None);
        assert_eq!(log.topic0(), None);
    }
}
