//! The chain client: typed operations over the JSON-RPC transport.

use crate::error::ChainError;
use crate::events::EventKind;
use crate::log::RawLog;
use crate::reads::{
    decode_get_asset, decode_get_employee, decode_get_network, encode_get_asset,
    encode_get_employee, encode_get_network, AssetSnapshot, EmployeeSnapshot, NetworkSnapshot,
};
use crate::registry::{ContractKind, ContractRegistry};
use crate::rpc::{parse_quantity, RetryPolicy, RpcClient};
use crate::source::ChainSource;
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

/// Chain connection settings (TOML `[chain]` section).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChainConfig {
    pub rpc_url: String,
    /// Expected chain id; startup fails if the node reports another.
    pub chain_id: u64,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_retry_base_ms")]
    pub retry_base_ms: u64,
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_max_attempts() -> u32 {
    4
}

fn default_retry_base_ms() -> u64 {
    250
}

impl ChainConfig {
    fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts.max(1),
            base_delay: Duration::from_millis(self.retry_base_ms),
            ..RetryPolicy::default()
        }
    }
}

/// A connected chain client holding the resolved contract registry.
///
/// Transient transport failures are retried inside [`RpcClient`]; errors
/// that escape these methods have already exhausted their retries and are
/// for the caller to log and absorb.
pub struct ChainClient {
    rpc: RpcClient,
    registry: ContractRegistry,
}

impl ChainClient {
    /// Build the client and verify the node: fetches `eth_chainId` and
    /// compares it with the configured id. A mismatch or unreachable node
    /// with a bad URL is a fatal configuration error.
    pub async fn connect(
        config: &ChainConfig,
        registry: ContractRegistry,
    ) -> Result<Self, ChainError> {
        let rpc = RpcClient::new(
            &config.rpc_url,
            Duration::from_secs(config.request_timeout_secs),
            config.retry_policy(),
        )?;
        let client = Self { rpc, registry };

        let reported = parse_quantity(&client.rpc.call("eth_chainId", json!([])).await?)?;
        if reported != config.chain_id {
            return Err(ChainError::Config(format!(
                "chain id mismatch: node reports {reported}, configured {}",
                config.chain_id
            )));
        }
        tracing::info!(chain_id = reported, url = %config.rpc_url, "connected to chain node");
        Ok(client)
    }

    pub fn address_of(&self, contract: ContractKind) -> Address {
        self.registry.address_of(contract)
    }

    async fn eth_call(&self, to: Address, calldata: Vec<u8>) -> Result<Vec<u8>, ChainError> {
        let params = json!([
            { "to": format!("{to:#x}"), "data": format!("0x{}", hex::encode(calldata)) },
            "latest"
        ]);
        let result = self.rpc.call("eth_call", params).await?;
        let s = result.as_str().ok_or_else(|| {
            ChainError::InvalidResponse(format!("eth_call returned {result}"))
        })?;
        hex::decode(s.strip_prefix("0x").unwrap_or(s))
            .map_err(|e| ChainError::InvalidResponse(format!("eth_call data: {e}")))
    }
}

#[async_trait::async_trait]
impl ChainSource for ChainClient {
    async fn head_block(&self) -> Result<u64, ChainError> {
        parse_quantity(&self.rpc.call("eth_blockNumber", json!([])).await?)
    }

    async fn block_timestamp(&self, number: u64) -> Result<u64, ChainError> {
        let params = json!([format!("0x{number:x}"), false]);
        let result = self.rpc.call("eth_getBlockByNumber", params).await?;
        if result.is_null() {
            return Err(ChainError::BlockNotFound(number));
        }
        parse_quantity(result.get("timestamp").unwrap_or(&serde_json::Value::Null))
    }

    async fn logs(
        &self,
        contract: ContractKind,
        event: EventKind,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<RawLog>, ChainError> {
        let params = json!([{
            "address": format!("{:#x}", self.registry.address_of(contract)),
            "topics": [format!("{:#x}", event.topic0())],
            "fromBlock": format!("0x{from_block:x}"),
            "toBlock": format!("0x{to_block:x}"),
        }]);
        let result = self.rpc.call("eth_getLogs", params).await?;
        let mut logs: Vec<RawLog> = serde_json::from_value(result)
            .map_err(|e| ChainError::InvalidResponse(format!("eth_getLogs: {e}")))?;
        // Later events for the same entity must win, so enforce the chain's
        // natural order even if the node returns logs unsorted.
        logs.sort_by_key(|l| (l.block_number.unwrap_or(0), l.log_index.unwrap_or(0)));
        Ok(logs)
    }

    async fn employee_snapshot(&self, id: u64) -> Result<EmployeeSnapshot, ChainError> {
        let to = self.registry.address_of(ContractKind::Payroll);
        let data = self.eth_call(to, encode_get_employee(id)).await?;
        decode_get_employee(&data)
    }

    async fn asset_snapshot(&self, id: u64) -> Result<AssetSnapshot, ChainError> {
        let to = self.registry.address_of(ContractKind::AssetRegistry);
        let data = self.eth_call(to, encode_get_asset(id)).await?;
        decode_get_asset(&data)
    }

    async fn network_snapshot(&self, id: u64) -> Result<NetworkSnapshot, ChainError> {
        let to = self.registry.address_of(ContractKind::AirtimeConverter);
        let data = self.eth_call(to, encode_get_network(id)).await?;
        decode_get_network(&data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_fill_in() {
        let cfg: ChainConfig = toml::from_str(
            r#"
            rpc_url = "https://rpc.example.com"
            chain_id = 137
        "#,
        )
        .unwrap();
        assert_eq!(cfg.request_timeout_secs, 15);
        assert_eq!(cfg.max_attempts, 4);
        assert_eq!(cfg.retry_policy().max_attempts, 4);
    }
}
