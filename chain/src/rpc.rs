//! Low-level JSON-RPC client with bounded retry and backoff.
//!
//! Retry lives here, at the RPC boundary, not in the engines' tick loops:
//! transport blips (timeouts, disconnects, rate limits) are retried with
//! exponential backoff up to a bounded attempt count, while protocol-level
//! JSON-RPC errors are returned immediately so a misconfiguration surfaces
//! instead of being retried forever.

use crate::error::ChainError;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Bounded exponential backoff policy for transient RPC failures.
#[derive(Clone, Copy, Debug)]
pub struct RetryPolicy {
    /// Total attempts, including the first (1 = no retry).
    pub max_attempts: u32,
    /// Delay before the first retry; doubles each attempt.
    pub base_delay: Duration,
    /// Upper bound on any single delay.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            base_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(8),
        }
    }
}

impl RetryPolicy {
    /// Backoff delay before retry number `attempt` (0-based), capped.
    pub fn delay(&self, attempt: u32) -> Duration {
        let exp = self.base_delay.saturating_mul(1u32 << attempt.min(16));
        exp.min(self.max_delay)
    }
}

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: serde_json::Value,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

/// JSON-RPC over HTTP. Every request carries the client-level timeout;
/// a hung call can therefore never stall a polling loop past it.
pub struct RpcClient {
    http: reqwest::Client,
    url: String,
    retry: RetryPolicy,
    next_id: AtomicU64,
}

impl RpcClient {
    pub fn new(url: &str, timeout: Duration, retry: RetryPolicy) -> Result<Self, ChainError> {
        reqwest::Url::parse(url)
            .map_err(|e| ChainError::Config(format!("invalid rpc url '{url}': {e}")))?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ChainError::Config(format!("http client: {e}")))?;
        Ok(Self {
            http,
            url: url.to_string(),
            retry,
            next_id: AtomicU64::new(1),
        })
    }

    /// Issue a JSON-RPC call, retrying transient transport failures.
    ///
    /// Returns the raw `result` value; a JSON `null` result is returned
    /// as-is (e.g. `eth_getBlockByNumber` for an unknown block).
    pub async fn call(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, ChainError> {
        let mut last_err = None;
        for attempt in 0..self.retry.max_attempts {
            if attempt > 0 {
                let delay = self.retry.delay(attempt - 1);
                tracing::warn!(method, attempt, ?delay, "retrying rpc call after backoff");
                tokio::time::sleep(delay).await;
            }
            match self.call_once(method, params.clone()).await {
                Ok(value) => return Ok(value),
                Err(err @ ChainError::Transport(_)) => last_err = Some(err),
                Err(other) => return Err(other),
            }
        }
        Err(last_err
            .unwrap_or_else(|| ChainError::Transport(format!("{method}: no attempts made"))))
    }

    async fn call_once(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, ChainError> {
        let req = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };

        let resp = self
            .http
            .post(&self.url)
            .json(&req)
            .send()
            .await
            .map_err(|e| ChainError::Transport(format!("{method}: {e}")))?;

        let status = resp.status();
        if status.as_u16() == 429 || status.is_server_error() {
            return Err(ChainError::Transport(format!("{method}: HTTP {status}")));
        }
        if !status.is_success() {
            return Err(ChainError::InvalidResponse(format!("{method}: HTTP {status}")));
        }

        let body: RpcResponse = resp
            .json()
            .await
            .map_err(|e| ChainError::Transport(format!("{method}: body: {e}")))?;

        if let Some(err) = body.error {
            return Err(ChainError::Rpc {
                code: err.code,
                message: err.message,
            });
        }
        Ok(body.result)
    }
}

/// Parse a JSON-RPC quantity (`"0x1a"`) into a u64.
pub(crate) fn parse_quantity(value: &serde_json::Value) -> Result<u64, ChainError> {
    let s = value
        .as_str()
        .ok_or_else(|| ChainError::InvalidResponse(format!("expected quantity, got {value}")))?;
    let digits = s.strip_prefix("0x").unwrap_or(s);
    u64::from_str_radix(digits, 16)
        .map_err(|e| ChainError::InvalidResponse(format!("bad quantity '{s}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_and_caps() {
        let policy = RetryPolicy {
            max_attempts: 5,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(350),
        };
        assert_eq!(policy.delay(0), Duration::from_millis(100));
        assert_eq!(policy.delay(1), Duration::from_millis(200));
        assert_eq!(policy.delay(2), Duration::from_millis(350));
        assert_eq!(policy.delay(10), Duration::from_millis(350));
    }

    #[test]
    fn quantity_parses_with_and_without_prefix() {
        assert_eq!(parse_quantity(&serde_json::json!("0x64")).unwrap(), 100);
        assert_eq!(parse_quantity(&serde_json::json!("ff")).unwrap(), 255);
        assert!(parse_quantity(&serde_json::json!(12)).is_err());
        assert!(parse_quantity(&serde_json::json!("0xzz")).is_err());
    }

    #[test]
    fn bad_url_is_config_error() {
        let err = RpcClient::new("not a url", Duration::from_secs(1), RetryPolicy::default())
            .err()
            .expect("must fail");
        assert!(matches!(err, ChainError::Config(_)));
    }
}
