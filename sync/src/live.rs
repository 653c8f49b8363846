//! Live sync: poll each tracked event stream forward from the chain head.
//!
//! One task per (contract, event) pair. The first tick only observes the
//! head and queries nothing, so a freshly started stream never refetches
//! the range historic sync just covered; every later tick queries exactly
//! `[last_seen + 1, head]`. A failed tick leaves `last_seen` (and the
//! persisted cursor) where it was, so the next tick retries the same range.

use crate::apply::{apply_event, ApplyOutcome};
use crate::error::SyncError;
use sable_chain::{
    decode_log, tracked_pairs, ChainError, ChainSource, ContractKind, ContractRegistry, EventKind,
};
use sable_store::LedgerStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

#[derive(Clone, Copy, Debug)]
pub struct LiveSyncConfig {
    /// Delay between polling ticks, per stream.
    pub poll_interval: Duration,
    /// How long `stop` waits for in-flight ticks before detaching them.
    pub shutdown_grace: Duration,
}

impl Default for LiveSyncConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(12),
            shutdown_grace: Duration::from_secs(30),
        }
    }
}

/// The live polling engine. `start` consumes it and returns a handle.
pub struct LiveSync<C, S> {
    chain: Arc<C>,
    store: Arc<S>,
    registry: Arc<ContractRegistry>,
    config: LiveSyncConfig,
}

/// Handle to a running live sync; dropping it does NOT stop the tasks,
/// call [`LiveSyncHandle::stop`].
pub struct LiveSyncHandle {
    stop_tx: watch::Sender<bool>,
    tasks: Vec<JoinHandle<()>>,
    grace: Duration,
}

impl LiveSyncHandle {
    /// Signal every stream task to stop and wait for in-flight ticks to
    /// finish, up to the configured grace period.
    pub async fn stop(self) {
        // Receivers may already be gone if tasks exited on their own.
        let _ = self.stop_tx.send(true);
        for mut task in self.tasks {
            match tokio::time::timeout(self.grace, &mut task).await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => warn!(%err, "live sync task panicked"),
                Err(_) => {
                    warn!("live sync task did not stop within grace period; aborting");
                    task.abort();
                }
            }
        }
        info!("live sync stopped");
    }
}

impl<C, S> LiveSync<C, S>
where
    C: ChainSource + 'static,
    S: LedgerStore + Send + Sync + 'static,
{
    pub fn new(chain: Arc<C>, store: Arc<S>, registry: Arc<ContractRegistry>) -> Self {
        Self {
            chain,
            store,
            registry,
            config: LiveSyncConfig::default(),
        }
    }

    pub fn with_config(mut self, config: LiveSyncConfig) -> Self {
        self.config = config;
        self
    }

    /// Spawn one polling task per tracked stream.
    pub fn start(self) -> LiveSyncHandle {
        let (stop_tx, stop_rx) = watch::channel(false);
        let mut tasks = Vec::new();
        for (contract, event) in tracked_pairs() {
            let worker = StreamWorker {
                chain: Arc::clone(&self.chain),
                store: Arc::clone(&self.store),
                registry: Arc::clone(&self.registry),
                contract,
                event,
                poll_interval: self.config.poll_interval,
            };
            tasks.push(tokio::spawn(worker.run(stop_rx.clone())));
        }
        info!(streams = tasks.len(), "live sync started");
        LiveSyncHandle {
            stop_tx,
            tasks,
            grace: self.config.shutdown_grace,
        }
    }
}

struct StreamWorker<C, S> {
    chain: Arc<C>,
    store: Arc<S>,
    registry: Arc<ContractRegistry>,
    contract: ContractKind,
    event: EventKind,
    poll_interval: Duration,
}

impl<C, S> StreamWorker<C, S>
where
    C: ChainSource,
    S: LedgerStore,
{
    async fn run(self, mut stop_rx: watch::Receiver<bool>) {
        // Resume from the persisted cursor when one exists; otherwise the
        // first tick anchors to head - 1 without querying.
        let mut last_seen = match self.store.get_cursor(self.contract.as_str(), self.event.name())
        {
            Ok(cursor) => cursor,
            Err(err) => {
                warn!(contract = %self.contract, event = %self.event, %err,
                    "cursor read failed; anchoring to head");
                None
            }
        };

        loop {
            if *stop_rx.borrow() {
                break;
            }
            match self.tick(last_seen).await {
                Ok(seen) => last_seen = Some(seen),
                Err(err) => {
                    warn!(contract = %self.contract, event = %self.event, %err,
                        "tick failed; will retry same range");
                }
            }
            tokio::select! {
                _ = tokio::time::sleep(self.poll_interval) => {}
                _ = stop_rx.changed() => break,
            }
        }
        debug!(contract = %self.contract, event = %self.event, "stream worker stopped");
    }

    /// One polling tick. Returns the new high-water block on success.
    async fn tick(&self, last_seen: Option<u64>) -> Result<u64, SyncError> {
        let head = self.chain.head_block().await?;
        let Some(last_seen) = last_seen else {
            // First observation: anchor just below head, query nothing.
            return Ok(head.saturating_sub(1));
        };
        if head <= last_seen {
            return Ok(last_seen);
        }

        let from = last_seen + 1;
        let logs = self.chain.logs(self.contract, self.event, from, head).await?;
        for raw in &logs {
            let decoded = match decode_log(self.contract, raw) {
                Ok(Some(ev)) => ev,
                Ok(None) => continue,
                Err(err) => {
                    warn!(contract = %self.contract, event = %self.event, %err,
                        "undecodable log skipped");
                    continue;
                }
            };
            let ts = match self.chain.block_timestamp(decoded.block_number).await {
                Ok(ts) => ts,
                Err(ChainError::BlockNotFound(_)) => 0,
                Err(err) => return Err(err.into()),
            };
            match apply_event(self.store.as_ref(), &self.registry, &decoded, ts) {
                Ok(ApplyOutcome::Applied) => {
                    debug!(contract = %self.contract, event = %self.event,
                        block = decoded.block_number, tx = %decoded.tx_hash, "event applied");
                }
                Ok(ApplyOutcome::Duplicate) => {}
                // Fail the tick so the range is retried; already-applied
                // events in it dedupe on the next pass.
                Err(err) if err.is_transient() => return Err(err),
                Err(err) => {
                    warn!(contract = %self.contract, event = %self.event,
                        tx = %decoded.tx_hash, %err, "event rejected; skipped");
                }
            }
        }

        self.store
            .set_cursor(self.contract.as_str(), self.event.name(), head)?;
        Ok(head)
    }
}
