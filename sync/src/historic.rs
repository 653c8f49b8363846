//! Historic backfill: catch every tracked event stream up to the chain head.
//!
//! Each (contract, event) pair has its own persisted cursor, so a crash
//! between streams never silently skips part of a sparse stream's window.
//! Streams fail independently; one stream's RPC trouble does not abort the
//! backfill of the others, it just parks that stream's cursor so the next
//! run resumes at the point of failure.

use crate::apply::{apply_event, ApplyOutcome};
use crate::error::SyncError;
use sable_chain::{decode_log, tracked_pairs, ChainError, ChainSource, ContractRegistry};
use sable_store::LedgerStore;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Largest `[from, to]` window requested from the node in one getLogs call.
const MAX_LOG_WINDOW: u64 = 10_000;

/// What a backfill run did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HistoricSummary {
    /// Chain head the run synced up to.
    pub head: u64,
    /// Events newly applied across all streams.
    pub applied: u64,
    /// Duplicate or undecodable events skipped.
    pub skipped: u64,
    /// Streams that failed and kept their old cursor.
    pub failed_streams: usize,
}

/// One-shot backfill engine. Run at startup, before live sync.
pub struct HistoricSync<C, S> {
    chain: C,
    store: S,
    registry: ContractRegistry,
}

impl<C, S> HistoricSync<C, S>
where
    C: ChainSource,
    S: LedgerStore,
{
    pub fn new(chain: C, store: S, registry: ContractRegistry) -> Self {
        Self {
            chain,
            store,
            registry,
        }
    }

    /// Release the chain, store and registry after the backfill is done.
    pub fn into_parts(self) -> (C, S, ContractRegistry) {
        (self.chain, self.store, self.registry)
    }

    /// Backfill every tracked stream up to the current head.
    ///
    /// Only fails outright when the head itself cannot be read; per-stream
    /// errors are logged and counted in the summary.
    pub async fn run(&self) -> Result<HistoricSummary, SyncError> {
        let head = self.chain.head_block().await?;
        let mut summary = HistoricSummary {
            head,
            ..Default::default()
        };
        // Block timestamps repeat heavily across streams; memoize per run.
        let mut timestamps: HashMap<u64, u64> = HashMap::new();

        for (contract, event) in tracked_pairs() {
            match self
                .sync_stream(contract.as_str(), event.name(), contract, event, head, &mut timestamps)
                .await
            {
                Ok((applied, skipped)) => {
                    summary.applied += applied;
                    summary.skipped += skipped;
                }
                Err(err) => {
                    warn!(%contract, %event, %err, "stream backfill failed; will retry next run");
                    summary.failed_streams += 1;
                }
            }
        }

        info!(
            head = summary.head,
            applied = summary.applied,
            skipped = summary.skipped,
            failed_streams = summary.failed_streams,
            "historic sync complete"
        );
        Ok(summary)
    }

    async fn sync_stream(
        &self,
        contract_name: &str,
        event_name: &str,
        contract: sable_chain::ContractKind,
        event: sable_chain::EventKind,
        head: u64,
        timestamps: &mut HashMap<u64, u64>,
    ) -> Result<(u64, u64), SyncError> {
        let from = match self.store.get_cursor(contract_name, event_name)? {
            Some(cursor) => cursor.saturating_add(1),
            // Older stores carry only the global watermark; resume past it
            // rather than rescanning from genesis. Pin the start as this
            // stream's cursor right away, so a failed run retries the same
            // range instead of re-deriving a watermark that has since moved.
            None => {
                let start = match self.store.max_block_number()? {
                    Some(max) => max.saturating_add(1),
                    None => 0,
                };
                if start > 0 {
                    self.store.set_cursor(contract_name, event_name, start - 1)?;
                }
                start
            }
        };
        if from > head {
            debug!(contract = contract_name, event = event_name, "stream already at head");
            return Ok((0, 0));
        }

        let mut applied = 0u64;
        let mut skipped = 0u64;
        let mut window_start = from;
        while window_start <= head {
            let window_end = head.min(window_start.saturating_add(MAX_LOG_WINDOW - 1));
            let logs = self
                .chain
                .logs(contract, event, window_start, window_end)
                .await?;
            debug!(
                contract = contract_name,
                event = event_name,
                from = window_start,
                to = window_end,
                count = logs.len(),
                "fetched log window"
            );

            for raw in &logs {
                let decoded = match decode_log(contract, raw) {
                    Ok(Some(ev)) => ev,
                    Ok(None) => continue,
                    Err(err) => {
                        warn!(
                            contract = contract_name,
                            event = event_name,
                            %err,
                            "undecodable log skipped"
                        );
                        skipped += 1;
                        continue;
                    }
                };
                let ts = match timestamps.get(&decoded.block_number) {
                    Some(ts) => *ts,
                    None => {
                        let ts = self.block_timestamp_or_zero(decoded.block_number).await?;
                        timestamps.insert(decoded.block_number, ts);
                        ts
                    }
                };
                match apply_event(&self.store, &self.registry, &decoded, ts) {
                    Ok(ApplyOutcome::Applied) => applied += 1,
                    Ok(ApplyOutcome::Duplicate) => skipped += 1,
                    Err(err) if err.is_transient() => {
                        // Park the cursor just below the failing event so the
                        // next run refetches it; everything before is already
                        // applied and will dedupe.
                        if decoded.block_number > 0 {
                            self.store.set_cursor(
                                contract_name,
                                event_name,
                                decoded.block_number - 1,
                            )?;
                        }
                        return Err(err);
                    }
                    Err(err) => {
                        warn!(
                            contract = contract_name,
                            event = event_name,
                            tx = %decoded.tx_hash,
                            %err,
                            "event rejected; skipped"
                        );
                        skipped += 1;
                    }
                }
            }

            // The window is fully processed; move the watermark so a crash
            // resumes after it instead of refetching.
            self.store.set_cursor(contract_name, event_name, window_end)?;
            window_start = window_end.saturating_add(1);
        }

        Ok((applied, skipped))
    }

    /// Pruned blocks lose their timestamp but not their events; record those
    /// with timestamp 0 rather than dropping them.
    async fn block_timestamp_or_zero(&self, number: u64) -> Result<u64, SyncError> {
        match self.chain.block_timestamp(number).await {
            Ok(ts) => Ok(ts),
            Err(ChainError::BlockNotFound(_)) => Ok(0),
            Err(err) => Err(err.into()),
        }
    }
}
