//! State reconciliation against authoritative contract reads.
//!
//! Event streams can drift from contract state: a pruned block loses its
//! timestamp, an out-of-order restart can miss a targeted update for an
//! entity whose creation event was dropped. The reconciler walks every known
//! entity id, reads the contract's current state directly, and overwrites
//! the drift-prone fields. It runs after backfill and is best-effort; an
//! unreadable entity is logged and skipped, never fatal.

use crate::error::SyncError;
use sable_chain::ChainSource;
use sable_store::LedgerStore;
use sable_types::{AssetStatus, EmployeeRecord, NetworkRecord};
use tracing::{info, warn};

/// What a reconciliation pass did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub checked: u64,
    /// Entities whose stored state differed and was overwritten.
    pub corrected: u64,
    /// Entities that could not be read or written.
    pub failed: u64,
}

/// Overwrites drift-prone entity fields from direct contract reads.
pub struct Reconciler<C, S> {
    chain: C,
    store: S,
}

impl<C, S> Reconciler<C, S>
where
    C: ChainSource,
    S: LedgerStore,
{
    pub fn new(chain: C, store: S) -> Self {
        Self { chain, store }
    }

    pub fn into_parts(self) -> (C, S) {
        (self.chain, self.store)
    }

    /// Reconcile employees, assets and networks in one pass.
    pub async fn run(&self) -> Result<ReconcileSummary, SyncError> {
        let mut summary = ReconcileSummary::default();
        self.reconcile_employees(&mut summary).await?;
        self.reconcile_assets(&mut summary).await?;
        self.reconcile_networks(&mut summary).await?;
        info!(
            checked = summary.checked,
            corrected = summary.corrected,
            failed = summary.failed,
            "reconciliation complete"
        );
        Ok(summary)
    }

    async fn reconcile_employees(&self, summary: &mut ReconcileSummary) -> Result<(), SyncError> {
        for id in self.store.employee_ids()? {
            summary.checked += 1;
            let snap = match self.chain.employee_snapshot(id).await {
                Ok(snap) => snap,
                Err(err) => {
                    warn!(employee = id, %err, "employee snapshot failed; skipped");
                    summary.failed += 1;
                    continue;
                }
            };
            let Some(stored) = self.store.get_employee(id)? else {
                continue;
            };
            let authoritative = EmployeeRecord {
                id,
                wallet: snap.wallet,
                salary: snap.salary,
                last_payout_time: snap.last_payout_time,
                active: snap.active,
            };
            if stored != authoritative {
                self.store.upsert_employee(&authoritative)?;
                summary.corrected += 1;
            }
        }
        Ok(())
    }

    async fn reconcile_assets(&self, summary: &mut ReconcileSummary) -> Result<(), SyncError> {
        for id in self.store.asset_ids()? {
            summary.checked += 1;
            let snap = match self.chain.asset_snapshot(id).await {
                Ok(snap) => snap,
                Err(err) => {
                    warn!(asset = id, %err, "asset snapshot failed; skipped");
                    summary.failed += 1;
                    continue;
                }
            };
            let status = match AssetStatus::try_from(snap.status) {
                Ok(status) => status,
                Err(err) => {
                    warn!(asset = id, %err, "asset snapshot carried bad status; skipped");
                    summary.failed += 1;
                    continue;
                }
            };
            let Some(stored) = self.store.get_asset(id)? else {
                continue;
            };
            if stored.owner != snap.owner
                || stored.value != snap.value
                || stored.verified != snap.verified
                || stored.status != status
            {
                self.store
                    .reconcile_asset(id, &snap.owner, &snap.value, snap.verified, status)?;
                summary.corrected += 1;
            }
        }
        Ok(())
    }

    async fn reconcile_networks(&self, summary: &mut ReconcileSummary) -> Result<(), SyncError> {
        for id in self.store.network_ids()? {
            summary.checked += 1;
            let snap = match self.chain.network_snapshot(id).await {
                Ok(snap) => snap,
                Err(err) => {
                    warn!(network = id, %err, "network snapshot failed; skipped");
                    summary.failed += 1;
                    continue;
                }
            };
            let Some(stored) = self.store.get_network(id)? else {
                continue;
            };
            let authoritative = NetworkRecord {
                id,
                name: snap.name,
                conversion_rate: snap.rate,
                active: snap.active,
            };
            if stored != authoritative {
                self.store.upsert_network(&authoritative)?;
                summary.corrected += 1;
            }
        }
        Ok(())
    }
}
