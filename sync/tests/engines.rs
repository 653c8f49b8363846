//! End-to-end tests for the sync engines against a scripted chain.

use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_sol_types::SolEvent;
use async_trait::async_trait;
use sable_chain::events::{EmployeeAdded, EmployeeUpdated, Transfer};
use sable_chain::{
    AssetSnapshot, ChainError, ChainSource, ContractKind, ContractRegistry, ContractsConfig,
    EmployeeSnapshot, EventKind, NetworkSnapshot, RawLog,
};
use sable_store::{CursorStore, EmployeeStore, MemoryStore, TransactionStore};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use sync_support::*;

mod sync_support {
    use super::*;

    #[derive(Default)]
    pub struct MockInner {
        pub head: u64,
        pub logs: HashMap<(ContractKind, EventKind), Vec<RawLog>>,
        pub timestamps: HashMap<u64, u64>,
        pub employees: HashMap<u64, EmployeeSnapshot>,
        pub assets: HashMap<u64, AssetSnapshot>,
        pub networks: HashMap<u64, NetworkSnapshot>,
        /// Every (contract, event, from, to) range the engines asked for.
        pub queries: Vec<(ContractKind, EventKind, u64, u64)>,
    }

    #[derive(Clone, Default)]
    pub struct MockChain {
        inner: Arc<Mutex<MockInner>>,
    }

    impl MockChain {
        pub fn with_head(head: u64) -> Self {
            let chain = Self::default();
            chain.set_head(head);
            chain
        }

        pub fn set_head(&self, head: u64) {
            self.inner.lock().unwrap().head = head;
        }

        pub fn push_log(&self, contract: ContractKind, event: EventKind, log: RawLog) {
            self.inner
                .lock()
                .unwrap()
                .logs
                .entry((contract, event))
                .or_default()
                .push(log);
        }

        pub fn set_timestamp(&self, block: u64, ts: u64) {
            self.inner.lock().unwrap().timestamps.insert(block, ts);
        }

        pub fn set_employee(&self, id: u64, snap: EmployeeSnapshot) {
            self.inner.lock().unwrap().employees.insert(id, snap);
        }

        pub fn queries_for(&self, contract: ContractKind, event: EventKind) -> Vec<(u64, u64)> {
            self.inner
                .lock()
                .unwrap()
                .queries
                .iter()
                .filter(|(c, e, _, _)| *c == contract && *e == event)
                .map(|(_, _, from, to)| (*from, *to))
                .collect()
        }

        pub fn query_count(&self) -> usize {
            self.inner.lock().unwrap().queries.len()
        }
    }

    #[async_trait]
    impl ChainSource for MockChain {
        async fn head_block(&self) -> Result<u64, ChainError> {
            Ok(self.inner.lock().unwrap().head)
        }

        async fn block_timestamp(&self, number: u64) -> Result<u64, ChainError> {
            self.inner
                .lock()
                .unwrap()
                .timestamps
                .get(&number)
                .copied()
                .ok_or(ChainError::BlockNotFound(number))
        }

        async fn logs(
            &self,
            contract: ContractKind,
            event: EventKind,
            from_block: u64,
            to_block: u64,
        ) -> Result<Vec<RawLog>, ChainError> {
            let mut inner = self.inner.lock().unwrap();
            inner.queries.push((contract, event, from_block, to_block));
            let mut logs: Vec<RawLog> = inner
                .logs
                .get(&(contract, event))
                .map(|all| {
                    all.iter()
                        .filter(|l| {
                            l.block_number
                                .map(|b| b >= from_block && b <= to_block)
                                .unwrap_or(false)
                        })
                        .cloned()
                        .collect()
                })
                .unwrap_or_default();
            logs.sort_by_key(|l| (l.block_number, l.log_index));
            Ok(logs)
        }

        async fn employee_snapshot(&self, id: u64) -> Result<EmployeeSnapshot, ChainError> {
            self.inner
                .lock()
                .unwrap()
                .employees
                .get(&id)
                .cloned()
                .ok_or(ChainError::Rpc {
                    code: 3,
                    message: "execution reverted".into(),
                })
        }

        async fn asset_snapshot(&self, id: u64) -> Result<AssetSnapshot, ChainError> {
            self.inner
                .lock()
                .unwrap()
                .assets
                .get(&id)
                .cloned()
                .ok_or(ChainError::Rpc {
                    code: 3,
                    message: "execution reverted".into(),
                })
        }

        async fn network_snapshot(&self, id: u64) -> Result<NetworkSnapshot, ChainError> {
            self.inner
                .lock()
                .unwrap()
                .networks
                .get(&id)
                .cloned()
                .ok_or(ChainError::Rpc {
                    code: 3,
                    message: "execution reverted".into(),
                })
        }
    }

    pub fn registry() -> ContractRegistry {
        ContractRegistry::from_config(&ContractsConfig {
            stable_coin: "0x0000000000000000000000000000000000000001".into(),
            payroll: "0x0000000000000000000000000000000000000002".into(),
            tag_registry: "0x0000000000000000000000000000000000000003".into(),
            asset_registry: "0x0000000000000000000000000000000000000004".into(),
            airtime_converter: "0x0000000000000000000000000000000000000005".into(),
            savings_lock: "0x0000000000000000000000000000000000000006".into(),
        })
        .unwrap()
    }

    pub fn one_token() -> U256 {
        U256::from(10u64).pow(U256::from(18u64))
    }

    pub fn raw_log<E: SolEvent>(event: &E, hash_byte: u8, block: u64, index: u64) -> RawLog {
        let data = event.encode_log_data();
        RawLog {
            address: Address::ZERO,
            topics: data.topics().to_vec(),
            data: data.data.clone(),
            block_number: Some(block),
            transaction_hash: Some(B256::repeat_byte(hash_byte)),
            log_index: Some(index),
            removed: false,
        }
    }
}

use sable_sync::{HistoricSync, LiveSync, LiveSyncConfig, Reconciler};

#[tokio::test]
async fn historic_backfill_applies_events_and_sets_cursors() {
    let chain = MockChain::with_head(20);
    chain.set_timestamp(5, 1_000);
    chain.set_timestamp(10, 2_000);
    chain.push_log(
        ContractKind::StableCoin,
        EventKind::Transfer,
        raw_log(
            &Transfer {
                from: Address::repeat_byte(1),
                to: Address::repeat_byte(2),
                value: one_token(),
            },
            0x01,
            5,
            0,
        ),
    );
    chain.push_log(
        ContractKind::Payroll,
        EventKind::EmployeeAdded,
        raw_log(
            &EmployeeAdded {
                employeeId: U256::from(7u64),
                wallet: Address::repeat_byte(0xaa),
                salary: one_token(),
            },
            0x02,
            10,
            0,
        ),
    );

    let engine = HistoricSync::new(chain.clone(), MemoryStore::new(), registry());
    let summary = engine.run().await.unwrap();
    assert_eq!(summary.head, 20);
    assert_eq!(summary.applied, 2);
    assert_eq!(summary.failed_streams, 0);

    let (_, store, _) = engine.into_parts();
    assert_eq!(store.transaction_count().unwrap(), 2);
    assert_eq!(store.get_employee(7).unwrap().unwrap().salary, "1.0");
    assert_eq!(
        store.get_cursor("stable_coin", "Transfer").unwrap(),
        Some(20)
    );
    assert_eq!(
        store.get_cursor("savings_lock", "LockWithdrawn").unwrap(),
        Some(20)
    );
}

#[tokio::test]
async fn rerunning_backfill_changes_nothing() {
    let chain = MockChain::with_head(10);
    chain.set_timestamp(3, 1_000);
    chain.push_log(
        ContractKind::StableCoin,
        EventKind::Transfer,
        raw_log(
            &Transfer {
                from: Address::repeat_byte(1),
                to: Address::repeat_byte(2),
                value: one_token(),
            },
            0x01,
            3,
            0,
        ),
    );

    let engine = HistoricSync::new(chain.clone(), MemoryStore::new(), registry());
    let first = engine.run().await.unwrap();
    assert_eq!(first.applied, 1);

    // Cursors sit at head; a second run queries nothing and applies nothing.
    let queries_after_first = chain.query_count();
    let second = engine.run().await.unwrap();
    assert_eq!(second.applied, 0);
    assert_eq!(chain.query_count(), queries_after_first);
}

#[tokio::test]
async fn later_blocks_win_over_earlier_ones() {
    let chain = MockChain::with_head(5);
    chain.set_timestamp(1, 100);
    chain.set_timestamp(2, 200);
    chain.push_log(
        ContractKind::Payroll,
        EventKind::EmployeeAdded,
        raw_log(
            &EmployeeAdded {
                employeeId: U256::from(1u64),
                wallet: Address::repeat_byte(0xaa),
                salary: one_token(),
            },
            0x01,
            1,
            0,
        ),
    );
    chain.push_log(
        ContractKind::Payroll,
        EventKind::EmployeeUpdated,
        raw_log(
            &EmployeeUpdated {
                employeeId: U256::from(1u64),
                newSalary: one_token() * U256::from(3u64),
            },
            0x02,
            2,
            0,
        ),
    );

    let engine = HistoricSync::new(chain, MemoryStore::new(), registry());
    engine.run().await.unwrap();
    let (_, store, _) = engine.into_parts();
    assert_eq!(store.get_employee(1).unwrap().unwrap().salary, "3.0");
}

#[tokio::test]
async fn backfill_resumes_from_cursor_not_genesis() {
    let chain = MockChain::with_head(10);
    chain.set_timestamp(5, 1_000);
    chain.push_log(
        ContractKind::StableCoin,
        EventKind::Transfer,
        raw_log(
            &Transfer {
                from: Address::repeat_byte(1),
                to: Address::repeat_byte(2),
                value: one_token(),
            },
            0x01,
            5,
            0,
        ),
    );

    let engine = HistoricSync::new(chain.clone(), MemoryStore::new(), registry());
    engine.run().await.unwrap();

    chain.set_head(25);
    chain.set_timestamp(15, 2_000);
    chain.push_log(
        ContractKind::StableCoin,
        EventKind::Transfer,
        raw_log(
            &Transfer {
                from: Address::repeat_byte(3),
                to: Address::repeat_byte(4),
                value: one_token(),
            },
            0x02,
            15,
            0,
        ),
    );

    let summary = engine.run().await.unwrap();
    assert_eq!(summary.applied, 1);

    let ranges = chain.queries_for(ContractKind::StableCoin, EventKind::Transfer);
    // First run scanned [0, 10]; the second resumed at 11, not 0.
    assert_eq!(ranges, vec![(0, 10), (11, 25)]);
}

#[tokio::test]
async fn undecodable_log_is_skipped_without_stalling_the_stream() {
    let chain = MockChain::with_head(10);
    chain.set_timestamp(5, 1_000);
    chain.set_timestamp(6, 1_100);

    let mut bad = raw_log(
        &Transfer {
            from: Address::repeat_byte(1),
            to: Address::repeat_byte(2),
            value: one_token(),
        },
        0x01,
        5,
        0,
    );
    bad.data = Bytes::from(vec![0xde, 0xad]);
    chain.push_log(ContractKind::StableCoin, EventKind::Transfer, bad);
    chain.push_log(
        ContractKind::StableCoin,
        EventKind::Transfer,
        raw_log(
            &Transfer {
                from: Address::repeat_byte(3),
                to: Address::repeat_byte(4),
                value: one_token(),
            },
            0x02,
            6,
            0,
        ),
    );

    let engine = HistoricSync::new(chain, MemoryStore::new(), registry());
    let summary = engine.run().await.unwrap();
    assert_eq!(summary.applied, 1);
    assert_eq!(summary.skipped, 1);

    let (_, store, _) = engine.into_parts();
    assert_eq!(
        store.get_cursor("stable_coin", "Transfer").unwrap(),
        Some(10)
    );
}

#[tokio::test]
async fn cross_stream_update_before_add_is_retried_not_lost() {
    let chain = MockChain::with_head(10);
    chain.set_timestamp(5, 1_000);
    // The update's stream sees its event before the creating event exists
    // anywhere; streams are polled independently.
    chain.push_log(
        ContractKind::Payroll,
        EventKind::EmployeeUpdated,
        raw_log(
            &EmployeeUpdated {
                employeeId: U256::from(1u64),
                newSalary: one_token() * U256::from(5u64),
            },
            0x01,
            5,
            0,
        ),
    );

    let engine = HistoricSync::new(chain.clone(), MemoryStore::new(), registry());
    let first = engine.run().await.unwrap();
    assert_eq!(first.applied, 0);
    assert_eq!(first.failed_streams, 1);

    // The creating event lands later, on its own stream.
    chain.set_head(20);
    chain.set_timestamp(15, 2_000);
    chain.push_log(
        ContractKind::Payroll,
        EventKind::EmployeeAdded,
        raw_log(
            &EmployeeAdded {
                employeeId: U256::from(1u64),
                wallet: Address::repeat_byte(0xaa),
                salary: one_token(),
            },
            0x02,
            15,
            0,
        ),
    );

    let second = engine.run().await.unwrap();
    assert_eq!(second.failed_streams, 0);
    assert_eq!(second.applied, 2);

    let (_, store, _) = engine.into_parts();
    assert_eq!(store.get_employee(1).unwrap().unwrap().salary, "5.0");
    assert_eq!(store.transaction_count().unwrap(), 2);
}

#[tokio::test]
async fn live_sync_anchors_to_head_then_follows_it() {
    let chain = MockChain::with_head(10);
    let store = Arc::new(MemoryStore::new());
    let handle = LiveSync::new(
        Arc::new(chain.clone()),
        Arc::clone(&store),
        Arc::new(registry()),
    )
    .with_config(LiveSyncConfig {
        poll_interval: Duration::from_millis(20),
        shutdown_grace: Duration::from_secs(5),
    })
    .start();

    tokio::time::sleep(Duration::from_millis(60)).await;

    chain.set_timestamp(11, 5_000);
    chain.push_log(
        ContractKind::StableCoin,
        EventKind::Transfer,
        raw_log(
            &Transfer {
                from: Address::repeat_byte(1),
                to: Address::repeat_byte(2),
                value: one_token(),
            },
            0x01,
            11,
            0,
        ),
    );
    chain.set_head(11);

    tokio::time::sleep(Duration::from_millis(100)).await;
    handle.stop().await;

    assert_eq!(store.transaction_count().unwrap(), 1);
    // The engine anchored to head - 1 = 9 and never scanned below it.
    let ranges = chain.queries_for(ContractKind::StableCoin, EventKind::Transfer);
    assert!(ranges.iter().all(|(from, _)| *from >= 10), "got ranges {ranges:?}");
    assert_eq!(store.get_cursor("stable_coin", "Transfer").unwrap(), Some(11));
}

#[tokio::test]
async fn live_sync_resumes_from_persisted_cursor() {
    let chain = MockChain::with_head(20);
    let store = Arc::new(MemoryStore::new());
    store.set_cursor("stable_coin", "Transfer", 14).unwrap();

    chain.set_timestamp(16, 7_000);
    chain.push_log(
        ContractKind::StableCoin,
        EventKind::Transfer,
        raw_log(
            &Transfer {
                from: Address::repeat_byte(5),
                to: Address::repeat_byte(6),
                value: one_token(),
            },
            0x03,
            16,
            0,
        ),
    );

    let handle = LiveSync::new(
        Arc::new(chain.clone()),
        Arc::clone(&store),
        Arc::new(registry()),
    )
    .with_config(LiveSyncConfig {
        poll_interval: Duration::from_millis(20),
        shutdown_grace: Duration::from_secs(5),
    })
    .start();

    tokio::time::sleep(Duration::from_millis(100)).await;
    handle.stop().await;

    // The stream with a cursor queried [15, 20] on its very first tick.
    let ranges = chain.queries_for(ContractKind::StableCoin, EventKind::Transfer);
    assert!(ranges.contains(&(15, 20)), "got ranges {ranges:?}");
    assert_eq!(store.transaction_count().unwrap(), 1);
}

#[tokio::test]
async fn reconciler_overwrites_drifted_employee_state() {
    let chain = MockChain::with_head(0);
    let store = MemoryStore::new();
    store
        .upsert_employee(&sable_types::EmployeeRecord::new(
            1,
            sable_types::EvmAddress::new("0xaa00000000000000000000000000000000000001"),
            "1.0",
        ))
        .unwrap();
    chain.set_employee(
        1,
        EmployeeSnapshot {
            wallet: sable_types::EvmAddress::new("0xaa00000000000000000000000000000000000001"),
            salary: "2.0".into(),
            last_payout_time: 9_000,
            active: true,
        },
    );

    let reconciler = Reconciler::new(chain, store);
    let summary = reconciler.run().await.unwrap();
    assert_eq!(summary.checked, 1);
    assert_eq!(summary.corrected, 1);
    assert_eq!(summary.failed, 0);

    let (_, store) = reconciler.into_parts();
    let emp = store.get_employee(1).unwrap().unwrap();
    assert_eq!(emp.salary, "2.0");
    assert_eq!(emp.last_payout_time, 9_000);
}

#[tokio::test]
async fn reconciler_skips_unreadable_entities() {
    let chain = MockChain::with_head(0);
    let store = MemoryStore::new();
    store
        .upsert_employee(&sable_types::EmployeeRecord::new(
            1,
            sable_types::EvmAddress::new("0xaa00000000000000000000000000000000000001"),
            "1.0",
        ))
        .unwrap();
    // No snapshot scripted for id 1: the read reverts.

    let reconciler = Reconciler::new(chain, store);
    let summary = reconciler.run().await.unwrap();
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.corrected, 0);
}
