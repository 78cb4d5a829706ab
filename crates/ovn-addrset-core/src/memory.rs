// # Memory Northbound
//
// In-memory implementation of `NorthboundClient`.
//
// ## Purpose
//
// Behaves like the `Address_Set` table of a northbound database without
// running one: the hashed name is a unique index, `set`/`clear` on a missing
// row fail, and `destroy` of a missing row is a no-op. Useful for tests and
// for embedding the store in programs that have no OVN deployment.
//
// ## Crash Behavior
//
// Nothing is persisted. All rows are lost when the value is dropped.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

use crate::error::{Error, Result};
use crate::traits::{
    AddressSetOp, AddressSetQuery, AddressSetRecord, EXTERNAL_ID_NAME, NorthboundClient,
};

/// In-memory address set table
///
/// # Example
///
/// ```rust,no_run
/// use ovn_addrset_core::memory::MemoryNorthbound;
/// use ovn_addrset_core::traits::{AddressSetOp, NorthboundClient};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let nb = MemoryNorthbound::new();
///
///     nb.mutate(&AddressSetOp::Create {
///         hashed_name: "a1".to_string(),
///         name: "ns1".to_string(),
///         addresses: vec!["10.0.0.1".to_string()],
///     })
///     .await?;
///
///     assert!(nb.get("a1").await.is_some());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryNorthbound {
    rows: Arc<RwLock<BTreeMap<String, AddressSetRecord>>>,
    next_uuid: Arc<AtomicU64>,
}

impl MemoryNorthbound {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a row by hashed name
    pub async fn get(&self, hashed_name: &str) -> Option<AddressSetRecord> {
        self.rows.read().await.get(hashed_name).cloned()
    }

    /// Number of rows
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    /// Check if the table is empty
    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }

    /// Insert a row as-is, replacing any row with the same name
    ///
    /// Used to seed rows that this crate would never create itself, such as
    /// sets owned by another component without `external_ids:name`.
    pub async fn insert(&self, mut record: AddressSetRecord) {
        if record.uuid.is_none() {
            record.uuid = Some(self.allocate_uuid());
        }
        self.rows
            .write()
            .await
            .insert(record.hashed_name.clone(), record);
    }

    fn allocate_uuid(&self) -> String {
        let n = self.next_uuid.fetch_add(1, Ordering::SeqCst) + 1;
        format!("00000000-0000-0000-0000-{:012x}", n)
    }
}

#[async_trait]
impl NorthboundClient for MemoryNorthbound {
    async fn query(&self, query: &AddressSetQuery) -> Result<Vec<AddressSetRecord>> {
        let guard = self.rows.read().await;
        Ok(match query {
            AddressSetQuery::All => guard.values().cloned().collect(),
            AddressSetQuery::ByName(hashed_name) => {
                guard.get(hashed_name).cloned().into_iter().collect()
            }
        })
    }

    async fn mutate(&self, op: &AddressSetOp) -> Result<()> {
        let mut guard = self.rows.write().await;
        match op {
            AddressSetOp::Create {
                hashed_name,
                name,
                addresses,
            } => {
                if guard.contains_key(hashed_name) {
                    return Err(Error::northbound(format!(
                        "constraint violation: address_set {} already exists",
                        hashed_name
                    )));
                }
                let mut record = AddressSetRecord::new(hashed_name.clone());
                record.uuid = Some(self.allocate_uuid());
                record
                    .external_ids
                    .insert(EXTERNAL_ID_NAME.to_string(), name.clone());
                record.addresses = addresses.iter().cloned().collect();
                guard.insert(hashed_name.clone(), record);
            }
            AddressSetOp::SetAddresses {
                hashed_name,
                addresses,
            } => {
                let record = guard.get_mut(hashed_name).ok_or_else(|| no_row(hashed_name))?;
                record.addresses = addresses.iter().cloned().collect();
            }
            AddressSetOp::ClearAddresses { hashed_name } => {
                let record = guard.get_mut(hashed_name).ok_or_else(|| no_row(hashed_name))?;
                record.addresses.clear();
            }
            AddressSetOp::DestroyIfExists { hashed_name } => {
                guard.remove(hashed_name);
            }
        }
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

fn no_row(hashed_name: &str) -> Error {
    Error::northbound(format!("no row \"{}\" in table address_set", hashed_name))
}
