//! Address set store
//!
//! Creates, updates and deletes address sets in the northbound database.
//!
//! ## Failure policy
//!
//! Every failure is logged at `error` level and then returned. Callers that
//! prefer to keep reconciling after a failed write can discard the result
//! (`.ok()`); callers that want to retry or surface the problem can match on
//! it.
//!
//! ## Atomicity
//!
//! [`AddressSetStore::create_or_update`] looks the row up and then writes it
//! in a second round-trip. Two concurrent calls for the same hashed name can
//! both decide to create; the second create is then rejected by the
//! database's unique index on `name`. Writes for one address set are expected
//! to come from a single owner.

use std::sync::Arc;
use tracing::{debug, error};

use crate::error::Result;
use crate::hash::hashed_address_set;
use crate::traits::{AddressSetOp, AddressSetQuery, NorthboundClient};

/// What `create_or_update` ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The address set did not exist and was created
    Created,
    /// The address set existed and its addresses were replaced
    Updated,
    /// The address set existed and its addresses were cleared
    Cleared,
}

/// Address set store over a northbound client
#[derive(Clone)]
pub struct AddressSetStore {
    client: Arc<dyn NorthboundClient>,
}

impl std::fmt::Debug for AddressSetStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AddressSetStore")
            .field("backend", &self.client.backend_name())
            .finish()
    }
}

impl AddressSetStore {
    /// Create a store
    pub fn new(client: Arc<dyn NorthboundClient>) -> Self {
        Self { client }
    }

    /// The underlying client
    pub fn client(&self) -> &Arc<dyn NorthboundClient> {
        &self.client
    }

    /// Replace the addresses of an existing address set
    ///
    /// An empty `addresses` clears the column; the row itself is kept.
    /// Otherwise the column is overwritten with exactly `addresses`.
    pub async fn set_addresses<S: AsRef<str> + Sync>(
        &self,
        hashed_name: &str,
        addresses: &[S],
    ) -> Result<()> {
        let addresses = owned(addresses);
        debug!("setAddressSet for {} with {:?}", hashed_name, addresses);
        self.write_addresses(hashed_name, addresses).await.map(|_| ())
    }

    /// Create an address set, or replace the addresses of an existing one
    ///
    /// A new address set records `name` in `external_ids:name`. When it is
    /// created with no addresses the `addresses` column is left unset.
    pub async fn create_or_update<S: AsRef<str> + Sync>(
        &self,
        name: &str,
        hashed_name: &str,
        addresses: &[S],
    ) -> Result<MutationOutcome> {
        let addresses = owned(addresses);
        debug!("createAddressSet with {} and {:?}", name, addresses);

        let existing = self
            .client
            .query(&AddressSetQuery::by_name(hashed_name))
            .await
            .inspect_err(|e| {
                error!(
                    "find failed to get address set {}, stderr: {:?} ({})",
                    hashed_name,
                    e.stderr().unwrap_or_default(),
                    e
                );
            })?;

        if !existing.is_empty() {
            return self.write_addresses(hashed_name, addresses).await;
        }

        let op = AddressSetOp::Create {
            hashed_name: hashed_name.to_string(),
            name: name.to_string(),
            addresses,
        };
        self.client.mutate(&op).await.inspect_err(|e| {
            error!(
                "failed to create address_set {}, stderr: {:?} ({})",
                name,
                e.stderr().unwrap_or_default(),
                e
            );
        })?;
        Ok(MutationOutcome::Created)
    }

    /// Hash `name` and create or update its address set
    pub async fn ensure<S: AsRef<str> + Sync>(
        &self,
        name: &str,
        addresses: &[S],
    ) -> Result<MutationOutcome> {
        let hashed_name = hashed_address_set(name);
        self.create_or_update(name, &hashed_name, addresses).await
    }

    /// Delete an address set
    ///
    /// Deleting an address set that does not exist succeeds.
    pub async fn delete(&self, hashed_name: &str) -> Result<()> {
        debug!("deleteAddressSet {}", hashed_name);

        let op = AddressSetOp::DestroyIfExists {
            hashed_name: hashed_name.to_string(),
        };
        self.client.mutate(&op).await.inspect_err(|e| {
            error!(
                "failed to destroy address set {}, stderr: {:?} ({})",
                hashed_name,
                e.stderr().unwrap_or_default(),
                e
            );
        })
    }

    async fn write_addresses(
        &self,
        hashed_name: &str,
        addresses: Vec<String>,
    ) -> Result<MutationOutcome> {
        let hashed_name = hashed_name.to_string();
        let (op, outcome) = if addresses.is_empty() {
            (
                AddressSetOp::ClearAddresses { hashed_name },
                MutationOutcome::Cleared,
            )
        } else {
            (
                AddressSetOp::SetAddresses {
                    hashed_name,
                    addresses,
                },
                MutationOutcome::Updated,
            )
        };

        self.client.mutate(&op).await.inspect_err(|e| {
            error!(
                "failed to {} address_set {}, stderr: {:?} ({})",
                op.verb(),
                op.hashed_name(),
                e.stderr().unwrap_or_default(),
                e
            );
        })?;
        Ok(outcome)
    }
}

fn owned<S: AsRef<str>>(addresses: &[S]) -> Vec<String> {
    addresses.iter().map(|a| a.as_ref().to_string()).collect()
}
