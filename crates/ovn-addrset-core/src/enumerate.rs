//! Address set enumeration
//!
//! Lists every address set in the northbound database and recovers the
//! semantic name each was created under (from `external_ids:name`), so that
//! a reconciler can find and delete sets it no longer wants.
//!
//! Semantic names have the form `<namespace>.<suffix1>.<suffix2>...`; only
//! the namespace and the first suffix are broken out.

use std::sync::Arc;
use tracing::error;

use crate::error::Result;
use crate::hash::hashed_address_set;
use crate::traits::{AddressSetQuery, NorthboundClient};

/// A semantic address set name split into its parts
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AddressSetName {
    /// The full name
    pub name: String,
    /// Everything before the first `.`
    pub namespace: String,
    /// The segment after the first `.`, or empty
    pub suffix: String,
}

impl AddressSetName {
    /// Split a semantic name
    pub fn parse(name: &str) -> Self {
        let mut segments = name.split('.');
        let namespace = segments.next().unwrap_or_default().to_string();
        let suffix = segments.next().unwrap_or_default().to_string();
        Self {
            name: name.to_string(),
            namespace,
            suffix,
        }
    }

    /// The primary key this name is stored under
    pub fn hashed_name(&self) -> String {
        hashed_address_set(&self.name)
    }
}

/// Enumerates stored address sets
#[derive(Clone)]
pub struct AddressSetEnumerator {
    client: Arc<dyn NorthboundClient>,
}

impl std::fmt::Debug for AddressSetEnumerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AddressSetEnumerator")
            .field("backend", &self.client.backend_name())
            .finish()
    }
}

impl AddressSetEnumerator {
    /// Create an enumerator
    pub fn new(client: Arc<dyn NorthboundClient>) -> Self {
        Self { client }
    }

    /// Call `f(name, namespace, suffix)` once per stored address set
    ///
    /// Address sets without `external_ids:name` are skipped. The order is
    /// whatever the database returns. A failed query is returned before `f`
    /// is called at all.
    pub async fn for_each_name<F>(&self, mut f: F) -> Result<()>
    where
        F: FnMut(&str, &str, &str),
    {
        for parsed in self.names().await? {
            f(&parsed.name, &parsed.namespace, &parsed.suffix);
        }
        Ok(())
    }

    /// Every stored semantic name, split
    pub async fn names(&self) -> Result<Vec<AddressSetName>> {
        let records = self
            .client
            .query(&AddressSetQuery::All)
            .await
            .inspect_err(|e| {
                error!(
                    "Error in obtaining list of address sets from OVN: stderr: {:?} err: {}",
                    e.stderr().unwrap_or_default(),
                    e
                );
            })?;

        Ok(records
            .iter()
            .filter_map(|record| record.external_name())
            .map(AddressSetName::parse)
            .collect())
    }
}
