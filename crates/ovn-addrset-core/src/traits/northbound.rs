// # Northbound Client Trait
//
// Typed access to the `Address_Set` table of the OVN northbound database.
//
// The store and the enumerator only speak in terms of [`AddressSetQuery`],
// [`AddressSetOp`] and [`AddressSetRecord`]. How those are turned into
// database traffic (and how responses are parsed) is owned by the
// implementation.
//
// ## Implementations
//
// - `NbctlClient`: drives `ovn-nbctl` through a `CommandRunner`
// - `MemoryNorthbound`: in-memory table for tests and embedding

use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};

/// External id key holding the semantic (unhashed) name
pub const EXTERNAL_ID_NAME: &str = "name";

/// A row of the `Address_Set` table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressSetRecord {
    /// Row UUID, when the backend reports one
    pub uuid: Option<String>,
    /// Primary key (the hashed name)
    pub hashed_name: String,
    /// Auxiliary metadata
    pub external_ids: BTreeMap<String, String>,
    /// IP addresses in the set
    pub addresses: BTreeSet<String>,
}

impl AddressSetRecord {
    /// Create a record with no metadata and no addresses
    pub fn new(hashed_name: impl Into<String>) -> Self {
        Self {
            hashed_name: hashed_name.into(),
            ..Self::default()
        }
    }

    /// The semantic name stored in `external_ids:name`
    pub fn external_name(&self) -> Option<&str> {
        self.external_ids.get(EXTERNAL_ID_NAME).map(String::as_str)
    }
}

/// Which rows a query should return
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressSetQuery {
    /// Every address set
    All,
    /// The address set whose primary key equals the given hashed name
    ByName(String),
}

impl AddressSetQuery {
    /// Query by primary key
    pub fn by_name(hashed_name: impl Into<String>) -> Self {
        Self::ByName(hashed_name.into())
    }
}

/// A mutation of the `Address_Set` table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressSetOp {
    /// Insert a new row
    Create {
        /// Primary key
        hashed_name: String,
        /// Semantic name, stored as `external_ids:name`
        name: String,
        /// Initial addresses; an empty list leaves the column unset
        addresses: Vec<String>,
    },
    /// Replace the whole `addresses` column of an existing row
    SetAddresses {
        /// Primary key
        hashed_name: String,
        /// New addresses (never empty; use `ClearAddresses`)
        addresses: Vec<String>,
    },
    /// Empty the `addresses` column of an existing row
    ClearAddresses {
        /// Primary key
        hashed_name: String,
    },
    /// Delete a row; a missing row is not an error
    DestroyIfExists {
        /// Primary key
        hashed_name: String,
    },
}

impl AddressSetOp {
    /// Primary key the operation targets
    pub fn hashed_name(&self) -> &str {
        match self {
            Self::Create { hashed_name, .. }
            | Self::SetAddresses { hashed_name, .. }
            | Self::ClearAddresses { hashed_name }
            | Self::DestroyIfExists { hashed_name } => hashed_name,
        }
    }

    /// Short verb for logging
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Create { .. } => "create",
            Self::SetAddresses { .. } => "set",
            Self::ClearAddresses { .. } => "clear",
            Self::DestroyIfExists { .. } => "destroy",
        }
    }
}

/// Trait for northbound database clients
///
/// # Thread Safety
///
/// Implementations must be usable from multiple tasks, but they are not
/// expected to make a query followed by a mutation atomic.
#[async_trait]
pub trait NorthboundClient: Send + Sync {
    /// Return the rows matching `query`, in backend order
    async fn query(&self, query: &AddressSetQuery)
    -> Result<Vec<AddressSetRecord>, crate::Error>;

    /// Apply a single mutation
    async fn mutate(&self, op: &AddressSetOp) -> Result<(), crate::Error>;

    /// Backend name (for logging)
    fn backend_name(&self) -> &'static str;
}
